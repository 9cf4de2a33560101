//! Reusable keys and arenas.
//!
//! Key sets are generated from a seeded ChaCha8 RNG so that a failing
//! test reproduces exactly from its seed.

use keel_arena::{LinearArena, ScratchConfig};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Insertion order of the red-black fixture from CLRS (figure 13.4).
pub const CLRS_KEYS: [u32; 10] = [24, 18, 26, 5, 20, 27, 2, 7, 23, 21];

/// [`CLRS_KEYS`] as a `Vec`.
pub fn clrs_keys() -> Vec<u32> {
    CLRS_KEYS.to_vec()
}

/// The keys `0..n` in a seeded random order.
pub fn shuffled_keys(n: u32, seed: u64) -> Vec<u32> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut keys: Vec<u32> = (0..n).collect();
    keys.shuffle(&mut rng);
    keys
}

/// Pick roughly `fraction` of `keys`, in a seeded random order, for deletion.
pub fn delete_schedule(keys: &[u32], fraction: f64, seed: u64) -> Vec<u32> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed ^ 0x5eed);
    let mut picked: Vec<u32> = keys
        .iter()
        .copied()
        .filter(|_| rng.random_bool(fraction.clamp(0.0, 1.0)))
        .collect();
    picked.shuffle(&mut rng);
    picked
}

/// A zero-filling permanent arena of `size` bytes.
pub fn test_arena(size: usize) -> LinearArena<'static> {
    match LinearArena::with_capacity(size, true) {
        Ok(arena) => arena,
        Err(e) => panic!("test arena of {size} bytes: {e}"),
    }
}

/// A small scratch pool configuration: `arena_count` arenas of 1 KiB.
pub fn test_scratch_config(arena_count: usize) -> ScratchConfig {
    ScratchConfig::new(arena_count, arena_count as u64 * 1024)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shuffle_is_a_permutation() {
        let mut keys = shuffled_keys(100, 7);
        assert_eq!(keys, shuffled_keys(100, 7));
        keys.sort_unstable();
        assert_eq!(keys, (0..100).collect::<Vec<_>>());
    }

    #[test]
    fn schedule_is_a_subset() {
        let keys = shuffled_keys(50, 1);
        let picked = delete_schedule(&keys, 0.5, 1);
        assert!(picked.iter().all(|k| keys.contains(k)));
        assert!(delete_schedule(&keys, 0.0, 1).is_empty());
        assert_eq!(delete_schedule(&keys, 1.0, 1).len(), 50);
    }
}

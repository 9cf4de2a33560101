//! Arena and scratch-pool configuration parameters.

use keel_core::ConfigError;

/// Configuration for a permanent, heap-backed arena.
///
/// Validated at construction; immutable afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArenaConfig {
    /// Total capacity in bytes.
    ///
    /// Default: 1 MiB. Must not exceed [`ArenaConfig::MAX_SIZE`], the
    /// largest offset a `Block` can encode.
    pub size: usize,

    /// Zero-fill every allocation before handing it out.
    ///
    /// Default: `true`.
    pub zeroed: bool,
}

impl ArenaConfig {
    /// Default arena capacity: 1 MiB.
    pub const DEFAULT_SIZE: usize = 1 << 20;

    /// Largest supported arena capacity.
    pub const MAX_SIZE: u64 = u32::MAX as u64;

    /// Create a config for an arena of `size` bytes with zero-on-alloc.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            zeroed: true,
        }
    }

    /// Disable or enable zero-on-alloc.
    pub fn zeroed(mut self, zeroed: bool) -> Self {
        self.zeroed = zeroed;
        self
    }

    /// Check that the configuration can be honoured.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.size as u64 > Self::MAX_SIZE {
            return Err(ConfigError::SizeTooLarge {
                size: self.size as u64,
                max: Self::MAX_SIZE,
            });
        }
        Ok(())
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SIZE)
    }
}

/// Startup-time configuration of a [`ScratchPool`](crate::ScratchPool).
///
/// The pool's shape is fixed when it is built; there is no dynamic
/// reconfiguration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScratchConfig {
    /// Number of scratch arenas in the pool.
    ///
    /// Default: 4.
    pub arena_count: usize,

    /// Byte budget carved from the parent and shared evenly between the
    /// arenas. Any remainder of the division is left unused.
    ///
    /// Default: 64 KiB.
    pub total_bytes: u64,
}

impl ScratchConfig {
    /// Default number of scratch arenas.
    pub const DEFAULT_ARENA_COUNT: usize = 4;

    /// Default scratch budget: 64 KiB.
    pub const DEFAULT_TOTAL_BYTES: u64 = 64 * 1024;

    /// Create a scratch configuration.
    pub fn new(arena_count: usize, total_bytes: u64) -> Self {
        Self {
            arena_count,
            total_bytes,
        }
    }

    /// Bytes given to each scratch arena.
    pub fn arena_size(&self) -> usize {
        match self.arena_count {
            0 => 0,
            n => (self.total_bytes / n as u64) as usize,
        }
    }

    /// Check that the configuration can be honoured.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.arena_count == 0 {
            return Err(ConfigError::ArenaCountZero);
        }
        if self.total_bytes > ArenaConfig::MAX_SIZE {
            return Err(ConfigError::SizeTooLarge {
                size: self.total_bytes,
                max: ArenaConfig::MAX_SIZE,
            });
        }
        if self.arena_size() == 0 {
            return Err(ConfigError::ShareTooSmall {
                total_bytes: self.total_bytes,
                arena_count: self.arena_count,
            });
        }
        Ok(())
    }
}

impl Default for ScratchConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_ARENA_COUNT, Self::DEFAULT_TOTAL_BYTES)
    }
}

//! Error types for the Keel toolkit, organised by subsystem.
//!
//! Only recoverable conditions are errors. Violated preconditions
//! (resolving a stale block, touching a deleted descriptor, releasing a
//! scratch handle into the wrong pool) panic at the call site instead.

use thiserror::Error;

/// Errors that can occur during arena operations.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ArenaError {
    /// Not enough unused space remains for the request.
    #[error("arena capacity exceeded: requested {requested} bytes, {remaining} bytes remaining")]
    CapacityExceeded {
        /// Number of bytes requested.
        requested: usize,
        /// Bytes left in the arena's unused tail.
        remaining: usize,
    },
    /// `units * unit_size` does not fit the arena's addressable range.
    #[error("allocation size overflow: {units} units of {unit_size} bytes")]
    SizeOverflow {
        /// Number of units requested.
        units: usize,
        /// Size of one unit in bytes.
        unit_size: usize,
    },
    /// The arena could not be built from its configuration.
    #[error("invalid arena configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
}

/// Errors detected while validating a configuration struct.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The arena size exceeds what a [`Block`](crate::Block) can address.
    #[error("arena size {size} exceeds the addressable maximum of {max} bytes")]
    SizeTooLarge {
        /// The configured size.
        size: u64,
        /// Largest supported size.
        max: u64,
    },
    /// A pool arena was configured with a zero block size.
    #[error("pool block size must be at least 1 byte")]
    BlockSizeZero,
    /// A scratch pool was configured with no arenas.
    #[error("scratch pool arena_count must be at least 1")]
    ArenaCountZero,
    /// The per-arena share of the scratch budget rounds down to zero bytes.
    #[error("scratch budget of {total_bytes} bytes is too small for {arena_count} arenas")]
    ShareTooSmall {
        /// The configured total budget.
        total_bytes: u64,
        /// The configured arena count.
        arena_count: usize,
    },
}

/// Errors from the template formatter.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FormatError {
    /// Every scratch arena in the pool is checked out.
    #[error("no scratch arena available")]
    ScratchExhausted,
    /// A `{` without a matching `}`.
    #[error("unterminated placeholder starting at byte {position}")]
    UnterminatedPlaceholder {
        /// Byte position of the opening brace.
        position: usize,
    },
    /// A placeholder with no registered printer.
    #[error("no printer registered for placeholder '{name}'")]
    UnknownPlaceholder {
        /// The placeholder text, braces included.
        name: String,
    },
    /// The template has more placeholders than arguments.
    #[error("missing argument for placeholder '{placeholder}'")]
    MissingArgument {
        /// The placeholder without an argument.
        placeholder: String,
    },
    /// The argument's type does not match what the printer expects.
    #[error("argument does not match placeholder '{placeholder}'")]
    ArgumentMismatch {
        /// The placeholder whose printer rejected the argument.
        placeholder: String,
    },
    /// Rendering ran out of scratch or output space.
    #[error("arena: {0}")]
    Arena(#[from] ArenaError),
}

//! # Ore Error Types
//!
//! Failures of the generation core. "No deposit here" is not one of them:
//! catalog misses and deposit-free tiles are reported as `None`.

use thiserror::Error;

use crate::region::RegionKey;

/// Errors that can occur in the ore system.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OreError {
    /// Generation was requested while no session random source is active.
    #[error("no active random source: start a session before generating regions")]
    NoActiveRandomSource,

    /// Two distinct regions produced the same ledger hash.
    #[error(
        "region hash collision: {hash} already recorded for {existing:?}, refused {incoming:?}"
    )]
    HashCollision {
        /// The colliding hash.
        hash: i32,
        /// Region that recorded the hash first.
        existing: RegionKey,
        /// Region that tried to record it again.
        incoming: RegionKey,
    },

    /// A deposit type definition is unusable.
    #[error("invalid deposit type: {0}")]
    InvalidDeposit(String),

    /// Invalid configuration file.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A persisted ledger snapshot failed validation.
    #[error("corrupt ledger snapshot: {0}")]
    CorruptSnapshot(String),

    /// A ledger snapshot holds more hashes than its count field can encode.
    #[error("ledger snapshot too large: {0} hashes")]
    SnapshotTooLarge(usize),
}

/// Result type for ore operations.
pub type OreResult<T> = Result<T, OreError>;

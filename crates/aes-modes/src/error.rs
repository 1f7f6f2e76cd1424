//! Error types for aes-modes.

use std::io;

use aes_core::KeyLengthError;
use thiserror::Error;

/// Result alias used throughout aes-modes.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while framing or transforming blocks.
///
/// Every variant is terminal for the call that produced it.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Key material is not 16, 24 or 32 bytes.
    #[error(transparent)]
    KeyLength(#[from] KeyLengthError),

    /// Input is not a whole number of blocks and no padding was requested.
    #[error("input of {len} bytes is not a multiple of the block length (no padding?)")]
    Alignment {
        /// Number of input bytes seen.
        len: usize,
    },

    /// The padding count byte of the final block is outside `1..=16`.
    ///
    /// Also what a wrong key, corrupted ciphertext or mismatched mode looks like.
    #[error("invalid padding count {count}")]
    Padding {
        /// The rejected count byte.
        count: u8,
    },

    /// No mode is registered under this name.
    #[error("unknown mode: {0}")]
    UnknownMode(String),

    /// Reading the source or writing the destination failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

//! AES block cipher engine used by tomb.
//!
//! This crate follows the FIPS-197 specification and provides:
//! - GF(2^8) arithmetic and the tables derived from it.
//! - Key loading and key expansion for 128, 192 and 256-bit keys.
//! - The individual round transformations and the full cipher/inverse cipher
//!   over one 16-byte state.
//!
//! The implementation aims for clarity and testability rather than constant-time
//! guarantees; it should not be treated as side-channel hardened.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod block;
mod cipher;
pub mod constants;
pub mod gf256;
mod key;
pub mod round;

pub use crate::block::{format_state, xor_in_place, Block, BLOCK_LEN};
pub use crate::cipher::{cipher, decrypt_block, encrypt_block, expand_key, inv_cipher};
pub use crate::key::{Key, KeyLengthError, KeySchedule, KeySize};

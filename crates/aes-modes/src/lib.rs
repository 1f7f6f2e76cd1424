//! Block framing, padding and chaining modes on top of `aes-core`.
//!
//! Data is split into 16-byte blocks by a [`BlockSource`] (in memory or over
//! a pair of streams), optionally PKCS#7 padded, and driven through a [`Mode`]
//! from the registry. The free functions at the crate root are the usual way
//! in: they load the key, pick the padding policy and run the mode.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod cbc;
pub mod ecb;
mod error;
pub mod framing;
pub mod mode;

use std::io::{Read, Write};

use aes_core::Key;

pub use crate::error::{Error, Result};
pub use crate::framing::{BlockSource, MemoryBlocks, Padding, StreamBlocks};
pub use crate::mode::{lookup, Direction, Mode, ModeFn, CBC, ECB, MODES};

/// Encrypts `plaintext` under `mode`, appending PKCS#7 padding.
pub fn encrypt(mode: &Mode, key: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
    transform(mode, Direction::Encrypt, key, plaintext.to_vec(), Padding::Pad)
}

/// Decrypts `ciphertext` under `mode` and strips its PKCS#7 padding.
pub fn decrypt(mode: &Mode, key: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>> {
    transform(mode, Direction::Decrypt, key, ciphertext.to_vec(), Padding::Depad)
}

/// Transforms an owned buffer in place and returns it.
pub fn transform(
    mode: &Mode,
    direction: Direction,
    key: &[u8],
    mut data: Vec<u8>,
    padding: Padding,
) -> Result<Vec<u8>> {
    let key = Key::from_bytes(key)?;
    let mut blocks = MemoryBlocks::new(&mut data, padding)?;
    mode.run(direction, &mut blocks, &key)?;
    Ok(data)
}

/// Encrypts everything read from `src` into `dst`, returning the bytes written.
pub fn encrypt_stream<R: Read, W: Write>(
    mode: &Mode,
    key: &[u8],
    src: R,
    dst: W,
    padding: Padding,
) -> Result<u64> {
    transform_stream(mode, Direction::Encrypt, key, src, dst, padding)
}

/// Decrypts everything read from `src` into `dst`, returning the bytes written.
pub fn decrypt_stream<R: Read, W: Write>(
    mode: &Mode,
    key: &[u8],
    src: R,
    dst: W,
    padding: Padding,
) -> Result<u64> {
    transform_stream(mode, Direction::Decrypt, key, src, dst, padding)
}

fn transform_stream<R: Read, W: Write>(
    mode: &Mode,
    direction: Direction,
    key: &[u8],
    src: R,
    dst: W,
    padding: Padding,
) -> Result<u64> {
    let key = Key::from_bytes(key)?;
    let mut blocks = StreamBlocks::new(src, dst, padding);
    mode.run(direction, &mut blocks, &key)?;
    Ok(blocks.bytes_written())
}

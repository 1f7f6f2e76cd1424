//! Cipher Block Chaining.
//!
//! Each plaintext block is XORed with the previous ciphertext block before
//! encryption. The registered mode starts the chain from [`ZERO_IV`]; the
//! `*_with_iv` variants take the initialization vector from the caller.

use aes_core::{cipher, expand_key, inv_cipher, xor_in_place, Block, Key};
use tracing::debug;

use crate::error::Result;
use crate::framing::BlockSource;

/// The all-zero chaining vector used by the registered CBC mode.
pub const ZERO_IV: Block = [0u8; 16];

/// Encrypts `blocks` under `key`, chaining from [`ZERO_IV`].
pub fn encrypt(blocks: &mut dyn BlockSource, key: &Key) -> Result<()> {
    encrypt_with_iv(blocks, key, &ZERO_IV)
}

/// Decrypts `blocks` under `key`, chaining from [`ZERO_IV`].
pub fn decrypt(blocks: &mut dyn BlockSource, key: &Key) -> Result<()> {
    decrypt_with_iv(blocks, key, &ZERO_IV)
}

/// Encrypts `blocks` under `key`, chaining from `iv`.
pub fn encrypt_with_iv(blocks: &mut dyn BlockSource, key: &Key, iv: &Block) -> Result<()> {
    let schedule = expand_key(key);
    debug!(mode = "CBC", key = %key.size(), rounds = schedule.rounds(), "encrypting");
    let mut chain = *iv;
    while let Some(state) = blocks.pull()? {
        xor_in_place(state, &chain);
        cipher(state, &schedule);
        chain = *state;
    }
    blocks.finish()
}

/// Decrypts `blocks` under `key`, chaining from `iv`.
pub fn decrypt_with_iv(blocks: &mut dyn BlockSource, key: &Key, iv: &Block) -> Result<()> {
    let schedule = expand_key(key);
    debug!(mode = "CBC", key = %key.size(), rounds = schedule.rounds(), "decrypting");
    let mut chain = *iv;
    while let Some(state) = blocks.pull()? {
        let ciphertext = *state;
        inv_cipher(state, &schedule);
        xor_in_place(state, &chain);
        chain = ciphertext;
    }
    blocks.finish()
}

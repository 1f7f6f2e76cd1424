//! Electronic Code Book: every block is enciphered independently.

use aes_core::{cipher, expand_key, inv_cipher, Key};
use tracing::debug;

use crate::error::Result;
use crate::framing::BlockSource;

/// Encrypts every block of `blocks` under `key`.
pub fn encrypt(blocks: &mut dyn BlockSource, key: &Key) -> Result<()> {
    let schedule = expand_key(key);
    debug!(mode = "ECB", key = %key.size(), rounds = schedule.rounds(), "encrypting");
    while let Some(state) = blocks.pull()? {
        cipher(state, &schedule);
    }
    blocks.finish()
}

/// Decrypts every block of `blocks` under `key`.
pub fn decrypt(blocks: &mut dyn BlockSource, key: &Key) -> Result<()> {
    let schedule = expand_key(key);
    debug!(mode = "ECB", key = %key.size(), rounds = schedule.rounds(), "decrypting");
    while let Some(state) = blocks.pull()? {
        inv_cipher(state, &schedule);
    }
    blocks.finish()
}

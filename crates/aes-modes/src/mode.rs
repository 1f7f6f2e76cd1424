//! Registry of chaining modes, keyed by short name.

use core::fmt;

use aes_core::Key;

use crate::error::{Error, Result};
use crate::framing::BlockSource;
use crate::{cbc, ecb};

/// Drives a block source to completion under one key.
pub type ModeFn = fn(&mut dyn BlockSource, &Key) -> Result<()>;

/// Which half of a mode to run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Plaintext to ciphertext.
    Encrypt,
    /// Ciphertext to plaintext.
    Decrypt,
}

/// A named `(encrypt, decrypt)` pair.
#[derive(Clone, Copy)]
pub struct Mode {
    /// Short registry name, e.g. `"CBC"`.
    pub name: &'static str,
    /// Human readable name.
    pub long_name: &'static str,
    /// Encrypting procedure.
    pub encrypt: ModeFn,
    /// Decrypting procedure.
    pub decrypt: ModeFn,
}

impl Mode {
    /// Runs the procedure for `direction` over `blocks`.
    pub fn run(&self, direction: Direction, blocks: &mut dyn BlockSource, key: &Key) -> Result<()> {
        match direction {
            Direction::Encrypt => (self.encrypt)(blocks, key),
            Direction::Decrypt => (self.decrypt)(blocks, key),
        }
    }
}

impl fmt::Debug for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mode")
            .field("name", &self.name)
            .field("long_name", &self.long_name)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Electronic Code Book.
pub const ECB: Mode = Mode {
    name: "ECB",
    long_name: "Electronic Code Book",
    encrypt: ecb::encrypt,
    decrypt: ecb::decrypt,
};

/// Cipher Block Chaining with an all-zero IV.
pub const CBC: Mode = Mode {
    name: "CBC",
    long_name: "Cipher Block Chaining",
    encrypt: cbc::encrypt,
    decrypt: cbc::decrypt,
};

/// Every registered mode.
pub static MODES: [Mode; 2] = [ECB, CBC];

/// Resolves a mode by name, ignoring ASCII case.
pub fn lookup(name: &str) -> Result<&'static Mode> {
    MODES
        .iter()
        .find(|mode| mode.name.eq_ignore_ascii_case(name))
        .ok_or_else(|| Error::UnknownMode(name.to_owned()))
}

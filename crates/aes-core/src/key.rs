//! Key types for AES-128, AES-192 and AES-256.

use core::fmt;

use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

const MAX_KEY_WORDS: usize = 8;
const MAX_SCHEDULE_WORDS: usize = 60;

/// Returned when key material is not 16, 24 or 32 bytes long.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("AES key must be 16, 24 or 32 bytes, got {len}")]
pub struct KeyLengthError {
    /// Length of the rejected key material in bytes.
    pub len: usize,
}

/// The three AES key sizes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeySize {
    /// 128-bit key, 10 rounds.
    Aes128,
    /// 192-bit key, 12 rounds.
    Aes192,
    /// 256-bit key, 14 rounds.
    Aes256,
}

impl KeySize {
    /// Resolves a key size from a key length in bytes.
    pub fn from_len(len: usize) -> Result<Self, KeyLengthError> {
        match len {
            16 => Ok(Self::Aes128),
            24 => Ok(Self::Aes192),
            32 => Ok(Self::Aes256),
            _ => Err(KeyLengthError { len }),
        }
    }

    /// Key length in 32-bit words (`Nk`).
    pub const fn words(self) -> usize {
        match self {
            Self::Aes128 => 4,
            Self::Aes192 => 6,
            Self::Aes256 => 8,
        }
    }

    /// Key length in bytes.
    pub const fn bytes(self) -> usize {
        self.words() * 4
    }

    /// Number of cipher rounds (`Nr = Nk + 6`).
    pub const fn rounds(self) -> usize {
        self.words() + 6
    }

    /// Number of words in the expanded key schedule.
    pub const fn schedule_words(self) -> usize {
        4 * (self.rounds() + 1)
    }

    fn from_words(nk: usize) -> Self {
        match nk {
            4 => Self::Aes128,
            6 => Self::Aes192,
            _ => Self::Aes256,
        }
    }
}

impl fmt::Display for KeySize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AES-{}", self.bytes() * 8)
    }
}

/// An AES key held as big-endian 32-bit words.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Key {
    words: [u32; MAX_KEY_WORDS],
    nk: usize,
}

impl Key {
    /// Loads raw key material, rejecting anything but 16, 24 or 32 bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, KeyLengthError> {
        let size = KeySize::from_len(bytes.len())?;
        let mut words = [0u32; MAX_KEY_WORDS];
        for (word, chunk) in words.iter_mut().zip(bytes.chunks_exact(4)) {
            *word = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        Ok(Self {
            words,
            nk: size.words(),
        })
    }

    /// Returns the key size.
    pub fn size(&self) -> KeySize {
        KeySize::from_words(self.nk)
    }

    /// Returns the `Nk` key words.
    #[inline]
    pub fn words(&self) -> &[u32] {
        &self.words[..self.nk]
    }
}

impl TryFrom<&[u8]> for Key {
    type Error = KeyLengthError;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        Self::from_bytes(value)
    }
}

macro_rules! impl_key_from_array {
    ($($len:literal),*) => {
        $(
            impl From<[u8; $len]> for Key {
                fn from(value: [u8; $len]) -> Self {
                    let mut words = [0u32; MAX_KEY_WORDS];
                    for (word, chunk) in words.iter_mut().zip(value.chunks_exact(4)) {
                        *word = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
                    }
                    Self { words, nk: $len / 4 }
                }
            }
        )*
    };
}

impl_key_from_array!(16, 24, 32);

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Key")
            .field("size", &self.size())
            .finish_non_exhaustive()
    }
}

/// Expanded key schedule: `4 * (Nr + 1)` words, four per round key.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct KeySchedule {
    words: [u32; MAX_SCHEDULE_WORDS],
    len: usize,
}

impl KeySchedule {
    pub(crate) fn new(words: [u32; MAX_SCHEDULE_WORDS], len: usize) -> Self {
        Self { words, len }
    }

    /// All schedule words, 44, 52 or 60 of them.
    #[inline]
    pub fn words(&self) -> &[u32] {
        &self.words[..self.len]
    }

    /// Number of rounds this schedule drives.
    #[inline]
    pub fn rounds(&self) -> usize {
        self.len / 4 - 1
    }

    /// Returns the four words of the round key for `round` (0..=rounds).
    #[inline]
    pub fn round_key(&self, round: usize) -> &[u32] {
        &self.words[round * 4..round * 4 + 4]
    }
}

impl fmt::Debug for KeySchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeySchedule")
            .field("rounds", &self.rounds())
            .finish_non_exhaustive()
    }
}

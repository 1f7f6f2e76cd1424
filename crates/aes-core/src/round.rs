//! AES round transformations.
//!
//! Every transformation mutates the column-major state in place.

use crate::block::Block;
use crate::constants::{inv_sbox, sbox, GMUL11, GMUL13, GMUL14, GMUL2, GMUL3, GMUL9};
use crate::key::KeySchedule;

/// Applies SubBytes to the state in place.
#[inline]
pub fn sub_bytes(state: &mut Block) {
    for byte in state.iter_mut() {
        *byte = sbox(*byte);
    }
}

/// Applies the inverse SubBytes transformation.
#[inline]
pub fn inv_sub_bytes(state: &mut Block) {
    for byte in state.iter_mut() {
        *byte = inv_sbox(*byte);
    }
}

fn row(state: &Block, r: usize) -> [u8; 4] {
    [state[r], state[r + 4], state[r + 8], state[r + 12]]
}

fn set_row(state: &mut Block, r: usize, values: [u8; 4]) {
    for (col, value) in values.into_iter().enumerate() {
        state[r + 4 * col] = value;
    }
}

/// Performs ShiftRows in place: row `r` rotates left by `r` positions.
#[inline]
pub fn shift_rows(state: &mut Block) {
    for r in 1..4 {
        let mut values = row(state, r);
        values.rotate_left(r);
        set_row(state, r, values);
    }
}

/// Performs the inverse of ShiftRows in place: row `r` rotates right by `r`.
#[inline]
pub fn inv_shift_rows(state: &mut Block) {
    for r in 1..4 {
        let mut values = row(state, r);
        values.rotate_right(r);
        set_row(state, r, values);
    }
}

/// MixColumns over all four columns.
#[inline]
pub fn mix_columns(state: &mut Block) {
    for column in state.chunks_exact_mut(4) {
        let [a0, a1, a2, a3] = [column[0], column[1], column[2], column[3]];
        column[0] = GMUL2[a0 as usize] ^ GMUL3[a1 as usize] ^ a2 ^ a3;
        column[1] = a0 ^ GMUL2[a1 as usize] ^ GMUL3[a2 as usize] ^ a3;
        column[2] = a0 ^ a1 ^ GMUL2[a2 as usize] ^ GMUL3[a3 as usize];
        column[3] = GMUL3[a0 as usize] ^ a1 ^ a2 ^ GMUL2[a3 as usize];
    }
}

/// Inverse MixColumns over all four columns.
#[inline]
pub fn inv_mix_columns(state: &mut Block) {
    for column in state.chunks_exact_mut(4) {
        let [a0, a1, a2, a3] = [
            column[0] as usize,
            column[1] as usize,
            column[2] as usize,
            column[3] as usize,
        ];
        column[0] = GMUL14[a0] ^ GMUL11[a1] ^ GMUL13[a2] ^ GMUL9[a3];
        column[1] = GMUL9[a0] ^ GMUL14[a1] ^ GMUL11[a2] ^ GMUL13[a3];
        column[2] = GMUL13[a0] ^ GMUL9[a1] ^ GMUL14[a2] ^ GMUL11[a3];
        column[3] = GMUL11[a0] ^ GMUL13[a1] ^ GMUL9[a2] ^ GMUL14[a3];
    }
}

/// XORs the round key for `round` into the state, one schedule word per column.
#[inline]
pub fn add_round_key(state: &mut Block, schedule: &KeySchedule, round: usize) {
    for (column, word) in state
        .chunks_exact_mut(4)
        .zip(schedule.round_key(round).iter())
    {
        for (byte, key_byte) in column.iter_mut().zip(word.to_be_bytes()) {
            *byte ^= key_byte;
        }
    }
}

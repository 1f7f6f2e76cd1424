//! Block and state representation helpers.

use core::fmt::Write as _;

/// Length of an AES block in bytes.
pub const BLOCK_LEN: usize = 16;

/// AES block of 16 bytes.
///
/// While a block is being transformed it is the cipher state: a column-major
/// 4x4 byte matrix where the byte at row `r`, column `c` lives at `r + 4 * c`.
pub type Block = [u8; BLOCK_LEN];

/// XORs two blocks, writing the result into `dst`.
#[inline]
pub fn xor_in_place(dst: &mut Block, rhs: &Block) {
    for (d, r) in dst.iter_mut().zip(rhs.iter()) {
        *d ^= *r;
    }
}

/// Renders a state as four lines of hex, one per matrix row.
pub fn format_state(state: &Block) -> String {
    let mut out = String::with_capacity(4 * 12);
    for row in 0..4 {
        if row > 0 {
            out.push('\n');
        }
        for col in 0..4 {
            if col > 0 {
                out.push(' ');
            }
            // Writing to a String cannot fail.
            let _ = write!(out, "{:02x}", state[row + 4 * col]);
        }
    }
    out
}

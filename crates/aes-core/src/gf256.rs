//! Arithmetic over GF(2^8) with the AES reducing polynomial.
//!
//! Field elements are bytes read as binary polynomials of degree at most 7,
//! bit `i` being the coefficient of `x^i`. Addition is XOR. Multiplication is
//! the carry-less polynomial product reduced modulo `x^8 + x^4 + x^3 + x + 1`.

/// The AES reducing polynomial `x^8 + x^4 + x^3 + x + 1`.
pub const REDUCING_POLYNOMIAL: u16 = 0x11b;

/// Adds two field elements.
#[inline]
pub const fn add(a: u8, b: u8) -> u8 {
    a ^ b
}

/// Multiplies two field elements.
///
/// Computes the raw polynomial product (at most degree 14) and then reduces
/// it by XOR-ing shifted copies of [`REDUCING_POLYNOMIAL`] until the degree
/// drops below 8.
pub const fn multiply(x: u8, y: u8) -> u8 {
    let mut product: u16 = 0;
    let mut bit = 0;
    while bit < 8 {
        if (y >> bit) & 1 == 1 {
            product ^= (x as u16) << bit;
        }
        bit += 1;
    }

    while product >= 0x100 {
        let degree = 15 - product.leading_zeros();
        product ^= REDUCING_POLYNOMIAL << (degree - 8);
    }

    product as u8
}

/// Returns the multiplicative inverse of `x`, mapping zero to zero.
///
/// Uses `x^254 = x^-1`, which holds for every non-zero element of the field.
pub const fn inverse(x: u8) -> u8 {
    let mut result = 1u8;
    let mut base = x;
    let mut exp = 254u8;
    while exp > 0 {
        if exp & 1 == 1 {
            result = multiply(result, base);
        }
        base = multiply(base, base);
        exp >>= 1;
    }
    result
}

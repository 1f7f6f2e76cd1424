//! AES key schedule and block encryption/decryption.

use crate::block::Block;
use crate::constants::{sbox, RCON};
use crate::key::{Key, KeySchedule};
use crate::round::{
    add_round_key, inv_mix_columns, inv_shift_rows, inv_sub_bytes, mix_columns, shift_rows,
    sub_bytes,
};

fn rot_word(word: u32) -> u32 {
    word.rotate_left(8)
}

fn sub_word(word: u32) -> u32 {
    u32::from_be_bytes(word.to_be_bytes().map(sbox))
}

/// Expands a key into `4 * (Nr + 1)` schedule words (FIPS-197 section 5.2).
pub fn expand_key(key: &Key) -> KeySchedule {
    let nk = key.words().len();
    let total = key.size().schedule_words();
    let mut w = [0u32; 60];
    w[..nk].copy_from_slice(key.words());

    for i in nk..total {
        let mut temp = w[i - 1];
        if i % nk == 0 {
            temp = sub_word(rot_word(temp)) ^ RCON[i / nk - 1];
        } else if nk > 6 && i % nk == 4 {
            temp = sub_word(temp);
        }
        w[i] = w[i - nk] ^ temp;
    }

    KeySchedule::new(w, total)
}

/// Runs the forward cipher over `state` in place.
pub fn cipher(state: &mut Block, schedule: &KeySchedule) {
    let rounds = schedule.rounds();

    add_round_key(state, schedule, 0);
    for round in 1..rounds {
        sub_bytes(state);
        shift_rows(state);
        mix_columns(state);
        add_round_key(state, schedule, round);
    }

    // The final round has no MixColumns.
    sub_bytes(state);
    shift_rows(state);
    add_round_key(state, schedule, rounds);
}

/// Runs the inverse cipher over `state` in place.
pub fn inv_cipher(state: &mut Block, schedule: &KeySchedule) {
    let rounds = schedule.rounds();

    add_round_key(state, schedule, rounds);
    for round in (1..rounds).rev() {
        inv_shift_rows(state);
        inv_sub_bytes(state);
        add_round_key(state, schedule, round);
        inv_mix_columns(state);
    }
    inv_shift_rows(state);
    inv_sub_bytes(state);
    add_round_key(state, schedule, 0);
}

/// Encrypts a single 16-byte block, returning the ciphertext.
pub fn encrypt_block(block: &Block, schedule: &KeySchedule) -> Block {
    let mut state = *block;
    cipher(&mut state, schedule);
    state
}

/// Decrypts a single 16-byte block, returning the plaintext.
pub fn decrypt_block(block: &Block, schedule: &KeySchedule) -> Block {
    let mut state = *block;
    inv_cipher(&mut state, schedule);
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::RngCore;

    fn key(hex_str: &str) -> Key {
        Key::from_bytes(&hex::decode(hex_str).unwrap()).unwrap()
    }

    fn block(hex_str: &str) -> Block {
        hex::decode(hex_str).unwrap().try_into().unwrap()
    }

    #[test]
    fn key_expansion_128_matches_appendix_a1() {
        let expected: [u32; 44] = [
            0x2b7e1516, 0x28aed2a6, 0xabf71588, 0x09cf4f3c, 0xa0fafe17, 0x88542cb1, 0x23a33939,
            0x2a6c7605, 0xf2c295f2, 0x7a96b943, 0x5935807a, 0x7359f67f, 0x3d80477d, 0x4716fe3e,
            0x1e237e44, 0x6d7a883b, 0xef44a541, 0xa8525b7f, 0xb671253b, 0xdb0bad00, 0xd4d1c6f8,
            0x7c839d87, 0xcaf2b8bc, 0x11f915bc, 0x6d88a37a, 0x110b3efd, 0xdbf98641, 0xca0093fd,
            0x4e54f70e, 0x5f5fc9f3, 0x84a64fb2, 0x4ea6dc4f, 0xead27321, 0xb58dbad2, 0x312bf560,
            0x7f8d292f, 0xac7766f3, 0x19fadc21, 0x28d12941, 0x575c006e, 0xd014f9a8, 0xc9ee2589,
            0xe13f0cc8, 0xb6630ca6,
        ];
        let schedule = expand_key(&key("2b7e151628aed2a6abf7158809cf4f3c"));
        assert_eq!(schedule.words(), &expected[..]);
        assert_eq!(schedule.rounds(), 10);
    }

    #[test]
    fn key_expansion_192_matches_appendix_a2() {
        let expected: [u32; 52] = [
            0x8e73b0f7, 0xda0e6452, 0xc810f32b, 0x809079e5, 0x62f8ead2, 0x522c6b7b, 0xfe0c91f7,
            0x2402f5a5, 0xec12068e, 0x6c827f6b, 0x0e7a95b9, 0x5c56fec2, 0x4db7b4bd, 0x69b54118,
            0x85a74796, 0xe92538fd, 0xe75fad44, 0xbb095386, 0x485af057, 0x21efb14f, 0xa448f6d9,
            0x4d6dce24, 0xaa326360, 0x113b30e6, 0xa25e7ed5, 0x83b1cf9a, 0x27f93943, 0x6a94f767,
            0xc0a69407, 0xd19da4e1, 0xec1786eb, 0x6fa64971, 0x485f7032, 0x22cb8755, 0xe26d1352,
            0x33f0b7b3, 0x40beeb28, 0x2f18a259, 0x6747d26b, 0x458c553e, 0xa7e1466c, 0x9411f1df,
            0x821f750a, 0xad07d753, 0xca400538, 0x8fcc5006, 0x282d166a, 0xbc3ce7b5, 0xe98ba06f,
            0x448c773c, 0x8ecc7204, 0x01002202,
        ];
        let schedule = expand_key(&key("8e73b0f7da0e6452c810f32b809079e562f8ead2522c6b7b"));
        assert_eq!(schedule.words(), &expected[..]);
        assert_eq!(schedule.rounds(), 12);
    }

    #[test]
    fn key_expansion_256_matches_appendix_a3() {
        let expected: [u32; 60] = [
            0x603deb10, 0x15ca71be, 0x2b73aef0, 0x857d7781, 0x1f352c07, 0x3b6108d7, 0x2d9810a3,
            0x0914dff4, 0x9ba35411, 0x8e6925af, 0xa51a8b5f, 0x2067fcde, 0xa8b09c1a, 0x93d194cd,
            0xbe49846e, 0xb75d5b9a, 0xd59aecb8, 0x5bf3c917, 0xfee94248, 0xde8ebe96, 0xb5a9328a,
            0x2678a647, 0x98312229, 0x2f6c79b3, 0x812c81ad, 0xdadf48ba, 0x24360af2, 0xfab8b464,
            0x98c5bfc9, 0xbebd198e, 0x268c3ba7, 0x09e04214, 0x68007bac, 0xb2df3316, 0x96e939e4,
            0x6c518d80, 0xc814e204, 0x76a9fb8a, 0x5025c02d, 0x59c58239, 0xde136967, 0x6ccc5a71,
            0xfa256395, 0x9674ee15, 0x5886ca5d, 0x2e2f31d7, 0x7e0af1fa, 0x27cf73c3, 0x749c47ab,
            0x18501dda, 0xe2757e4f, 0x7401905a, 0xcafaaae3, 0xe4d59b34, 0x9adf6ace, 0xbd10190d,
            0xfe4890d1, 0xe6188d0b, 0x046df344, 0x706c631e,
        ];
        let schedule = expand_key(&key(
            "603deb1015ca71be2b73aef0857d77811f352c073b6108d72d9810a30914dff4",
        ));
        assert_eq!(schedule.words(), &expected[..]);
        assert_eq!(schedule.rounds(), 14);
    }

    #[test]
    fn cipher_matches_appendix_b() {
        let schedule = expand_key(&key("2b7e151628aed2a6abf7158809cf4f3c"));
        let input = block("3243f6a8885a308d313198a2e0370734");
        let mut state = input;
        cipher(&mut state, &schedule);
        assert_eq!(state, block("3902dc1925dc116a8409850b1dfb9732"));
        inv_cipher(&mut state, &schedule);
        assert_eq!(state, input);
    }

    #[test]
    fn block_functions_match_appendix_c() {
        let plain = block("00112233445566778899aabbccddeeff");
        let cases = [
            (
                "000102030405060708090a0b0c0d0e0f",
                "69c4e0d86a7b0430d8cdb78070b4c55a",
            ),
            (
                "000102030405060708090a0b0c0d0e0f1011121314151617",
                "dda97ca4864cdfe06eaf70a0ec0d7191",
            ),
            (
                "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f",
                "8ea2b7ca516745bfeafc49904b496089",
            ),
        ];
        for (key_hex, cipher_hex) in cases {
            let schedule = expand_key(&key(key_hex));
            let ct = encrypt_block(&plain, &schedule);
            assert_eq!(ct, block(cipher_hex), "encrypt with key {key_hex}");
            assert_eq!(decrypt_block(&ct, &schedule), plain, "decrypt with key {key_hex}");
        }
    }

    #[test]
    fn encrypt_decrypt_round_trip_random() {
        let mut rng = rand::thread_rng();
        for key_len in [16usize, 24, 32] {
            for _ in 0..50 {
                let mut key_bytes = vec![0u8; key_len];
                let mut state = [0u8; 16];
                rng.fill_bytes(&mut key_bytes);
                rng.fill_bytes(&mut state);
                let schedule = expand_key(&Key::from_bytes(&key_bytes).unwrap());
                let original = state;
                cipher(&mut state, &schedule);
                inv_cipher(&mut state, &schedule);
                assert_eq!(state, original);
            }
        }
    }
}

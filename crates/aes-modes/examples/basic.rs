//! Encrypts a message under every registered mode and decrypts it back.

use aes_modes::{decrypt, encrypt, lookup, MODES};

fn main() -> Result<(), aes_modes::Error> {
    let key = b"YELLOW SUBMARINE";
    let message = b"first block here, second block here, and a tail";

    for mode in &MODES {
        let ciphertext = encrypt(mode, key, message)?;
        let plaintext = decrypt(mode, key, &ciphertext)?;
        assert_eq!(plaintext, message);
        println!("{:<4} {}", mode.name, hex::encode(&ciphertext));
    }

    // Modes can also be resolved by name.
    let cbc = lookup("cbc")?;
    println!("resolved {} ({})", cbc.name, cbc.long_name);
    Ok(())
}

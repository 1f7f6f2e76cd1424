//! Command-line interface for `tomb`.

#![forbid(unsafe_code)]

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use aes_core::{decrypt_block, encrypt_block, expand_key, Block, Key};
use aes_modes::{cbc, Direction, Mode, Padding, StreamBlocks, CBC, MODES};
use anyhow::{bail, ensure, Context, Result};
use clap::{Args, Parser, Subcommand};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// AES-128/192/256 in ECB and CBC modes.
#[derive(Parser)]
#[command(name = "tomb", version, about = "AES block cipher toolkit")]
struct Cli {
    /// Log at debug level (RUST_LOG overrides).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt a file.
    Enc(Transform),
    /// Decrypt a file.
    Dec(Transform),
    /// Run the FIPS-197 known-answer tests.
    Check,
    /// List the registered modes.
    Modes,
    /// Generate a key and data, then round-trip them through every mode.
    Demo {
        /// Optional RNG seed for reproducibility.
        #[arg(long)]
        seed: Option<u64>,
        /// Number of random plaintext bytes.
        #[arg(long, default_value_t = 40)]
        len: usize,
    },
}

#[derive(Args)]
struct Transform {
    /// Mode name (ECB or CBC, case-insensitive).
    #[arg(long, default_value = "CBC", value_parser = parse_mode)]
    mode: &'static Mode,
    /// Key as 32, 48 or 64 hex characters.
    #[arg(long, value_name = "HEX")]
    key_hex: String,
    /// Initialization vector as 32 hex characters (CBC only, default all zero).
    #[arg(long, value_name = "HEX")]
    iv_hex: Option<String>,
    /// Input file.
    #[arg(long, value_name = "FILE")]
    input: PathBuf,
    /// Output file.
    #[arg(long, value_name = "FILE")]
    output: PathBuf,
    /// Treat the input as block aligned and skip PKCS#7 padding.
    #[arg(long, default_value_t = false)]
    no_pad: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Enc(args) => cmd_transform(Direction::Encrypt, &args),
        Commands::Dec(args) => cmd_transform(Direction::Decrypt, &args),
        Commands::Check => cmd_check(),
        Commands::Modes => {
            for mode in &MODES {
                println!("{:<4} {}", mode.name, mode.long_name);
            }
            Ok(())
        }
        Commands::Demo { seed, len } => cmd_demo(seed, len),
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(filter)
        .init();
}

fn cmd_transform(direction: Direction, args: &Transform) -> Result<()> {
    let key = parse_key_hex(&args.key_hex)?;
    let iv = args.iv_hex.as_deref().map(parse_iv_hex).transpose()?;
    if iv.is_some() && args.mode.name != CBC.name {
        bail!("--iv-hex only applies to CBC, not {}", args.mode);
    }
    let padding = match (args.no_pad, direction) {
        (true, _) => Padding::None,
        (false, Direction::Encrypt) => Padding::Pad,
        (false, Direction::Decrypt) => Padding::Depad,
    };

    let src = open_input(&args.input)?;
    let dst = create_output(&args.output)?;
    let mut blocks = StreamBlocks::new(src, dst, padding);
    info!(mode = args.mode.name, ?direction, ?padding, "transforming {}", args.input.display());

    let outcome = match (iv, direction) {
        (Some(iv), Direction::Encrypt) => cbc::encrypt_with_iv(&mut blocks, &key, &iv),
        (Some(iv), Direction::Decrypt) => cbc::decrypt_with_iv(&mut blocks, &key, &iv),
        (None, _) => args.mode.run(direction, &mut blocks, &key),
    };
    outcome.with_context(|| format!("{} {}", args.mode, args.input.display()))?;

    debug!(written = blocks.bytes_written(), "done");
    Ok(())
}

// FIPS-197 Appendix C: one plaintext, one key per size.
const KAT_PLAINTEXT: &str = "00112233445566778899aabbccddeeff";
const KAT_VECTORS: [(&str, &str); 3] = [
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

fn cmd_check() -> Result<()> {
    let plaintext = parse_block_hex(KAT_PLAINTEXT)?;
    let mut failures = 0;
    for (key_hex, expected_hex) in KAT_VECTORS {
        let key = parse_key_hex(key_hex)?;
        let expected = parse_block_hex(expected_hex)?;
        let schedule = expand_key(&key);
        let ciphertext = encrypt_block(&plaintext, &schedule);
        let ok = ciphertext == expected && decrypt_block(&ciphertext, &schedule) == plaintext;
        println!("{}: {}", key.size(), if ok { "ok" } else { "FAILED" });
        if !ok {
            failures += 1;
        }
    }
    ensure!(failures == 0, "{failures} known-answer test(s) failed");
    Ok(())
}

fn cmd_demo(seed: Option<u64>, len: usize) -> Result<()> {
    let mut rng = seeded_rng(seed);
    let mut key_bytes = [0u8; 16];
    rng.fill_bytes(&mut key_bytes);
    let mut plaintext = vec![0u8; len];
    rng.fill_bytes(&mut plaintext);

    println!("demo key: {}", hex::encode(key_bytes));
    println!("plaintext: {}", hex::encode(&plaintext));
    for mode in &MODES {
        let ciphertext = aes_modes::encrypt(mode, &key_bytes, &plaintext)?;
        let decrypted = aes_modes::decrypt(mode, &key_bytes, &ciphertext)?;
        println!("{} ciphertext: {}", mode.name, hex::encode(&ciphertext));
        if decrypted != plaintext {
            bail!("{mode} demo roundtrip failed");
        }
    }
    Ok(())
}

fn parse_mode(name: &str) -> Result<&'static Mode, String> {
    aes_modes::lookup(name).map_err(|e| e.to_string())
}

fn parse_key_hex(hex_str: &str) -> Result<Key> {
    let bytes = hex::decode(hex_str.trim()).context("decode key hex")?;
    Ok(Key::from_bytes(&bytes)?)
}

fn parse_block_hex(hex_str: &str) -> Result<Block> {
    let bytes = hex::decode(hex_str.trim()).context("decode block hex")?;
    match Block::try_from(bytes.as_slice()) {
        Ok(block) => Ok(block),
        Err(_) => bail!("expected 16 bytes (32 hex characters), got {}", bytes.len()),
    }
}

fn parse_iv_hex(hex_str: &str) -> Result<Block> {
    parse_block_hex(hex_str).context("parse IV")
}

fn open_input(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    Ok(BufReader::new(file))
}

fn create_output(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    Ok(BufWriter::new(file))
}

fn seeded_rng(seed: Option<u64>) -> ChaCha20Rng {
    match seed {
        Some(value) => ChaCha20Rng::seed_from_u64(value),
        None => ChaCha20Rng::from_entropy(),
    }
}

use anyhow::{Context, Result};
use clap::ValueEnum;
use std::io::Write;
use std::process::Command;

/// Signature handed to `cast abi-encode`: one `int256` argument.
pub const SIGNATURE: &str = "f(int256)";

/// Big-endian two's complement `int256` word, sign-extended from `value`.
pub fn encode_int256(value: i128) -> [u8; 32] {
    let fill = if value < 0 { 0xff } else { 0x00 };
    let mut word = [fill; 32];
    word[16..].copy_from_slice(&value.to_be_bytes());
    word
}

/// `0x`-prefixed lowercase hex, as `cast abi-encode` prints it.
pub fn to_hex(word: &[u8; 32]) -> String {
    let mut hex = String::with_capacity(2 + 2 * word.len());
    hex.push_str("0x");
    for byte in word {
        hex.push_str(&format!("{:02x}", byte));
    }
    hex
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Encoder {
    /// Delegate to `cast abi-encode`
    Cast,
    /// Encode in-process
    Builtin,
}

impl Encoder {
    /// Writes the encoded word and returns the process exit code to propagate.
    pub fn encode(&self, value: i128, cast_bin: &str, out: &mut impl Write) -> Result<i32> {
        match self {
            Encoder::Cast => cast_abi_encode(cast_bin, value),
            Encoder::Builtin => {
                writeln!(out, "{}", to_hex(&encode_int256(value)))?;
                out.flush()?;
                Ok(0)
            }
        }
    }
}

fn cast_abi_encode(cast_bin: &str, value: i128) -> Result<i32> {
    let status = Command::new(cast_bin)
        .args(["abi-encode", SIGNATURE, &value.to_string()])
        .status()
        .with_context(|| format!("spawning {} abi-encode", cast_bin))?;
    // Killed by a signal: no code to forward.
    Ok(status.code().unwrap_or(1))
}

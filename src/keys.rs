//! Private key file loading

use std::path::Path;

use eyre::{eyre, Result, WrapErr};

use crate::redact::Redacted;

/// Read one hex private key per line, skipping blank lines.
///
/// Each key must decode to 32 bytes (optional `0x` prefix). Bad lines are
/// reported by line number only, never by content.
pub fn load_private_keys(path: impl AsRef<Path>) -> Result<Vec<Redacted<String>>> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read key file {}", path.display()))?;
    parse_private_keys(&contents)
}

pub fn parse_private_keys(contents: &str) -> Result<Vec<Redacted<String>>> {
    let mut keys = Vec::new();

    for (idx, line) in contents.lines().enumerate() {
        let key = line.trim();
        if key.is_empty() {
            continue;
        }

        let hex_part = key.strip_prefix("0x").unwrap_or(key);
        let bytes = hex::decode(hex_part)
            .map_err(|_| eyre!("Line {}: private key is not valid hex", idx + 1))?;
        if bytes.len() != 32 {
            return Err(eyre!(
                "Line {}: private key must be 32 bytes, got {}",
                idx + 1,
                bytes.len()
            ));
        }

        keys.push(Redacted::new(format!("0x{}", hex_part)));
    }

    Ok(keys)
}

//! # Descriptor Subcommand
//!
//! Validates a decoded QR payload the same way the scanner does and prints
//! the normalized descriptor. `-` reads the payload from stdin.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use touche_core::MatchDescriptor;

/// Arguments for `touche descriptor`.
#[derive(Args, Debug)]
pub struct DescriptorArgs {
    /// File holding the JSON payload, or `-` for stdin.
    pub path: PathBuf,
}

/// Read a payload from a file, or from stdin for `-`.
pub fn read_payload(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read payload from stdin")?;
        return Ok(buf);
    }
    std::fs::read_to_string(path)
        .with_context(|| format!("failed to read payload: {}", path.display()))
}

/// Execute the descriptor subcommand.
pub fn run_descriptor(args: &DescriptorArgs) -> Result<u8> {
    let payload = read_payload(&args.path)?;
    match MatchDescriptor::from_json(&payload) {
        Ok(descriptor) => {
            println!("{}", serde_json::to_string_pretty(&descriptor)?);
            if descriptor.require_submitter_identity && descriptor.base_uri.is_empty() {
                println!("WARNING: identity required but no baseUri for registration");
            }
            Ok(0)
        }
        Err(e) => {
            println!("INVALID: {e}");
            Ok(2)
        }
    }
}

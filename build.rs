//! Build script for yt2spot.
//!
//! Copies the `.env.example` configuration template into the platform data
//! directory so a fresh install has a template next to where `.env` is read.

use std::{env, fs, path::PathBuf};

/// Copies `.env.example` from the crate root to `<data_local_dir>/yt2spot/`.
///
/// A missing template only produces a cargo warning. Failing to create the
/// target directory or write the file fails the build.
///
/// Target locations:
/// - Linux: `~/.local/share/yt2spot/.env.example`
/// - macOS: `~/Library/Application Support/yt2spot/.env.example`
/// - Windows: `%LOCALAPPDATA%/yt2spot/.env.example`
fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=.env.example");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let template = manifest_dir.join(".env.example");

    let mut out_dir = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    out_dir.push("yt2spot");
    fs::create_dir_all(&out_dir)?;

    if template.is_file() {
        fs::copy(&template, out_dir.join(".env.example"))?;
    } else {
        println!(
            "cargo:warning=.env.example not found at {}",
            template.display()
        );
    }

    Ok(())
}

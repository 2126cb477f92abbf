//! Build script for the Spotify Playlist Toolbox.
//!
//! Copies the `.env.example` configuration template to the user's local data
//! directory, next to where the application looks for its `.env` file:
//!
//! - Linux: `~/.local/share/playlist-toolbox/.env.example`
//! - macOS: `~/Library/Application Support/playlist-toolbox/.env.example`
//! - Windows: `%LOCALAPPDATA%/playlist-toolbox/.env.example`
//!
//! Failing to write the template only emits a cargo warning so builds in
//! read-only or sandboxed environments still succeed.

use std::{env, fs, path::PathBuf};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=.env.example");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let env_example_path = manifest_dir.join(".env.example");

    if !env_example_path.is_file() {
        println!(
            "cargo:warning=.env.example not found at {}",
            env_example_path.display()
        );
        return Ok(());
    }

    let mut out_dir = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    out_dir.push("playlist-toolbox");

    let copied = fs::create_dir_all(&out_dir).and_then(|_| {
        let contents = fs::read_to_string(&env_example_path)?;
        fs::write(out_dir.join(".env.example"), contents)
    });

    if let Err(e) = copied {
        println!(
            "cargo:warning=could not copy .env.example to {}: {}",
            out_dir.display(),
            e
        );
    }

    Ok(())
}

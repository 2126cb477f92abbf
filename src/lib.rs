//! Spotify Playlist Toolbox Library
//!
//! This library manages OAuth2 tokens for the Spotify Web API and wraps the
//! playlist endpoints needed to read, create and fill playlists. Tokens are
//! obtained either through the client-credentials grant or through the
//! authorization-code grant, whose code is captured by a one-shot loopback
//! listener.
//!
//! # Modules
//!
//! - `api` - HTTP handler for the loopback redirect listener
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `error` - Error type shared across the crate
//! - `management` - Token lifecycle management
//! - `server` - One-shot loopback listener for OAuth redirects
//! - `spotify` - Authorization flow and playlist endpoints
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use playlist_toolbox::{config::{self, Config}, management::TokenManager};
//!
//! #[tokio::main]
//! async fn main() -> playlist_toolbox::Result<()> {
//!     config::load_env();
//!     let config = Config::from_env()?;
//!     let mut tokens = TokenManager::from_config(&config)?;
//!     let bearer = tokens.ensure_valid_token().await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod management;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

pub use error::{Error, Result};

/// Prints an informational message with a blue bullet point.
///
/// Creates a formatted output line with a distinctive blue "o" indicator
/// followed by the provided message. Used for general information and
/// status updates.
///
/// # Example
///
/// ```
/// info!("Waiting for the authorization redirect...");
/// info!("Token valid until {}", expires_at);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```
/// success!("Authorization code obtained");
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// This macro will cause the program to exit immediately after printing
/// the error message. It should only be used by the binary for fatal errors
/// where recovery is not possible; library code returns [`Error`] instead.
///
/// # Example
///
/// ```
/// error!("Failed to load configuration");
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used for recoverable issues or important information that users should
/// notice, such as a browser that could not be launched.
///
/// # Example
///
/// ```
/// warning!("Failed to open browser, visit the URL manually");
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a token audit line with a blue bullet point on standard error.
///
/// Standard output is reserved for command results such as playlist JSON,
/// so the audit trail written by the token manager never ends up in a pipe.
///
/// # Example
///
/// ```
/// audit!("Obtained client_credentials token valid until {}", expires_at);
/// ```
#[macro_export]
macro_rules! audit {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

//! # CLI Module
//!
//! Command implementations behind the `playlist-toolbox` binary. Each command
//! receives the startup [`crate::config::Config`], builds the collaborators
//! it needs and reports progress with the crate's output macros.
//!
//! ## Commands
//!
//! - [`auth`] - Runs the interactive authorization-code flow and prints the
//!   code to store as `SPOTIFY_AUTH_CODE`
//! - [`show_playlist`] - Prints a playlist as JSON
//! - [`list_playlist_items`] - Prints a playlist's items as a table or JSON
//! - [`create_playlist`] - Creates a playlist for a user
//! - [`add_playlist_items`] - Adds track or episode URIs to a playlist
//!
//! ## Usage Patterns
//!
//! ```bash
//! playlist-toolbox auth                                  # obtain an authorization code
//! playlist-toolbox playlist show 3cEYpjA9oz9GiPac4AsH4n
//! playlist-toolbox playlist items 3cEYpjA9oz9GiPac4AsH4n --limit 5
//! playlist-toolbox playlist create my_user "Weekly Picks" --private
//! playlist-toolbox playlist add 7d2D2... --uris spotify:track:4iV5W9uYEdYUVa79Axb7Rh
//! ```
//!
//! Failures are fatal: commands print the error and exit with status 1.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

mod auth;
mod playlist;

pub use auth::auth;
pub use playlist::add_playlist_items;
pub use playlist::create_playlist;
pub use playlist::list_playlist_items;
pub use playlist::show_playlist;

/// Steady spinner on standard error, shown while a command waits on the network.
fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb
}

//! Configuration management for the Spotify Playlist Toolbox.
//!
//! This module handles loading and accessing configuration values from
//! environment variables and `.env` files. Values are read once at startup
//! into a [`Config`] which is then handed to the token manager, the
//! authorization flow and the playlist wrapper.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. `.env` file in the working directory
//! 4. Application defaults (where applicable)

use std::{env, path::PathBuf, str::FromStr, time::Duration};

use crate::{Error, Result};

pub const CLIENT_ID: &str = "SPOTIFY_CLIENT_ID";
pub const CLIENT_SECRET: &str = "SPOTIFY_CLIENT_SECRET";
pub const AUTH_CODE: &str = "SPOTIFY_AUTH_CODE";
pub const REDIRECT_PORT: &str = "SPOTIFY_REDIRECT_PORT";
pub const AUTH_SCOPE: &str = "SPOTIFY_AUTH_SCOPE";
pub const AUTH_URL: &str = "SPOTIFY_AUTH_URL";
pub const TOKEN_URL: &str = "SPOTIFY_TOKEN_URL";
pub const API_URL: &str = "SPOTIFY_API_URL";
pub const AUTH_TIMEOUT_SECS: &str = "SPOTIFY_AUTH_TIMEOUT_SECS";
pub const TOKEN_MARGIN_SECS: &str = "SPOTIFY_TOKEN_MARGIN_SECS";

pub const DEFAULT_REDIRECT_PORT: u16 = 3000;
pub const DEFAULT_SCOPE: &str = "playlist-read-private playlist-modify-private playlist-modify-public";
pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_AUTH_TIMEOUT: Duration = Duration::from_secs(300);
pub const DEFAULT_TOKEN_MARGIN: Duration = Duration::from_secs(600);

/// Loads environment variables from `.env` files.
///
/// Looks for a `.env` file in the platform-specific local data directory
/// under `playlist-toolbox/.env` first, then in the working directory.
/// Variables already present in the process environment are never
/// overridden, and missing files are not an error.
///
/// # Directory Structure
///
/// - Linux: `~/.local/share/playlist-toolbox/.env`
/// - macOS: `~/Library/Application Support/playlist-toolbox/.env`
/// - Windows: `%LOCALAPPDATA%/playlist-toolbox/.env`
pub fn load_env() {
    let _ = dotenv::from_path(env_path());
    let _ = dotenv::dotenv();
}

/// Location of the data-directory `.env` file.
pub fn env_path() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("playlist-toolbox/.env");
    path
}

/// Runtime configuration, read once at startup.
#[derive(Clone)]
pub struct Config {
    pub client_id: String,
    pub client_secret: String,
    /// Authorization code from a previous `auth` run; selects the
    /// authorization-code grant when present.
    pub auth_code: Option<String>,
    pub redirect_port: u16,
    pub scope: String,
    pub auth_url: String,
    pub token_url: String,
    pub api_url: String,
    pub auth_timeout: Duration,
    pub token_margin: Duration,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("auth_code", &self.auth_code.as_ref().map(|_| "<redacted>"))
            .field("redirect_port", &self.redirect_port)
            .field("scope", &self.scope)
            .field("auth_url", &self.auth_url)
            .field("token_url", &self.token_url)
            .field("api_url", &self.api_url)
            .field("auth_timeout", &self.auth_timeout)
            .field("token_margin", &self.token_margin)
            .finish()
    }
}

impl Config {
    /// Reads the configuration from the process environment.
    ///
    /// Call [`load_env`] beforehand to pick up `.env` files.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// Empty values are treated as absent. Client id and secret are
    /// required; everything else falls back to a default.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the client id or secret is missing or
    /// when a numeric variable cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let client_id = get(CLIENT_ID).ok_or_else(|| missing(CLIENT_ID))?;
        let client_secret = get(CLIENT_SECRET).ok_or_else(|| missing(CLIENT_SECRET))?;

        Ok(Self {
            client_id,
            client_secret,
            auth_code: get(AUTH_CODE),
            redirect_port: parse_or(get(REDIRECT_PORT), REDIRECT_PORT, DEFAULT_REDIRECT_PORT)?,
            scope: get(AUTH_SCOPE).unwrap_or_else(|| DEFAULT_SCOPE.to_string()),
            auth_url: get(AUTH_URL).unwrap_or_else(|| DEFAULT_AUTH_URL.to_string()),
            token_url: get(TOKEN_URL).unwrap_or_else(|| DEFAULT_TOKEN_URL.to_string()),
            api_url: get(API_URL).unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            auth_timeout: parse_or(get(AUTH_TIMEOUT_SECS), AUTH_TIMEOUT_SECS, DEFAULT_AUTH_TIMEOUT.as_secs())
                .map(Duration::from_secs)?,
            token_margin: parse_or(get(TOKEN_MARGIN_SECS), TOKEN_MARGIN_SECS, DEFAULT_TOKEN_MARGIN.as_secs())
                .map(Duration::from_secs)?,
        })
    }

    /// Redirect URI registered with Spotify, `http://localhost:<port>`.
    pub fn redirect_uri(&self) -> String {
        format!("http://localhost:{}", self.redirect_port)
    }
}

fn missing(key: &str) -> Error {
    Error::Config(format!(
        "{key} must be set (environment or {})",
        env_path().display()
    ))
}

fn parse_or<T: FromStr>(value: Option<String>, key: &str, default: T) -> Result<T> {
    match value {
        Some(raw) => raw
            .parse()
            .map_err(|_| Error::Config(format!("{key} has an invalid value: {raw}"))),
        None => Ok(default),
    }
}

//! Error taxonomy shared by the token manager, the redirect listener, the
//! authorization flow and the playlist wrapper.

use std::{net::SocketAddr, time::Duration};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Missing or invalid local configuration, detected before any network call.
    #[error("configuration error: {0}")]
    Config(String),

    /// The authorization server rejected a token exchange.
    #[error("token exchange failed with status {status}: {body}")]
    Auth { status: u16, body: String },

    /// The redirect carried a state value that does not match the one we sent.
    #[error(
        "state mismatch on authorization redirect (expected {expected}, got {received}), possible CSRF, do not proceed"
    )]
    Security { expected: String, received: String },

    #[error("network error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("failed to bind redirect listener on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("redirect listener failed: {0}")]
    Listener(#[from] std::io::Error),

    #[error("no authorization redirect received within {0:?}")]
    Timeout(Duration),

    #[error("authorization was not granted: {0}")]
    AuthorizationDenied(String),

    /// Non-success response from the Web API.
    #[error("api request failed with status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("unexpected response body: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// True for transport-level failures reaching a server or binding the
    /// loopback listener.
    pub fn is_network(&self) -> bool {
        matches!(self, Error::Http(_) | Error::Bind { .. } | Error::Listener(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

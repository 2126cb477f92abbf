use std::fmt;

use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tabled::Tabled;

use crate::{Error, Result};

/// Client id and secret issued by the Spotify developer dashboard.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    id: String,
    secret: String,
}

impl Credentials {
    /// Fails with [`Error::Config`] when either value is empty.
    pub fn new(id: impl Into<String>, secret: impl Into<String>) -> Result<Self> {
        let id = id.into();
        let secret = secret.into();
        if id.trim().is_empty() || secret.trim().is_empty() {
            return Err(Error::Config(
                "client id and client secret must both be set".to_string(),
            ));
        }
        Ok(Self { id, secret })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Value of the `Authorization` header for the token endpoint.
    pub fn basic_authorization(&self) -> String {
        let encoded = STANDARD.encode(format!("{}:{}", self.id, self.secret));
        format!("Basic {encoded}")
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("id", &self.id)
            .field("secret", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrantMode {
    ClientCredentials,
    AuthorizationCode,
}

impl fmt::Display for GrantMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrantMode::ClientCredentials => f.write_str("client_credentials"),
            GrantMode::AuthorizationCode => f.write_str("authorization_code"),
        }
    }
}

/// In-memory token state owned by the token manager.
#[derive(Debug, Clone, Default)]
pub struct TokenState {
    pub access_token: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub refresh_token: Option<String>,
    pub granted_scope: Option<String>,
}

/// Successful response of the token endpoint.
///
/// Only the fields the manager acts on are kept; `token_type` is always
/// `Bearer` and is ignored along with anything else Spotify adds.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

/// One authorization attempt, alive from URL construction until the
/// redirect has been validated.
#[derive(Debug, Clone)]
pub struct PendingAuthorization {
    pub state_nonce: String,
    pub scope: String,
    pub redirect_port: u16,
}

/// Query parameters captured from the authorization redirect.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RedirectCallbackParams {
    pub code: String,
    pub state: String,
    /// Set by Spotify when the user declines, e.g. `access_denied`.
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PlaylistQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PlaylistItemsQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub public: bool,
    pub collaborative: bool,
}

impl CreatePlaylistRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            public: true,
            collaborative: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddItemsRequest {
    pub uris: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,
}

#[derive(Tabled)]
pub struct PlaylistItemTableRow {
    pub name: String,
    pub artists: String,
    pub uri: String,
}

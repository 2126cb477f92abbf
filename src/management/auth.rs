use std::time::Duration;

use chrono::{TimeDelta, Utc};
use reqwest::{Client, header::AUTHORIZATION};

use crate::{
    Error, Result,
    config::{Config, DEFAULT_TOKEN_MARGIN, DEFAULT_TOKEN_URL},
    audit,
    types::{Credentials, GrantMode, TokenResponse, TokenState},
};

/// Lifetime assumed when the token endpoint omits `expires_in`.
const DEFAULT_EXPIRES_IN: u64 = 3600;

/// Owns the bearer token for one set of client credentials.
///
/// The manager is created once at startup and passed by mutable reference
/// to everything that needs an access token. Acquisition takes `&mut self`,
/// so one instance can never run two refreshes at the same time; share it
/// behind a `tokio::sync::Mutex` if several tasks need it.
///
/// Which grant is sent to the token endpoint depends on the mode and on
/// what the manager already holds:
///
/// | Mode | Refresh token held | Grant sent |
/// |---|---|---|
/// | client credentials | - | `client_credentials` |
/// | authorization code | no | `authorization_code` with `code` and `redirect_uri` |
/// | authorization code | yes | `refresh_token` |
///
/// Every exchange authenticates with HTTP Basic auth built from the client
/// id and secret.
pub struct TokenManager {
    credentials: Credentials,
    mode: GrantMode,
    authorization_code: Option<String>,
    redirect_uri: String,
    token_url: String,
    safety_margin: Duration,
    state: TokenState,
    client: Client,
}

impl TokenManager {
    /// App-level access through the client-credentials grant.
    ///
    /// No user is involved, so only public catalogue data and public
    /// playlists are reachable with the resulting token.
    ///
    /// # Arguments
    ///
    /// * `credentials` - Client id and secret of the registered application
    ///
    /// # Example
    ///
    /// ```
    /// let credentials = Credentials::new("client", "secret")?;
    /// let mut tokens = TokenManager::client_credentials(credentials);
    /// let bearer = tokens.ensure_valid_token().await?;
    /// ```
    pub fn client_credentials(credentials: Credentials) -> Self {
        Self {
            credentials,
            mode: GrantMode::ClientCredentials,
            authorization_code: None,
            redirect_uri: String::new(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            safety_margin: DEFAULT_TOKEN_MARGIN,
            state: TokenState::default(),
            client: Client::new(),
        }
    }

    /// User-level access through the authorization-code grant.
    ///
    /// The code is exchanged on the first call to
    /// [`ensure_valid_token`](Self::ensure_valid_token); afterwards the
    /// manager renews through the refresh token handed out with it.
    ///
    /// # Arguments
    ///
    /// * `credentials` - Client id and secret of the registered application
    /// * `code` - Code captured by the redirect listener, see
    ///   [`AuthorizationFlow::run`](crate::spotify::auth::AuthorizationFlow::run)
    /// * `redirect_port` - Port the code was obtained with; the token endpoint
    ///   checks that the redirect URI matches
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when no authorization code is available.
    pub fn authorization_code(
        credentials: Credentials,
        code: Option<String>,
        redirect_port: u16,
    ) -> Result<Self> {
        let code = code.filter(|c| !c.trim().is_empty()).ok_or_else(|| {
            Error::Config(
                "no authorization code available, run `playlist-toolbox auth` first and store the code"
                    .to_string(),
            )
        })?;

        Ok(Self {
            mode: GrantMode::AuthorizationCode,
            authorization_code: Some(code),
            redirect_uri: format!("http://localhost:{redirect_port}"),
            ..Self::client_credentials(credentials)
        })
    }

    /// Picks the grant from the configuration: authorization code when one is
    /// stored, client credentials otherwise.
    ///
    /// Token endpoint and safety margin are taken from the configuration too.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the client id or secret is empty.
    pub fn from_config(config: &Config) -> Result<Self> {
        let credentials = Credentials::new(&config.client_id, &config.client_secret)?;
        let manager = match &config.auth_code {
            Some(code) => {
                Self::authorization_code(credentials, Some(code.clone()), config.redirect_port)?
            }
            None => Self::client_credentials(credentials),
        };

        Ok(manager
            .with_token_url(&config.token_url)
            .with_safety_margin(config.token_margin))
    }

    /// Overrides the token endpoint, mainly to point it at a test server.
    pub fn with_token_url(mut self, token_url: impl Into<String>) -> Self {
        self.token_url = token_url.into();
        self
    }

    /// Minimum remaining lifetime a returned token must have.
    ///
    /// A token endpoint that grants less than this is treated as a failed
    /// exchange, so keep the margin below the lifetime the server hands out.
    pub fn with_safety_margin(mut self, margin: Duration) -> Self {
        self.safety_margin = margin;
        self
    }

    /// Grant mode chosen at construction.
    pub fn mode(&self) -> GrantMode {
        self.mode
    }

    /// Snapshot of the held token, its expiry, refresh token and scope.
    pub fn state(&self) -> &TokenState {
        &self.state
    }

    pub fn safety_margin(&self) -> Duration {
        self.safety_margin
    }

    /// True when no token is held or the held one expires within the margin.
    pub fn needs_refresh(&self) -> bool {
        match (&self.state.access_token, self.state.expires_at) {
            (Some(_), Some(expires_at)) => expires_at - Utc::now() < self.margin(),
            _ => true,
        }
    }

    /// Returns an access token that stays valid for at least the safety
    /// margin, fetching a new one only when needed.
    ///
    /// A cached token is returned without any network traffic. Otherwise
    /// the grant for the current mode is exchanged, the new expiry is stored
    /// and an audit line naming the grant, expiry and scope is written to
    /// standard error.
    ///
    /// # Returns
    ///
    /// The bearer token to put in the `Authorization` header.
    ///
    /// # Errors
    ///
    /// - [`Error::Auth`] when the token endpoint answers with a non-success
    ///   status, or grants a lifetime that is out of range or shorter than
    ///   the safety margin
    /// - [`Error::Http`] when the token endpoint cannot be reached
    /// - [`Error::Json`] when the token response cannot be parsed
    /// - [`Error::Config`] when the authorization code is missing
    ///
    /// # Example
    ///
    /// ```
    /// let mut tokens = TokenManager::from_config(&config)?;
    /// let bearer = tokens.ensure_valid_token().await?;
    /// let again = tokens.ensure_valid_token().await?; // cached, no request
    /// assert_eq!(bearer, again);
    /// ```
    pub async fn ensure_valid_token(&mut self) -> Result<String> {
        if !self.needs_refresh() {
            if let Some(token) = &self.state.access_token {
                return Ok(token.clone());
            }
        }

        self.acquire().await
    }

    /// Drops the cached access token and fetches a new one right away.
    ///
    /// Used after the Web API rejected a token that still looked valid. The
    /// refresh token is kept, so authorization-code mode renews through it.
    ///
    /// # Errors
    ///
    /// Same as [`ensure_valid_token`](Self::ensure_valid_token).
    pub async fn force_refresh(&mut self) -> Result<String> {
        self.state.access_token = None;
        self.state.expires_at = None;
        self.acquire().await
    }

    fn margin(&self) -> TimeDelta {
        TimeDelta::from_std(self.safety_margin).unwrap_or(TimeDelta::MAX)
    }

    fn grant_form(&self) -> Result<Vec<(&'static str, String)>> {
        match self.mode {
            GrantMode::ClientCredentials => {
                Ok(vec![("grant_type", "client_credentials".to_string())])
            }
            GrantMode::AuthorizationCode => match &self.state.refresh_token {
                Some(refresh_token) => Ok(vec![
                    ("grant_type", "refresh_token".to_string()),
                    ("refresh_token", refresh_token.clone()),
                ]),
                None => {
                    let code = self.authorization_code.clone().ok_or_else(|| {
                        Error::Config(
                            "no authorization code available, run `playlist-toolbox auth` first"
                                .to_string(),
                        )
                    })?;
                    Ok(vec![
                        ("grant_type", "authorization_code".to_string()),
                        ("code", code),
                        ("redirect_uri", self.redirect_uri.clone()),
                    ])
                }
            },
        }
    }

    async fn acquire(&mut self) -> Result<String> {
        let form = self.grant_form()?;

        let response = self
            .client
            .post(&self.token_url)
            .header(AUTHORIZATION, self.credentials.basic_authorization())
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(Error::Auth {
                status: status.as_u16(),
                body,
            });
        }

        let token: TokenResponse = serde_json::from_str(&body)?;
        let expires_in = token.expires_in.unwrap_or(DEFAULT_EXPIRES_IN);
        let expires_at = i64::try_from(expires_in)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .and_then(|lifetime| Utc::now().checked_add_signed(lifetime))
            .ok_or_else(|| Error::Auth {
                status: status.as_u16(),
                body: format!("token lifetime of {expires_in}s is out of range"),
            })?;

        if self.mode == GrantMode::AuthorizationCode {
            // Spotify may omit a rotated refresh token; the last one stays valid then.
            if let Some(refresh_token) = token.refresh_token {
                self.state.refresh_token = Some(refresh_token);
            }
            if token.scope.is_some() {
                self.state.granted_scope = token.scope;
            }
        }

        if expires_at - Utc::now() < self.margin() {
            return Err(Error::Auth {
                status: status.as_u16(),
                body: format!(
                    "token lifetime of {}s is shorter than the {}s safety margin",
                    expires_in,
                    self.safety_margin.as_secs()
                ),
            });
        }

        self.state.access_token = Some(token.access_token.clone());
        self.state.expires_at = Some(expires_at);

        audit!(
            "Obtained {} token valid until {} (scope: {})",
            self.mode,
            expires_at.to_rfc3339(),
            self.state.granted_scope.as_deref().unwrap_or("-")
        );

        Ok(token.access_token)
    }
}

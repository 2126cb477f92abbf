use std::{io, time::Duration};

use reqwest::Url;

use crate::{
    Error, Result,
    config::{Config, DEFAULT_AUTH_TIMEOUT, DEFAULT_AUTH_URL},
    info,
    server::RedirectListener,
    types::{PendingAuthorization, RedirectCallbackParams},
    utils, warning,
};

/// Hands the authorization URL to the user.
///
/// The flow only needs the URL to reach the user somehow; a failure is
/// reported as a warning and the user can still copy the printed URL.
pub trait Browser {
    fn open(&self, url: &str) -> io::Result<()>;
}

/// Opens URLs in the platform's default browser.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemBrowser;

impl Browser for SystemBrowser {
    fn open(&self, url: &str) -> io::Result<()> {
        webbrowser::open(url)
    }
}

/// Interactive authorization-code flow.
///
/// The flow binds the loopback listener, sends the user to Spotify's consent
/// page and waits for the redirect carrying the authorization code. The code
/// is returned to the caller, who stores it for the token manager.
///
/// # Example
///
/// ```
/// let flow = AuthorizationFlow::from_config(&config);
/// let code = flow.run("playlist-modify-private").await?;
/// ```
pub struct AuthorizationFlow<B = SystemBrowser> {
    client_id: String,
    auth_url: String,
    redirect_port: u16,
    timeout: Duration,
    browser: B,
}

impl AuthorizationFlow<SystemBrowser> {
    /// Creates a flow for `client_id` that listens on `redirect_port`, using
    /// Spotify's consent page, the default timeout and the system browser.
    ///
    /// Port 0 lets the OS choose; the redirect URI then carries the chosen
    /// port, which must be registered with the Spotify application.
    pub fn new(client_id: impl Into<String>, redirect_port: u16) -> Self {
        Self {
            client_id: client_id.into(),
            auth_url: DEFAULT_AUTH_URL.to_string(),
            redirect_port,
            timeout: DEFAULT_AUTH_TIMEOUT,
            browser: SystemBrowser,
        }
    }

    /// Takes client id, port, consent URL and timeout from the configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.client_id, config.redirect_port)
            .with_auth_url(&config.auth_url)
            .with_timeout(config.auth_timeout)
    }
}

impl<B: Browser> AuthorizationFlow<B> {
    /// Replaces the browser, e.g. with one that prints the URL only.
    pub fn with_browser<C: Browser>(self, browser: C) -> AuthorizationFlow<C> {
        AuthorizationFlow {
            client_id: self.client_id,
            auth_url: self.auth_url,
            redirect_port: self.redirect_port,
            timeout: self.timeout,
            browser,
        }
    }

    /// Overrides the consent page URL.
    pub fn with_auth_url(mut self, auth_url: impl Into<String>) -> Self {
        self.auth_url = auth_url.into();
        self
    }

    /// Upper bound on the wait for the redirect.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builds the consent URL for one pending authorization.
    ///
    /// The query carries `client_id`, `response_type=code`, the loopback
    /// `redirect_uri`, the requested `scope` and the `state` nonce, all
    /// form-encoded.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the configured consent URL is not a
    /// valid URL.
    pub fn authorization_url(&self, pending: &PendingAuthorization) -> Result<String> {
        let redirect_uri = format!("http://localhost:{}", pending.redirect_port);
        let url = Url::parse_with_params(
            &self.auth_url,
            &[
                ("client_id", self.client_id.as_str()),
                ("response_type", "code"),
                ("redirect_uri", redirect_uri.as_str()),
                ("scope", pending.scope.as_str()),
                ("state", pending.state_nonce.as_str()),
            ],
        )
        .map_err(|e| Error::Config(format!("invalid authorization URL {}: {e}", self.auth_url)))?;

        Ok(url.to_string())
    }

    /// Runs the flow and returns the authorization code.
    ///
    /// This function performs the following steps:
    /// 1. Binds the loopback listener, so a taken port fails before anything
    ///    is shown to the user
    /// 2. Generates a fresh state nonce and builds the consent URL
    /// 3. Starts waiting for the redirect in a background task
    /// 4. Prints the URL and opens it in the browser
    /// 5. Checks the captured redirect against the nonce
    ///
    /// # Arguments
    ///
    /// * `scope` - Space separated scopes to request
    ///
    /// # Returns
    ///
    /// The authorization code, ready for
    /// [`TokenManager::authorization_code`](crate::management::TokenManager::authorization_code).
    ///
    /// # Errors
    ///
    /// - [`Error::Bind`] when the redirect port is taken
    /// - [`Error::Timeout`] when no redirect arrives in time
    /// - [`Error::Security`] when the redirect's state does not match
    /// - [`Error::AuthorizationDenied`] when the user declined
    ///
    /// # Example
    ///
    /// ```
    /// let code = AuthorizationFlow::new("client", 3000)
    ///     .with_timeout(Duration::from_secs(120))
    ///     .run("playlist-read-private")
    ///     .await?;
    /// println!("SPOTIFY_AUTH_CODE={}", code);
    /// ```
    pub async fn run(&self, scope: &str) -> Result<String> {
        let listener = RedirectListener::bind(self.redirect_port).await?;
        let pending = PendingAuthorization {
            state_nonce: utils::generate_state_nonce(),
            scope: scope.to_string(),
            redirect_port: listener.port(),
        };
        let url = self.authorization_url(&pending)?;

        let waiting = tokio::spawn(listener.accept_once(self.timeout));

        info!("Visit the URL to authorize:\n{}", url);
        if self.browser.open(&url).is_err() {
            warning!("Failed to open browser. Please navigate to the URL above manually.");
        }

        let params = waiting
            .await
            .map_err(|e| Error::Listener(io::Error::other(e)))??;

        verify_redirect(pending, params)
    }
}

/// Checks a captured redirect against the authorization it answers.
///
/// The state is compared first so that a forged redirect never yields a
/// code, whatever else it carries.
///
/// # Errors
///
/// - [`Error::Security`] when the state differs from the nonce
/// - [`Error::AuthorizationDenied`] when the redirect carries `error` or no
///   code
pub fn verify_redirect(
    pending: PendingAuthorization,
    params: RedirectCallbackParams,
) -> Result<String> {
    if params.state != pending.state_nonce {
        return Err(Error::Security {
            expected: pending.state_nonce,
            received: params.state,
        });
    }

    if let Some(error) = params.error {
        return Err(Error::AuthorizationDenied(error));
    }

    if params.code.is_empty() {
        return Err(Error::AuthorizationDenied(
            "redirect carried no authorization code".to_string(),
        ));
    }

    Ok(params.code)
}

use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::Value;

use crate::{
    Error, Result,
    config::{Config, DEFAULT_API_URL},
    management::TokenManager,
    types::{AddItemsRequest, CreatePlaylistRequest, PlaylistItemsQuery, PlaylistQuery},
};

/// Thin wrapper over the playlist endpoints of the Spotify Web API.
///
/// Responses are passed through as JSON. Every call asks the injected
/// [`TokenManager`] for a valid token first and sends it as a bearer header.
///
/// # Error handling
///
/// All endpoints share the same failure modes:
///
/// - token errors from [`TokenManager::ensure_valid_token`] are returned
///   before the API is contacted
/// - a 401 triggers one forced refresh and one retry
/// - any other non-success status becomes [`Error::Api`] with the body
/// - transport failures become [`Error::Http`]
///
/// # Example
///
/// ```
/// let api = PlaylistApi::from_config(&config);
/// let mut tokens = TokenManager::from_config(&config)?;
/// let playlist = api
///     .get_playlist(&mut tokens, "3cEYpjA9oz9GiPac4AsH4n", &PlaylistQuery::default())
///     .await?;
/// println!("{}", playlist["name"]);
/// ```
#[derive(Debug, Clone)]
pub struct PlaylistApi {
    api_url: String,
    client: Client,
}

impl Default for PlaylistApi {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

impl PlaylistApi {
    /// Creates a wrapper for the Web API rooted at `api_url`, e.g.
    /// `https://api.spotify.com/v1`. A trailing slash is ignored.
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into().trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    /// Uses the API base URL from the configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.api_url)
    }

    /// `GET /playlists/{playlist_id}`
    ///
    /// # Arguments
    ///
    /// * `tokens` - Token manager supplying the bearer token
    /// * `playlist_id` - Spotify id of the playlist
    /// * `query` - Optional `market` and `fields`; absent options are not sent
    pub async fn get_playlist(
        &self,
        tokens: &mut TokenManager,
        playlist_id: &str,
        query: &PlaylistQuery,
    ) -> Result<Value> {
        let url = format!("{}/playlists/{}", self.api_url, playlist_id);
        self.send(tokens, |client, token| {
            client.get(&url).query(query).bearer_auth(token)
        })
        .await
    }

    /// `GET /playlists/{playlist_id}/tracks`
    ///
    /// Returns one page of items; `limit` and `offset` in `query` select it.
    pub async fn get_playlist_items(
        &self,
        tokens: &mut TokenManager,
        playlist_id: &str,
        query: &PlaylistItemsQuery,
    ) -> Result<Value> {
        let url = format!("{}/playlists/{}/tracks", self.api_url, playlist_id);
        self.send(tokens, |client, token| {
            client.get(&url).query(query).bearer_auth(token)
        })
        .await
    }

    /// `POST /users/{user_id}/playlists`
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRequest`] without touching the network when the
    /// playlist is both public and collaborative, which Spotify does not allow.
    pub async fn create_playlist(
        &self,
        tokens: &mut TokenManager,
        user_id: &str,
        request: &CreatePlaylistRequest,
    ) -> Result<Value> {
        if request.collaborative && request.public {
            return Err(Error::InvalidRequest(
                "a collaborative playlist cannot be public".to_string(),
            ));
        }

        let url = format!("{}/users/{}/playlists", self.api_url, user_id);
        self.send(tokens, |client, token| {
            client.post(&url).json(request).bearer_auth(token)
        })
        .await
    }

    /// `POST /playlists/{playlist_id}/tracks`
    ///
    /// Without a `position` the items are appended.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRequest`] when no URIs are given.
    pub async fn add_items_to_playlist(
        &self,
        tokens: &mut TokenManager,
        playlist_id: &str,
        request: &AddItemsRequest,
    ) -> Result<Value> {
        if request.uris.is_empty() {
            return Err(Error::InvalidRequest("no item URIs given".to_string()));
        }

        let url = format!("{}/playlists/{}/tracks", self.api_url, playlist_id);
        self.send(tokens, |client, token| {
            client.post(&url).json(request).bearer_auth(token)
        })
        .await
    }

    /// Sends the request built by `build`, retrying once with a fresh token
    /// when the API answers 401.
    async fn send<F>(&self, tokens: &mut TokenManager, build: F) -> Result<Value>
    where
        F: Fn(&Client, &str) -> RequestBuilder,
    {
        let token = tokens.ensure_valid_token().await?;
        let mut response = build(&self.client, &token).send().await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            let token = tokens.force_refresh().await?;
            response = build(&self.client, &token).send().await?;
        }

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(Error::Api {
                status: status.as_u16(),
                body,
            });
        }

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&body)?)
    }
}

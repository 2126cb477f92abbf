//! # Spotify Integration Module
//!
//! This module talks to Spotify's accounts service and Web API. It holds the
//! interactive authorization-code flow and the playlist endpoint wrapper;
//! token acquisition itself lives in [`crate::management::TokenManager`].
//!
//! ## Architecture
//!
//! ```text
//! CLI
//!  ├── auth ──> AuthorizationFlow ──> RedirectListener (loopback, one shot)
//!  └── playlist ──> PlaylistApi ──> TokenManager ──> /api/token
//!                        │
//!                        └──> Web API (bearer token)
//! ```
//!
//! ## Authentication Strategy
//!
//! Two OAuth 2.0 grants are supported:
//!
//! - **Client credentials**: app-level access to public playlists, no user
//!   interaction.
//! - **Authorization code**: user-level access. [`auth::AuthorizationFlow`]
//!   sends the user to the consent page with a random `state`, captures the
//!   redirect on `http://localhost:<port>` and rejects any redirect whose
//!   state does not match. The code it yields is exchanged once; later
//!   tokens come from the refresh token.
//!
//! ## API Coverage
//!
//! - `GET /playlists/{id}` - Playlist details
//! - `GET /playlists/{id}/tracks` - Playlist items
//! - `POST /users/{user_id}/playlists` - Create a playlist
//! - `POST /playlists/{id}/tracks` - Add items to a playlist
//!
//! ## Error Handling
//!
//! Failures are returned as [`crate::Error`] without retries. The only
//! exception is a single retry with a freshly fetched token when the Web API
//! answers 401.
//!
//! ## Usage Patterns
//!
//! ```rust
//! let mut tokens = TokenManager::from_config(&config)?;
//! let api = PlaylistApi::from_config(&config);
//! let playlist = api
//!     .get_playlist(&mut tokens, "3cEYpjA9oz9GiPac4AsH4n", &PlaylistQuery::default())
//!     .await?;
//! ```

pub mod auth;
pub mod playlist;

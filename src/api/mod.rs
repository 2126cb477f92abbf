//! # API Module
//!
//! HTTP handlers served by the loopback redirect listener in
//! [`crate::server`]. Spotify redirects the user's browser to
//! `http://localhost:<port>/?code=...&state=...` after consent; the
//! [`callback`] handler records those parameters in a [`CallbackCapture`]
//! and answers with a short confirmation page.
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use axum::{Extension, Router, routing::get};
//! use playlist_toolbox::api::{CallbackCapture, callback};
//!
//! let capture = Arc::new(CallbackCapture::default());
//! let app = Router::new()
//!     .route("/", get(callback))
//!     .layer(Extension(capture));
//! ```

mod callback;

pub use callback::{CallbackCapture, callback};

use std::{
    future::IntoFuture,
    io,
    net::{Ipv4Addr, SocketAddr},
    sync::Arc,
    time::Duration,
};

use axum::{Extension, Router, routing::get};
use tokio::net::TcpListener;

use crate::{
    Error, Result,
    api::{self, CallbackCapture},
    types::RedirectCallbackParams,
};

/// Time granted to in-flight connections once the redirect was captured.
pub const DRAIN_GRACE: Duration = Duration::from_secs(1);

/// Loopback listener that serves exactly one authorization redirect.
///
/// Binding and waiting are separate steps so a bind failure surfaces before
/// the user is sent to the browser.
#[derive(Debug)]
pub struct RedirectListener {
    listener: TcpListener,
    addr: SocketAddr,
}

impl RedirectListener {
    /// Binds `127.0.0.1:<port>`. Port 0 picks a free ephemeral port.
    pub async fn bind(port: u16) -> Result<Self> {
        let addr = SocketAddr::from((Ipv4Addr::LOCALHOST, port));
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| Error::Bind { addr, source })?;
        let addr = listener.local_addr()?;

        Ok(Self { listener, addr })
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    pub fn redirect_uri(&self) -> String {
        format!("http://localhost:{}", self.port())
    }

    /// Serves until the first GET on `/` has been answered, then shuts down
    /// and returns its query parameters.
    ///
    /// After the capture, other connections get [`DRAIN_GRACE`] to complete
    /// before the serve future is dropped. The socket is closed before this
    /// returns, whether a redirect arrived, the timeout elapsed or serving
    /// failed.
    ///
    /// # Arguments
    ///
    /// * `timeout` - Upper bound on the wait for the redirect
    ///
    /// # Errors
    ///
    /// - [`Error::Timeout`] when no redirect arrives within `timeout`
    /// - [`Error::Listener`] when serving fails
    pub async fn accept_once(self, timeout: Duration) -> Result<RedirectCallbackParams> {
        let capture = Arc::new(CallbackCapture::default());
        let app = Router::new()
            .route("/", get(api::callback))
            .layer(Extension(Arc::clone(&capture)));

        let signal = Arc::clone(&capture);
        let serve = axum::serve(self.listener, app)
            .with_graceful_shutdown(async move { signal.received().await })
            .into_future();
        tokio::pin!(serve);

        let served = tokio::time::timeout(timeout, async {
            tokio::select! {
                result = &mut serve => result.map(|_| false),
                _ = capture.received() => Ok(true),
            }
        })
        .await;

        // Connections still open after the capture get a short grace period
        // to finish; a stalled one is cut off with the serve future.
        if let Ok(Ok(true)) = served {
            let _ = tokio::time::timeout(DRAIN_GRACE, &mut serve).await;
        }

        // A redirect captured while draining still counts.
        if let Some(params) = capture.take().await {
            return Ok(params);
        }

        match served {
            Ok(result) => {
                result?;
                Err(Error::Listener(io::Error::other(
                    "listener stopped before a redirect arrived",
                )))
            }
            Err(_) => Err(Error::Timeout(timeout)),
        }
    }
}

/// Binds `port`, waits for one redirect and returns its parameters.
pub async fn listen_once(port: u16, timeout: Duration) -> Result<RedirectCallbackParams> {
    RedirectListener::bind(port).await?.accept_once(timeout).await
}

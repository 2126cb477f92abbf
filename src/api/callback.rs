use std::{collections::HashMap, sync::Arc};

use axum::{Extension, extract::Query, response::Html};
use tokio::sync::{Mutex, watch};

use crate::types::RedirectCallbackParams;

/// Slot shared by the callback handler and the listener waiting on it.
///
/// Only the first redirect is recorded; later requests leave it untouched.
/// Any number of tasks may wait on [`received`](Self::received).
#[derive(Debug)]
pub struct CallbackCapture {
    params: Mutex<Option<RedirectCallbackParams>>,
    received: watch::Sender<bool>,
}

impl Default for CallbackCapture {
    fn default() -> Self {
        Self {
            params: Mutex::new(None),
            received: watch::Sender::new(false),
        }
    }
}

impl CallbackCapture {
    /// Resolves once the first redirect has been recorded.
    pub async fn received(&self) {
        let mut receiver = self.received.subscribe();
        // The sender lives as long as `self`, so the wait cannot fail.
        let _ = receiver.wait_for(|received| *received).await;
    }

    pub async fn take(&self) -> Option<RedirectCallbackParams> {
        self.params.lock().await.take()
    }
}

pub async fn callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(capture): Extension<Arc<CallbackCapture>>,
) -> Html<&'static str> {
    let mut slot = capture.params.lock().await;
    if slot.is_some() {
        return Html("<h4>Authorization already received.</h4>");
    }

    let captured = RedirectCallbackParams {
        code: params.get("code").cloned().unwrap_or_default(),
        state: params.get("state").cloned().unwrap_or_default(),
        error: params.get("error").cloned(),
    };
    let granted = captured.error.is_none() && !captured.code.is_empty();

    *slot = Some(captured);
    drop(slot);
    capture.received.send_replace(true);

    if granted {
        Html("<h2>Authorization received.</h2><p>Close browser window and return to the terminal.</p>")
    } else {
        Html("<h4>Authorization was not granted.</h4><p>Close browser window.</p>")
    }
}

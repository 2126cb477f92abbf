use std::{
    io,
    sync::{Arc, Mutex},
    time::Duration,
};

use playlist_toolbox::{
    Error,
    server::RedirectListener,
    spotify::auth::{AuthorizationFlow, Browser, verify_redirect},
    types::{PendingAuthorization, RedirectCallbackParams},
};
use reqwest::Url;

const SCOPE: &str = "playlist-modify-private playlist-modify-public";

// Plays the user's browser: records the URL and follows the redirect back to
// the loopback listener, optionally with a forged state.
#[derive(Clone, Default)]
struct FakeBrowser {
    opened: Arc<Mutex<Option<String>>>,
    forged_state: Option<String>,
}

impl Browser for FakeBrowser {
    fn open(&self, url: &str) -> io::Result<()> {
        *self.opened.lock().unwrap() = Some(url.to_string());

        let parsed = Url::parse(url).map_err(io::Error::other)?;
        let query = |key: &str| {
            parsed
                .query_pairs()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.to_string())
                .unwrap_or_default()
        };
        let redirect = query("redirect_uri").replace("localhost", "127.0.0.1");
        let state = self.forged_state.clone().unwrap_or_else(|| query("state"));

        tokio::spawn(async move {
            let _ = reqwest::get(format!("{redirect}/?code=ABC&state={state}")).await;
        });
        Ok(())
    }
}

// A browser that cannot be launched; nobody ever follows the URL.
struct BrokenBrowser;

impl Browser for BrokenBrowser {
    fn open(&self, _url: &str) -> io::Result<()> {
        Err(io::Error::other("no browser available"))
    }
}

fn flow() -> AuthorizationFlow {
    AuthorizationFlow::new("client", 0).with_timeout(Duration::from_secs(5))
}

fn pending(state: &str) -> PendingAuthorization {
    PendingAuthorization {
        state_nonce: state.to_string(),
        scope: SCOPE.to_string(),
        redirect_port: 3000,
    }
}

#[tokio::test]
async fn test_run_returns_code_for_matching_state() {
    let browser = FakeBrowser::default();
    let flow = flow().with_browser(browser.clone());

    let code = flow.run(SCOPE).await.unwrap();
    assert_eq!(code, "ABC");

    let opened = browser.opened.lock().unwrap().clone().unwrap();
    assert!(opened.starts_with("https://accounts.spotify.com/authorize?"));
    assert!(opened.contains("client_id=client"));
    assert!(opened.contains("response_type=code"));
}

#[tokio::test]
async fn test_run_rejects_forged_state() {
    let browser = FakeBrowser {
        forged_state: Some("123".to_string()),
        ..FakeBrowser::default()
    };
    let flow = flow().with_browser(browser);

    let err = flow.run(SCOPE).await.unwrap_err();
    match err {
        Error::Security { received, .. } => assert_eq!(received, "123"),
        other => panic!("expected security error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_run_times_out_without_redirect() {
    let flow = AuthorizationFlow::new("client", 0)
        .with_timeout(Duration::from_millis(200))
        .with_browser(BrokenBrowser);

    let err = flow.run(SCOPE).await.unwrap_err();
    assert!(matches!(err, Error::Timeout(_)));
}

#[tokio::test]
async fn test_bind_failure_surfaces_before_browser_opens() {
    let taken = RedirectListener::bind(0).await.unwrap();
    let browser = FakeBrowser::default();
    let flow = AuthorizationFlow::new("client", taken.port()).with_browser(browser.clone());

    let err = flow.run(SCOPE).await.unwrap_err();
    assert!(matches!(err, Error::Bind { .. }));
    assert!(browser.opened.lock().unwrap().is_none());
}

#[test]
fn test_authorization_url_carries_all_parameters() {
    let url = flow()
        .with_auth_url("https://accounts.example.com/authorize")
        .authorization_url(&pending("4567890123"))
        .unwrap();

    let parsed = Url::parse(&url).unwrap();
    assert_eq!(parsed.host_str(), Some("accounts.example.com"));

    let pairs: Vec<(String, String)> = parsed
        .query_pairs()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    let expected = [
        ("client_id", "client"),
        ("response_type", "code"),
        ("redirect_uri", "http://localhost:3000"),
        ("scope", SCOPE),
        ("state", "4567890123"),
    ];
    for (key, value) in expected {
        assert!(
            pairs.contains(&(key.to_string(), value.to_string())),
            "missing {key}={value} in {url}"
        );
    }
}

#[test]
fn test_verify_redirect_state_mismatch() {
    let params = RedirectCallbackParams {
        code: "ABC".to_string(),
        state: "123".to_string(),
        error: None,
    };

    let err = verify_redirect(pending("456"), params).unwrap_err();
    assert!(matches!(
        err,
        Error::Security { ref expected, ref received } if expected == "456" && received == "123"
    ));
}

#[test]
fn test_verify_redirect_declined() {
    let params = RedirectCallbackParams {
        code: String::new(),
        state: "456".to_string(),
        error: Some("access_denied".to_string()),
    };

    let err = verify_redirect(pending("456"), params).unwrap_err();
    assert!(matches!(err, Error::AuthorizationDenied(ref reason) if reason == "access_denied"));
}

#[test]
fn test_verify_redirect_without_code() {
    let params = RedirectCallbackParams {
        state: "456".to_string(),
        ..RedirectCallbackParams::default()
    };

    assert!(matches!(
        verify_redirect(pending("456"), params),
        Err(Error::AuthorizationDenied(_))
    ));
}

#[test]
fn test_verify_redirect_accepts_matching_state() {
    let params = RedirectCallbackParams {
        code: "ABC".to_string(),
        state: "456".to_string(),
        error: None,
    };

    assert_eq!(verify_redirect(pending("456"), params).unwrap(), "ABC");
}

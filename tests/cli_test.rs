use playlist_toolbox::config;
use serde_json::{Value, json};
use tokio::process::Command;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

// Runs the binary against the mock server. Every variable is set so a local
// `.env` file cannot change the outcome.
async fn run_cli(
    server: &MockServer,
    args: &[&str],
    extra_env: &[(&str, String)],
) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_playlist-toolbox"))
        .args(args)
        .env(config::CLIENT_ID, "client")
        .env(config::CLIENT_SECRET, "secret")
        .env(config::AUTH_CODE, "")
        .env(config::REDIRECT_PORT, "3000")
        .env(config::TOKEN_MARGIN_SECS, "600")
        .env(config::TOKEN_URL, format!("{}/api/token", server.uri()))
        .env(config::API_URL, format!("{}/v1", server.uri()))
        .envs(extra_env.iter().map(|(k, v)| (*k, v.as_str())))
        .output()
        .await
        .unwrap()
}

async fn mock_server(playlist: Value) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"access_token": "AT1", "expires_in": 3600})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/playlists/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(playlist.clone()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/playlists/abc/tracks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(playlist))
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn test_playlist_show_stdout_is_plain_json() {
    let playlist = json!({"name": "Weekly Picks", "tracks": {"total": 2}});
    let server = mock_server(playlist.clone()).await;

    let output = run_cli(&server, &["playlist", "show", "abc"], &[]).await;

    assert!(output.status.success());
    let stdout: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(stdout, playlist);

    // The token audit line goes to stderr instead
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Obtained client_credentials token"));
}

#[tokio::test]
async fn test_playlist_items_json_stdout_is_plain_json() {
    let page = json!({"items": [{"track": {"name": "One", "uri": "spotify:track:1"}}]});
    let server = mock_server(page.clone()).await;

    let output = run_cli(&server, &["playlist", "items", "abc", "--json"], &[]).await;

    assert!(output.status.success());
    let stdout: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(stdout, page);
}

#[tokio::test]
async fn test_auth_exits_with_error_when_port_is_taken() {
    let server = MockServer::start().await;
    let taken = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = taken.local_addr().unwrap().port().to_string();

    let output = run_cli(&server, &["auth"], &[(config::REDIRECT_PORT, port)]).await;

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Authorization code not obtained"));
    assert!(!stdout.contains("SPOTIFY_AUTH_CODE="));
}

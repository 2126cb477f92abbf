use serde_json::Value;
use tabled::Table;

use super::spinner;
use crate::{
    Result,
    config::Config,
    error, info,
    management::TokenManager,
    spotify::playlist::PlaylistApi,
    success,
    types::{AddItemsRequest, CreatePlaylistRequest, PlaylistItemsQuery, PlaylistQuery},
    utils, warning,
};

pub async fn show_playlist(
    config: &Config,
    playlist_id: String,
    market: Option<String>,
    fields: Option<String>,
) {
    let (api, mut tokens) = session(config);
    let query = PlaylistQuery { market, fields };

    let pb = spinner("Fetching playlist...");
    let result = api.get_playlist(&mut tokens, &playlist_id, &query).await;
    pb.finish_and_clear();

    print_json(&exit_on_error(result));
}

pub async fn list_playlist_items(
    config: &Config,
    playlist_id: String,
    query: PlaylistItemsQuery,
    json: bool,
) {
    let (api, mut tokens) = session(config);

    let pb = spinner("Fetching playlist items...");
    let result = api
        .get_playlist_items(&mut tokens, &playlist_id, &query)
        .await;
    pb.finish_and_clear();

    let page = exit_on_error(result);
    if json {
        print_json(&page);
        return;
    }

    let rows = utils::playlist_item_rows(&page);
    if rows.is_empty() {
        warning!("No items found.");
        return;
    }
    println!("{}", Table::new(rows));
}

pub async fn create_playlist(config: &Config, user_id: String, request: CreatePlaylistRequest) {
    let (api, mut tokens) = session(config);

    let pb = spinner("Creating playlist...");
    let result = api.create_playlist(&mut tokens, &user_id, &request).await;
    pb.finish_and_clear();

    let created = exit_on_error(result);
    success!(
        "Playlist {} created with id {}.",
        request.name,
        created["id"].as_str().unwrap_or("-")
    );
}

pub async fn add_playlist_items(
    config: &Config,
    playlist_id: String,
    uris: Vec<String>,
    position: Option<u32>,
) {
    let (api, mut tokens) = session(config);
    let request = AddItemsRequest { uris, position };

    let pb = spinner("Adding items...");
    let result = api
        .add_items_to_playlist(&mut tokens, &playlist_id, &request)
        .await;
    pb.finish_and_clear();

    let added = exit_on_error(result);
    success!("{} item(s) added to playlist.", request.uris.len());
    if let Some(snapshot) = added["snapshot_id"].as_str() {
        info!("New snapshot: {}", snapshot);
    }
}

fn session(config: &Config) -> (PlaylistApi, TokenManager) {
    let tokens = match TokenManager::from_config(config) {
        Ok(tokens) => tokens,
        Err(e) => error!("Cannot set up authentication. Err: {}", e),
    };
    (PlaylistApi::from_config(config), tokens)
}

fn exit_on_error(result: Result<Value>) -> Value {
    match result {
        Ok(value) => value,
        Err(e) => error!("Request failed. Err: {}", e),
    }
}

fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => warning!("Cannot render response. Err: {}", e),
    }
}

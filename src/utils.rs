use rand::Rng;
use serde_json::Value;

use crate::types::PlaylistItemTableRow;

/// Random 10-digit value for the `state` parameter of an authorization.
pub fn generate_state_nonce() -> String {
    rand::rng()
        .random_range(1_000_000_000u64..=9_999_999_999u64)
        .to_string()
}

/// Flattens a playlist items page into table rows.
///
/// Entries without a track (removed or local items) are skipped.
pub fn playlist_item_rows(page: &Value) -> Vec<PlaylistItemTableRow> {
    let Some(items) = page["items"].as_array() else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| {
            let track = item.get("track").filter(|t| !t.is_null())?;
            let artists = track["artists"]
                .as_array()
                .map(|artists| {
                    artists
                        .iter()
                        .filter_map(|a| a["name"].as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                })
                .unwrap_or_default();

            Some(PlaylistItemTableRow {
                name: track["name"].as_str().unwrap_or_default().to_string(),
                artists,
                uri: track["uri"].as_str().unwrap_or_default().to_string(),
            })
        })
        .collect()
}

/// Splits a comma separated list of URIs, dropping blanks.
pub fn parse_uris(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|uri| !uri.is_empty())
        .map(str::to_string)
        .collect()
}

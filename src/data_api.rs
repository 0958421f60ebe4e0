use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::util::{DownloadError, HttpClient};

const API_BASE: &str = "https://www.googleapis.com/youtube/v3";

/// Client for the YouTube Data API v3. Holds only the credential; the shared
/// [`HttpClient`] is passed per call.
pub struct DataApiClient {
    key: String,
}

impl DataApiClient {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    /// `playlists.list` with `part=snippet` for one playlist id.
    pub async fn playlist_snippet(
        &self,
        client: &HttpClient,
        playlist_id: &str,
    ) -> Result<PlaylistListResponse, DownloadError> {
        let url = format!(
            "{}/playlists?part=snippet&id={}&key={}",
            API_BASE, playlist_id, self.key
        );
        client.fetch_json(&url).await
    }

    /// `playlistItems.list` with `part=snippet`, first page only.
    pub async fn playlist_items(
        &self,
        client: &HttpClient,
        playlist_id: &str,
        max_results: u32,
    ) -> Result<PlaylistItemListResponse, DownloadError> {
        let url = format!(
            "{}/playlistItems?part=snippet&playlistId={}&maxResults={}&key={}",
            API_BASE, playlist_id, max_results, self.key
        );
        client.fetch_json(&url).await
    }
}

/// Extracts the playlist id as the substring after the last `list=` marker.
/// Deliberately lenient: a URL without the marker comes back unchanged and
/// trailing query parameters are kept, matching how users paste URLs today.
pub fn extract_playlist_id(url: &str) -> String {
    url.rsplit("list=").next().unwrap_or_default().to_string()
}

// Generated with https://transform.tools/json-to-rust-serde

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistListResponse {
    pub items: Vec<PlaylistResource>,
    pub page_info: Option<PageInfo>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistResource {
    pub id: String,
    pub snippet: PlaylistSnippet,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistSnippet {
    pub title: String,
    pub published_at: DateTime<Utc>,
    pub channel_title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItemListResponse {
    pub items: Vec<PlaylistItemResource>,
    pub page_info: Option<PageInfo>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItemResource {
    pub snippet: PlaylistItemSnippet,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItemSnippet {
    pub title: String,
    pub published_at: DateTime<Utc>,
    pub position: Option<i64>,
    pub resource_id: ResourceId,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceId {
    pub video_id: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub total_results: i64,
    pub results_per_page: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn playlist_id_extraction() {
        assert_eq!(
            extract_playlist_id("https://www.youtube.com/playlist?list=PL123"),
            "PL123"
        );
        // Trailing parameters are kept, same as splitting on the marker
        assert_eq!(
            extract_playlist_id("https://www.youtube.com/watch?v=abc&list=PL123&index=2"),
            "PL123&index=2"
        );
        // No marker: the input passes through untouched
        assert_eq!(
            extract_playlist_id("https://www.youtube.com/watch?v=abc"),
            "https://www.youtube.com/watch?v=abc"
        );
        assert_eq!(extract_playlist_id("list=X"), "X");
    }

    fn get_test_json(fname: &str) -> String {
        let mut d = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        d.push("resources/test/");
        d.push(fname);
        std::fs::read_to_string(d).expect(format!("Could not read {}", fname).as_str())
    }

    #[test]
    fn parse_playlist_list() {
        let resp: PlaylistListResponse =
            serde_json::from_str(&get_test_json("playlists.json")).expect("Could not parse");

        assert_eq!(resp.items.len(), 1);
        assert_eq!(resp.items[0].id, "PL123");
        assert_eq!(resp.items[0].snippet.title, "Demo Mix");
        assert_eq!(
            resp.items[0].snippet.channel_title.as_deref(),
            Some("Demo Channel")
        );
    }

    #[test]
    fn parse_playlist_items() {
        let resp: PlaylistItemListResponse =
            serde_json::from_str(&get_test_json("playlist_items.json")).expect("Could not parse");

        assert_eq!(resp.items.len(), 2);
        assert_eq!(resp.items[0].snippet.resource_id.video_id, "dQw4w9WgXcQ");
        assert_eq!(resp.items[0].snippet.position, Some(0));
        assert_eq!(resp.items[1].snippet.title, "Second Video");
        assert_eq!(resp.page_info.as_ref().unwrap().total_results, 2);
    }
}

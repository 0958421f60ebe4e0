use serde::Deserialize;
use serde_aux::prelude::*;

use crate::util;

// Generated with https://transform.tools/json-to-rust-serde

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitialPlayerResponse {
    pub playability_status: PlayabilityStatus,
    pub streaming_data: Option<StreamingData>,
    pub video_details: Option<VideoDetails>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayabilityStatus {
    pub status: Status,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Ok,
    LiveStreamOffline,
    Unplayable,
    LoginRequired,
    Error,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamingData {
    #[serde(default)]
    pub formats: Vec<Format>,
    #[serde(default)]
    pub adaptive_formats: Vec<Format>,
}

/// One downloadable encoding as YouTube reports it. Entries in
/// `StreamingData::formats` are muxed (audio and video in one file); entries
/// in `adaptive_formats` carry only one track each.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Format {
    pub itag: i64,
    pub url: Option<String>,
    pub mime_type: String,
    pub bitrate: Option<i64>,
    pub width: Option<i64>,
    pub height: Option<i64>,
    pub quality_label: Option<String>,
    pub signature_cipher: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoDetails {
    pub video_id: String,
    pub title: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub length_seconds: i64,
    pub author: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub view_count: i64,
}

/// A progressive MP4 variant with a usable direct URL. The itag is the
/// selector callers hand back to pick this variant later; it is only
/// meaningful for the video it was enumerated from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressiveStream<'a> {
    pub itag: i64,
    pub resolution: &'a str,
    pub mime_type: &'a str,
    pub url: &'a str,
}

#[derive(thiserror::Error, Debug)]
pub enum PlayerResponseError {
    #[error("Could not find initial player response")]
    NoInitialPlayerResponse,
    #[error("Could not parse initial player response: {0}")]
    ParseInitialPlayerResponse(#[from] serde_json::Error),
    #[error("Could not fetch watch page: {0}")]
    FetchError(#[from] util::DownloadError),
}

pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", video_id)
}

const IPR_STR: &str = "var ytInitialPlayerResponse =";

fn get_ipr_str(html: &str) -> Option<&str> {
    // Find the start of the initial player response
    let idx_ipr = html.find(IPR_STR)? + IPR_STR.len();

    // Find the start and end of the JSON object
    let idx_start = html[idx_ipr..].find("{")? + idx_ipr;
    let idx_end = html[idx_start..].find("};")? + idx_start + 1;

    // Bounds check
    if idx_start >= idx_end || idx_start >= html.len() || idx_end >= html.len() {
        return None;
    }

    Some(&html[idx_start..idx_end])
}

impl InitialPlayerResponse {
    pub fn from_html(html: &str) -> Result<Self, PlayerResponseError> {
        // Find the initial player response
        let ipr_str = get_ipr_str(html).ok_or(PlayerResponseError::NoInitialPlayerResponse)?;

        // Parse the JSON
        serde_json::from_str(ipr_str).map_err(PlayerResponseError::ParseInitialPlayerResponse)
    }

    /// Fetches a watch page and parses the player response embedded in it.
    pub async fn fetch(
        client: &util::HttpClient,
        video_url: &str,
    ) -> Result<Self, PlayerResponseError> {
        let html = client.fetch_text(video_url).await?;
        Self::from_html(html.as_str())
    }

    pub fn is_playable(&self) -> bool {
        self.playability_status.status == Status::Ok
    }

    pub fn title(&self) -> Option<&str> {
        self.video_details.as_ref().map(|v| v.title.as_str())
    }

    pub fn video_id(&self) -> Option<&str> {
        self.video_details.as_ref().map(|v| v.video_id.as_str())
    }

    /// Muxed MP4 variants with a direct URL, highest resolution first.
    /// Cipher-protected entries (no plain `url`) are excluded.
    pub fn progressive_mp4(&self) -> Vec<ProgressiveStream<'_>> {
        let formats = match self.streaming_data.as_ref() {
            Some(sd) => &sd.formats,
            None => return Vec::new(),
        };

        let mut muxed = formats
            .iter()
            .filter(|f| {
                f.mime_type.starts_with("video/mp4")
                    && f.url.is_some()
                    && f.quality_label.is_some()
            })
            .collect::<Vec<_>>();
        muxed.sort_by_key(|f| std::cmp::Reverse(f.height.unwrap_or(0)));

        muxed
            .into_iter()
            .map(|f| ProgressiveStream {
                itag: f.itag,
                resolution: f.quality_label.as_deref().unwrap_or(""),
                mime_type: f.mime_type.split(';').next().unwrap_or(""),
                url: f.url.as_deref().unwrap_or(""),
            })
            .collect()
    }
}

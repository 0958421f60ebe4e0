use serde::Serialize;

use crate::{
    config::AppContext,
    data_api::{self, DataApiClient, PlaylistItemListResponse, PlaylistItemSnippet},
    error::Error,
    player_response::{self, InitialPlayerResponse, ProgressiveStream},
    util::HttpClient,
};

/// Only the first page of members is fetched; larger playlists are truncated.
pub const MAX_MEMBERS: usize = 50;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Playlist {
    pub title: String,
    pub total_videos: usize,
    pub videos: Vec<VideoEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoEntry {
    pub title: String,
    pub url: String,
    pub id: String,
    pub quality_options: Vec<QualityOption>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityOption {
    pub itag: i64,
    pub resolution: String,
    pub mime_type: String,
}

impl From<&ProgressiveStream<'_>> for QualityOption {
    fn from(s: &ProgressiveStream<'_>) -> Self {
        QualityOption {
            itag: s.itag,
            resolution: s.resolution.to_string(),
            mime_type: s.mime_type.to_string(),
        }
    }
}

fn member_snippets(members: PlaylistItemListResponse) -> Vec<PlaylistItemSnippet> {
    members
        .items
        .into_iter()
        .map(|item| item.snippet)
        .take(MAX_MEMBERS)
        .collect()
}

/// Fetches playlist-level info plus, per member video, the progressive MP4
/// variants a browser could download. Everything is assembled fresh per call;
/// nothing is cached. The first upstream failure aborts the whole aggregation,
/// partial playlists are never returned.
pub async fn aggregate(
    ctx: &AppContext,
    client: &HttpClient,
    playlist_url: &str,
) -> Result<Playlist, Error> {
    let api = DataApiClient::new(ctx.api_key()?);
    let playlist_id = data_api::extract_playlist_id(playlist_url);

    info!("Aggregating playlist {}", playlist_id);

    let title = api
        .playlist_snippet(client, &playlist_id)
        .await?
        .items
        .into_iter()
        .next()
        .ok_or_else(|| Error::Upstream(format!("playlist {} not found", playlist_id)))?
        .snippet
        .title;

    let members = api
        .playlist_items(client, &playlist_id, MAX_MEMBERS as u32)
        .await?;

    let mut videos = Vec::new();
    for snippet in member_snippets(members) {
        let video_id = snippet.resource_id.video_id;
        let video_url = player_response::watch_url(&video_id);

        // A video with no progressive MP4 variant stays in the playlist with
        // an empty option list; only a fetch/parse failure aborts.
        let page = InitialPlayerResponse::fetch(client, &video_url).await?;
        let quality_options = page
            .progressive_mp4()
            .iter()
            .map(QualityOption::from)
            .collect();

        videos.push(VideoEntry {
            title: snippet.title,
            url: video_url,
            id: video_id,
            quality_options,
        });
    }

    info!(
        "Playlist {} aggregated with {} videos",
        playlist_id,
        videos.len()
    );

    Ok(Playlist {
        title,
        total_videos: videos.len(),
        videos,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_api::{PlaylistItemResource, ResourceId};
    use chrono::Utc;

    fn synthetic_members(count: usize) -> PlaylistItemListResponse {
        PlaylistItemListResponse {
            items: (0..count)
                .map(|i| PlaylistItemResource {
                    snippet: PlaylistItemSnippet {
                        title: format!("Video {}", i),
                        published_at: Utc::now(),
                        position: Some(i as i64),
                        resource_id: ResourceId {
                            video_id: format!("vid{}", i),
                        },
                    },
                })
                .collect(),
            page_info: None,
        }
    }

    #[test]
    fn members_are_capped_at_fifty() {
        let snippets = member_snippets(synthetic_members(60));
        assert_eq!(snippets.len(), MAX_MEMBERS);
        assert_eq!(snippets[0].title, "Video 0");
        assert_eq!(snippets[49].title, "Video 49");
    }

    #[test]
    fn members_below_cap_are_kept_in_order() {
        let snippets = member_snippets(synthetic_members(2));
        assert_eq!(snippets.len(), 2);
        assert_eq!(snippets[0].resource_id.video_id, "vid0");
        assert_eq!(snippets[1].resource_id.video_id, "vid1");
    }

    #[test]
    fn quality_option_from_stream() {
        let stream = ProgressiveStream {
            itag: 22,
            resolution: "720p",
            mime_type: "video/mp4",
            url: "https://example.com/videoplayback?itag=22",
        };
        assert_eq!(
            QualityOption::from(&stream),
            QualityOption {
                itag: 22,
                resolution: "720p".to_string(),
                mime_type: "video/mp4".to_string(),
            }
        );
    }

    #[test]
    fn playlist_serializes_with_expected_shape() {
        let playlist = Playlist {
            title: "Demo Mix".to_string(),
            total_videos: 2,
            videos: vec![
                VideoEntry {
                    title: "First Video".to_string(),
                    url: player_response::watch_url("dQw4w9WgXcQ"),
                    id: "dQw4w9WgXcQ".to_string(),
                    quality_options: vec![QualityOption {
                        itag: 22,
                        resolution: "720p".to_string(),
                        mime_type: "video/mp4".to_string(),
                    }],
                },
                VideoEntry {
                    title: "Second Video".to_string(),
                    url: player_response::watch_url("abc123def45"),
                    id: "abc123def45".to_string(),
                    quality_options: Vec::new(),
                },
            ],
        };

        let value = serde_json::to_value(&playlist).expect("Could not serialize");
        assert_eq!(value["title"], "Demo Mix");
        assert_eq!(value["total_videos"], 2);
        assert_eq!(value["videos"].as_array().unwrap().len(), 2);
        // Variant-less videos keep an (empty) option list instead of vanishing
        assert_eq!(
            value["videos"][1]["quality_options"].as_array().unwrap().len(),
            0
        );
    }
}

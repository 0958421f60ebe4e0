use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Form, Router,
};
use serde::Deserialize;

use crate::{
    aggregate::{self, Playlist},
    config::AppContext,
    download, player_response, util,
};

/// Shared state injected into every handler. Both members are immutable, so
/// concurrent requests share nothing mutable at this layer.
#[derive(Clone)]
pub struct AppState {
    pub ctx: Arc<AppContext>,
    pub http: Arc<util::HttpClient>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home_page).post(home_submit))
        .route("/single_video", get(single_video_page).post(single_video_submit))
        .route("/download/:video_id", post(download_selected))
        .with_state(state)
}

#[derive(Deserialize)]
struct PlaylistForm {
    playlist_url: String,
}

#[derive(Deserialize)]
struct VideoForm {
    video_url: String,
}

#[derive(Deserialize)]
struct QualityForm {
    quality: String,
}

async fn home_page() -> Html<String> {
    Html(render_home(None))
}

async fn home_submit(
    State(state): State<AppState>,
    Form(form): Form<PlaylistForm>,
) -> Response {
    match aggregate::aggregate(&state.ctx, &state.http, &form.playlist_url).await {
        Ok(playlist) => Html(render_home(Some(&playlist))).into_response(),
        Err(e) => {
            error!("Error fetching playlist from {}: {}", form.playlist_url, e);
            plain_500(format!(
                "Error fetching playlist from {}: {}",
                form.playlist_url, e
            ))
        }
    }
}

async fn single_video_page() -> Html<String> {
    Html(render_single_video())
}

async fn single_video_submit(
    State(state): State<AppState>,
    Form(form): Form<VideoForm>,
) -> Response {
    match download::download_item(&state.http, &form.video_url, None).await {
        Ok((filename, bytes)) => attachment(filename, bytes),
        Err(e) => {
            error!(
                "Error downloading single video from {}: {}",
                form.video_url, e
            );
            plain_500(format!(
                "Error downloading single video from {}: {}",
                form.video_url, e
            ))
        }
    }
}

async fn download_selected(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
    Form(form): Form<QualityForm>,
) -> Response {
    let itag = match form.quality.trim().parse::<i64>() {
        Ok(itag) => itag,
        Err(_) => {
            error!(
                "Error downloading video {}: invalid quality selector {:?}",
                video_id, form.quality
            );
            return plain_500(format!(
                "Error downloading video {}: invalid quality selector {}",
                video_id, form.quality
            ));
        }
    };

    let video_url = player_response::watch_url(&video_id);
    match download::download_item(&state.http, &video_url, Some(itag)).await {
        Ok((filename, bytes)) => attachment(filename, bytes),
        Err(e) => {
            error!("Error downloading video {}: {}", video_id, e);
            plain_500(format!("Error downloading video {}: {}", video_id, e))
        }
    }
}

fn attachment(filename: String, bytes: Vec<u8>) -> Response {
    (
        [
            (
                header::CONTENT_TYPE,
                "application/octet-stream".to_string(),
            ),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        bytes,
    )
        .into_response()
}

fn plain_500(message: String) -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
}

fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

const PAGE_HEADER: &str = "<!DOCTYPE html>\n<html>\n<head><title>tubefetch</title></head>\n<body>\n\
<nav><a href=\"/\">Playlist</a> | <a href=\"/single_video\">Single video</a></nav>\n";
const PAGE_FOOTER: &str = "</body>\n</html>\n";

fn render_home(playlist: Option<&Playlist>) -> String {
    let mut page = String::from(PAGE_HEADER);
    page.push_str(
        "<h1>Download a playlist</h1>\n\
         <form method=\"post\" action=\"/\">\n\
         <input type=\"text\" name=\"playlist_url\" placeholder=\"Playlist URL\" size=\"60\">\n\
         <button type=\"submit\">Fetch</button>\n\
         </form>\n",
    );

    if let Some(playlist) = playlist {
        page.push_str(&format!(
            "<h2>{} ({} videos)</h2>\n<ol>\n",
            html_escape(&playlist.title),
            playlist.total_videos
        ));
        for video in &playlist.videos {
            page.push_str(&format!(
                "<li>\n<a href=\"{}\">{}</a>\n",
                html_escape(&video.url),
                html_escape(&video.title)
            ));
            if video.quality_options.is_empty() {
                page.push_str("<p>No downloadable streams</p>\n");
            } else {
                page.push_str(&format!(
                    "<form method=\"post\" action=\"/download/{}\">\n<select name=\"quality\">\n",
                    html_escape(&video.id)
                ));
                for option in &video.quality_options {
                    page.push_str(&format!(
                        "<option value=\"{}\">{} ({})</option>\n",
                        option.itag,
                        html_escape(&option.resolution),
                        html_escape(&option.mime_type)
                    ));
                }
                page.push_str("</select>\n<button type=\"submit\">Download</button>\n</form>\n");
            }
            page.push_str("</li>\n");
        }
        page.push_str("</ol>\n");
    }

    page.push_str(PAGE_FOOTER);
    page
}

fn render_single_video() -> String {
    let mut page = String::from(PAGE_HEADER);
    page.push_str(
        "<h1>Download a single video</h1>\n\
         <form method=\"post\" action=\"/single_video\">\n\
         <input type=\"text\" name=\"video_url\" placeholder=\"Video URL\" size=\"60\">\n\
         <button type=\"submit\">Download</button>\n\
         </form>\n",
    );
    page.push_str(PAGE_FOOTER);
    page
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{QualityOption, VideoEntry};

    #[test]
    fn escaping() {
        assert_eq!(
            html_escape(r#"<b>"Rick" & Morty's</b>"#),
            "&lt;b&gt;&quot;Rick&quot; &amp; Morty&#39;s&lt;/b&gt;"
        );
        assert_eq!(html_escape("plain"), "plain");
    }

    #[test]
    fn home_page_renders_playlist() {
        let playlist = Playlist {
            title: "Demo <Mix>".to_string(),
            total_videos: 2,
            videos: vec![
                VideoEntry {
                    title: "First Video".to_string(),
                    url: "https://www.youtube.com/watch?v=dQw4w9WgXcQ".to_string(),
                    id: "dQw4w9WgXcQ".to_string(),
                    quality_options: vec![QualityOption {
                        itag: 22,
                        resolution: "720p".to_string(),
                        mime_type: "video/mp4".to_string(),
                    }],
                },
                VideoEntry {
                    title: "Second Video".to_string(),
                    url: "https://www.youtube.com/watch?v=abc123def45".to_string(),
                    id: "abc123def45".to_string(),
                    quality_options: Vec::new(),
                },
            ],
        };

        let page = render_home(Some(&playlist));
        assert!(page.contains("Demo &lt;Mix&gt; (2 videos)"));
        assert!(page.contains("action=\"/download/dQw4w9WgXcQ\""));
        assert!(page.contains("<option value=\"22\">720p (video/mp4)</option>"));
        assert!(page.contains("No downloadable streams"));
    }

    #[test]
    fn home_page_without_playlist_is_just_the_form() {
        let page = render_home(None);
        assert!(page.contains("name=\"playlist_url\""));
        assert!(!page.contains("<ol>"));
    }

    #[test]
    fn error_responses_are_plain_500s() {
        let response = plain_500("Error downloading video abc123: boom".to_string());
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn attachment_sets_disposition() {
        let response = attachment("Demo Video.mp4".to_string(), vec![1, 2, 3]);
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get(header::CONTENT_DISPOSITION)
                .unwrap(),
            "attachment; filename=\"Demo Video.mp4\""
        );
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/octet-stream"
        );
    }
}

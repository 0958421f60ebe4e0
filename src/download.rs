use crate::{
    error::Error,
    player_response::{InitialPlayerResponse, ProgressiveStream},
    util,
};

/// Resolves one video, downloads the chosen variant into a scoped temporary
/// directory and hands the bytes back with a `<title>.mp4` filename. The
/// directory is removed when the guard drops, on success and on every error
/// path alike; callers only ever see the byte buffer.
///
/// With `selector` omitted the best (highest resolution) progressive MP4 is
/// used; with a selector the itag must match one of the video's enumerated
/// variants exactly.
pub async fn download_item(
    client: &util::HttpClient,
    video_url: &str,
    selector: Option<i64>,
) -> Result<(String, Vec<u8>), Error> {
    let page = InitialPlayerResponse::fetch(client, video_url).await?;

    if !page.is_playable() {
        let reason = page
            .playability_status
            .reason
            .as_deref()
            .unwrap_or("not playable");
        return Err(Error::Upstream(format!(
            "video {} is not playable: {}",
            page.video_id().unwrap_or(video_url),
            reason
        )));
    }

    let streams = page.progressive_mp4();
    let stream = select_stream(&streams, selector, video_url, page.video_id())?;

    let filename = format!("{}.mp4", safe_filename(page.title(), page.video_id()));

    let workdir = tempfile::tempdir().map_err(Error::Io)?;
    let path = workdir.path().join(&filename);
    let size = client
        .download_file(stream.url, &path.to_string_lossy())
        .await?;
    let bytes = tokio::fs::read(&path).await.map_err(Error::Io)?;

    info!(
        "Downloaded {} ({})",
        filename,
        util::format_bytes(size as u64)
    );

    Ok((filename, bytes))
}

fn select_stream<'a, 'b>(
    streams: &'a [ProgressiveStream<'b>],
    selector: Option<i64>,
    video_url: &str,
    video_id: Option<&str>,
) -> Result<&'a ProgressiveStream<'b>, Error> {
    match selector {
        None => streams.first().ok_or_else(|| {
            Error::NotFound(format!("No downloadable stream found for {}", video_url))
        }),
        Some(itag) => streams.iter().find(|s| s.itag == itag).ok_or_else(|| {
            Error::NotFound(format!(
                "Video with ID {} does not have selected quality {}",
                video_id.unwrap_or(video_url),
                itag
            ))
        }),
    }
}

/// Remote titles go straight into a filename and a Content-Disposition
/// header, so anything outside a conservative ASCII set becomes `_`. An
/// empty result falls back to the video id.
fn safe_filename(title: Option<&str>, video_id: Option<&str>) -> String {
    let raw = title.unwrap_or("");
    let mut out = String::with_capacity(raw.len());

    for c in raw.chars() {
        if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_' | ' ' | '(' | ')') {
            out.push(c);
        } else {
            out.push('_');
        }
    }

    let trimmed = out.trim();
    if trimmed.is_empty() || trimmed.chars().all(|c| c == '_') {
        video_id.unwrap_or("video").to_string()
    } else {
        trimmed.to_string()
    }
}

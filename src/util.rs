use serde::de::DeserializeOwned;
use tokio::{fs::File, io::AsyncWriteExt};

// YouTube serves a reduced watch page to clients without a browser UA.
const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:108.0) Gecko/20100101 Firefox/108.0";

pub struct HttpClient {
    pub client: reqwest::Client,
}

#[derive(thiserror::Error, Debug)]
pub enum DownloadError {
    #[error("reqwest error: {0}")]
    ReqwestError(#[from] reqwest::Error),
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
}

impl HttpClient {
    pub fn new() -> reqwest::Result<HttpClient> {
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;

        Ok(HttpClient { client })
    }

    pub async fn download_file(&self, url: &str, path: &str) -> Result<usize, DownloadError> {
        let temp_path = format!("{}.tmp", path);
        let mut file = File::create(&temp_path).await?;
        let mut resp = self.client.get(url).send().await?;
        let mut size = 0;

        while let Some(chunk) = resp.chunk().await? {
            file.write_all(&chunk).await?;
            size += chunk.len();
        }

        file.flush().await?;
        std::fs::rename(temp_path, path)?;

        Ok(size)
    }

    pub async fn fetch_text(&self, url: &str) -> Result<String, DownloadError> {
        self.client
            .get(url)
            .send()
            .await?
            .text()
            .await
            .map_err(|e| e.into())
    }

    pub async fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, DownloadError> {
        self.client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .map_err(|e| e.into())
    }
}

pub fn format_bytes(bytes: u64) -> String {
    let mut bytes = bytes as f64;
    let mut suffix = "B";

    if bytes > 1024.0 {
        bytes /= 1024.0;
        suffix = "KiB";
    }
    if bytes > 1024.0 {
        bytes /= 1024.0;
        suffix = "MiB";
    }
    if bytes > 1024.0 {
        bytes /= 1024.0;
        suffix = "GiB";
    }
    if bytes > 1024.0 {
        bytes /= 1024.0;
        suffix = "TiB";
    }

    format!("{:.2} {}", bytes, suffix)
}

use crate::error::Error;

/// Configuration read from the environment once at startup and handed to the
/// HTTP surface explicitly. Nothing in the crate reads ambient globals.
pub struct AppContext {
    api_key: Option<String>,
    pub bind_addr: String,
}

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

impl AppContext {
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var("GOOGLE_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            bind_addr: std::env::var("BIND_ADDR")
                .ok()
                .filter(|a| !a.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
        }
    }

    /// The Data API credential. A missing key is not checked at launch; it
    /// surfaces on the first metadata request.
    pub fn api_key(&self) -> Result<&str, Error> {
        self.api_key.as_deref().ok_or_else(|| {
            Error::Configuration("No Google API key found in environment variables".to_string())
        })
    }
}

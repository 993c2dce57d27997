//! HTTP client utilities
//!
//! Builds the shared `reqwest` client used for calls to the remote
//! engagement service, and composes endpoint URLs from a base URL plus
//! percent-encoded path segments.

use std::time::Duration;

use reqwest::{Client, Url};

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Whole-request timeout
    pub timeout: Duration,
    /// TCP/TLS connect timeout
    pub connect_timeout: Duration,
    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(5),
            user_agent: concat!("engagement/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl HttpClientConfig {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout,
            connect_timeout: timeout.min(Duration::from_secs(5)),
            ..Default::default()
        }
    }
}

/// Errors raised while preparing HTTP calls
#[derive(Debug, thiserror::Error)]
pub enum HttpClientError {
    #[error("Failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),

    #[error("Invalid base URL '{0}'")]
    InvalidBaseUrl(String),
}

/// Build a `reqwest::Client` from configuration
pub fn build_client(config: &HttpClientConfig) -> Result<Client, HttpClientError> {
    let client = Client::builder()
        .timeout(config.timeout)
        .connect_timeout(config.connect_timeout)
        .user_agent(config.user_agent.clone())
        .build()?;
    Ok(client)
}

/// Parse a base URL; it must be able to carry path segments
pub fn parse_base_url(raw: &str) -> Result<Url, HttpClientError> {
    let url = Url::parse(raw.trim()).map_err(|_| HttpClientError::InvalidBaseUrl(raw.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(HttpClientError::InvalidBaseUrl(raw.to_string()));
    }
    Ok(url)
}

/// Append path segments to `base`, percent-encoding each segment
///
/// A trailing slash on the base is ignored, so `http://h/api/` and
/// `http://h/api` produce the same endpoints.
pub fn endpoint(base: &Url, segments: &[&str]) -> Result<Url, HttpClientError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| HttpClientError::InvalidBaseUrl(base.to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

//! Application Configuration
//!
//! Configuration for the engagement application layer.

use std::time::Duration;

use platform::http::HttpClientConfig;

pub use crate::application::fallback::EmptyRemotePolicy;

/// Engagement application configuration
#[derive(Debug, Clone)]
pub struct EngagementConfig {
    /// Session lifetime, counted from creation (24 hours)
    pub session_ttl: Duration,
    /// Decision refresh interval (60 seconds)
    pub poll_interval: Duration,
    /// Base URL of the remote engagement service
    pub remote_base_url: String,
    /// Whole-request timeout for remote calls
    pub request_timeout: Duration,
    /// What a successful but empty remote decision list means
    pub empty_remote_policy: EmptyRemotePolicy,
    /// sqlx connection string of the local durable cache
    pub cache_database_url: String,
    /// Identifiers added to the built-in identity roster
    pub extra_identifiers: Vec<String>,
}

impl Default for EngagementConfig {
    fn default() -> Self {
        Self {
            session_ttl: Duration::from_secs(24 * 3600), // 24 hours
            poll_interval: Duration::from_secs(60),
            remote_base_url: "http://localhost:8080/api".to_string(),
            request_timeout: Duration::from_secs(10),
            empty_remote_policy: EmptyRemotePolicy::PreferCache,
            cache_database_url: "sqlite://engagement.db".to_string(),
            extra_identifiers: Vec::new(),
        }
    }
}

impl EngagementConfig {
    /// Create config for development (in-memory cache, faster polling)
    pub fn development() -> Self {
        Self {
            remote_base_url: "http://127.0.0.1:8080/api".to_string(),
            poll_interval: Duration::from_secs(15),
            cache_database_url: "sqlite::memory:".to_string(),
            ..Default::default()
        }
    }

    /// Session TTL as a chrono duration for timestamp arithmetic
    pub fn session_ttl_chrono(&self) -> chrono::Duration {
        chrono::Duration::from_std(self.session_ttl).unwrap_or(chrono::Duration::MAX)
    }

    pub fn http_client_config(&self) -> HttpClientConfig {
        HttpClientConfig::with_timeout(self.request_timeout)
    }
}

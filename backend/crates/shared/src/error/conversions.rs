//! Error conversions - From implementations for common error types
//!
//! Provides automatic conversion from common error types to [`AppError`].

#[cfg(feature = "reqwest")]
use super::{app_error::AppError, kind::ErrorKind};

// ============================================================================
// reqwest conversions (feature-gated)
// ============================================================================

#[cfg(feature = "reqwest")]
impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return AppError::new(ErrorKind::GatewayTimeout, "Remote call timed out")
                .with_source(err);
        }
        if let Some(status) = err.status() {
            return AppError::from_upstream(status.as_u16(), "").with_source(err);
        }
        if err.is_connect() || err.is_request() {
            return AppError::service_unavailable("Remote service unreachable").with_source(err);
        }
        if err.is_decode() {
            return AppError::new(
                ErrorKind::BadGateway,
                "Remote service returned an unreadable body",
            )
            .with_source(err);
        }
        AppError::internal("HTTP client error").with_source(err)
    }
}

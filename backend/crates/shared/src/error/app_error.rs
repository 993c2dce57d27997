//! Application Error - Unified error type for the workspace
//!
//! Defines [`AppError`] struct and [`AppResult<T>`] type alias.

use std::borrow::Cow;
use std::error::Error;
use std::fmt;

use super::kind::ErrorKind;

/// 統一エラー型
///
/// ## Fields
/// * `kind` - エラーの分類
/// * `message` - 人間向けのメッセージ
/// * `upstream_status` - リモートサービスが返した HTTP ステータス（あれば）
/// * `source` - 元のエラー（デバッグ用）
///
/// ## Examples
/// ```rust
/// use kernel::error::{app_error::AppError, kind::ErrorKind};
///
/// let err = AppError::new(ErrorKind::NotFound, "Decision not found");
/// assert_eq!(err.status_code(), 404);
///
/// let err = AppError::from_upstream(503, "maintenance");
/// assert_eq!(err.kind(), ErrorKind::ServiceUnavailable);
/// assert_eq!(err.upstream_status(), Some(503));
/// ```
pub struct AppError {
    kind: ErrorKind,
    message: Cow<'static, str>,
    upstream_status: Option<u16>,
    source: Option<Box<dyn Error + Send + Sync + 'static>>,
}

/// `Result<T, AppError>` の省略形
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// 新しいエラーを作成
    #[inline]
    pub fn new(kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind,
            message: message.into(),
            upstream_status: None,
            source: None,
        }
    }

    /// リモートサービスの non-2xx 応答からエラーを作成
    ///
    /// 応答本文は長すぎる場合に切り詰めてメッセージに含めます。
    pub fn from_upstream(status: u16, body: impl AsRef<str>) -> Self {
        const MAX_BODY_CHARS: usize = 200;

        let body = body.as_ref().trim();
        let message = if body.is_empty() {
            format!("Remote service responded with status {status}")
        } else {
            let snippet: String = body.chars().take(MAX_BODY_CHARS).collect();
            format!("Remote service responded with status {status}: {snippet}")
        };

        Self {
            kind: ErrorKind::from_status(status),
            message: message.into(),
            upstream_status: Some(status),
            source: None,
        }
    }

    /// 500 Internal Server Error
    #[inline]
    pub fn internal(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::InternalServerError, message)
    }

    /// 503 Service Unavailable
    #[inline]
    pub fn service_unavailable(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::ServiceUnavailable, message)
    }

    /// 元のエラーを設定（デバッグ用）
    #[inline]
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    #[inline]
    pub fn status_code(&self) -> u16 {
        self.kind.status_code()
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// リモートサービスが返した生のステータス
    #[inline]
    pub fn upstream_status(&self) -> Option<u16> {
        self.upstream_status
    }

    #[inline]
    pub fn is_transient(&self) -> bool {
        self.kind.is_transient()
    }
}

impl fmt::Debug for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut builder = f.debug_struct("AppError");
        builder.field("kind", &self.kind);
        builder.field("message", &self.message);
        if let Some(status) = self.upstream_status {
            builder.field("upstream_status", &status);
        }
        if let Some(source) = &self.source {
            builder.field("source", source);
        }
        builder.finish()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn Error + 'static))
    }
}

/// `Result<T, E>` を `AppResult<T>` に変換するための拡張トレイト
pub trait ResultExt<T, E> {
    /// エラーを指定した種別とメッセージで `AppError` に包む
    fn map_app_err(self, kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> AppResult<T>
    where
        E: Error + Send + Sync + 'static;
}

impl<T, E> ResultExt<T, E> for Result<T, E> {
    fn map_app_err(self, kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> AppResult<T>
    where
        E: Error + Send + Sync + 'static,
    {
        self.map_err(|e| AppError::new(kind, message).with_source(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_error() {
        let err = AppError::new(ErrorKind::NotFound, "Decision not found");
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.message(), "Decision not found");
        assert!(err.upstream_status().is_none());
    }

    #[test]
    fn test_from_upstream_classifies_status() {
        let err = AppError::from_upstream(502, "");
        assert_eq!(err.kind(), ErrorKind::BadGateway);
        assert_eq!(err.upstream_status(), Some(502));
        assert!(err.is_transient());
        assert!(err.message().ends_with("status 502"));

        let err = AppError::from_upstream(404, "  no such freelancer ");
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(err.message().ends_with(": no such freelancer"));
    }

    #[test]
    fn test_from_upstream_truncates_long_body() {
        let body = "x".repeat(1_000);
        let err = AppError::from_upstream(500, &body);
        assert!(err.message().len() < 300);
    }

    #[test]
    fn test_with_source() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = AppError::internal("Failed to read cache").with_source(io_err);
        assert!(err.source().is_some());
    }

    #[test]
    fn test_display() {
        let err = AppError::service_unavailable("remote down");
        assert_eq!(err.to_string(), "[Service Unavailable] remote down");
    }

    #[test]
    fn test_result_ext() {
        let result: Result<i32, std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::TimedOut,
            "slow",
        ));
        let app_result = result.map_app_err(ErrorKind::RequestTimeout, "Remote call timed out");
        assert_eq!(app_result.unwrap_err().status_code(), 408);
    }
}

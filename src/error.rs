//! Error types for the addon request pipeline.

use std::time::Duration;

use thiserror::Error;

/// Coarse discriminator over [`WrapperError`], for callers that branch on
/// the failure class instead of matching message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Timeout,
    HttpStatus,
    MalformedResponse,
    Cancelled,
    Request,
    InvalidUrl,
    Config,
}

/// Errors raised while talking to an addon.
#[derive(Error, Debug)]
pub enum WrapperError {
    #[error("{addon} timed out after {}ms", .timeout.as_millis())]
    Timeout { addon: String, timeout: Duration },

    #[error("{addon} failed to respond: {status} {reason}{}", body_suffix(.body))]
    HttpStatus {
        addon: String,
        status: u16,
        reason: String,
        body: Option<serde_json::Value>,
    },

    #[error("{addon} failed to respond with streams: {detail}")]
    MalformedResponse { addon: String, detail: String },

    #[error("{addon} request was cancelled")]
    Cancelled { addon: String },

    #[error("{addon} request failed: {source}")]
    Request {
        addon: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Config error: {0}")]
    Config(String),
}

impl WrapperError {
    /// Failure class of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::HttpStatus { .. } => ErrorKind::HttpStatus,
            Self::MalformedResponse { .. } => ErrorKind::MalformedResponse,
            Self::Cancelled { .. } => ErrorKind::Cancelled,
            Self::Request { .. } => ErrorKind::Request,
            Self::InvalidUrl(_) => ErrorKind::InvalidUrl,
            Self::Config(_) => ErrorKind::Config,
        }
    }
}

fn body_suffix(body: &Option<serde_json::Value>) -> String {
    body.as_ref().map(|b| format!(" - {b}")).unwrap_or_default()
}

pub type Result<T> = std::result::Result<T, WrapperError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_message_names_addon_and_duration() {
        let err = WrapperError::Timeout {
            addon: "Torrentio".into(),
            timeout: Duration::from_millis(7500),
        };
        assert_eq!(err.to_string(), "Torrentio timed out after 7500ms");
        assert_eq!(err.kind(), ErrorKind::Timeout);
    }

    #[test]
    fn http_status_includes_parsed_body() {
        let err = WrapperError::HttpStatus {
            addon: "Comet".into(),
            status: 500,
            reason: "Internal Server Error".into(),
            body: Some(serde_json::json!({"err": "boom"})),
        };
        let msg = err.to_string();
        assert!(msg.contains("500 Internal Server Error"));
        assert!(msg.contains(r#"{"err":"boom"}"#));
    }

    #[test]
    fn http_status_without_body() {
        let err = WrapperError::HttpStatus {
            addon: "Comet".into(),
            status: 404,
            reason: "Not Found".into(),
            body: None,
        };
        assert_eq!(err.to_string(), "Comet failed to respond: 404 Not Found");
    }
}

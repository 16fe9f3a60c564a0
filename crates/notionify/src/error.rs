//! Error Types
//!
//! A single error enum for the whole crate. Remote failures keep the status,
//! code and message reported by the Notion API so callers see them unchanged.

use reqwest::StatusCode;

/// Crate result type
pub type Result<T> = std::result::Result<T, NotionError>;

#[derive(Debug, thiserror::Error)]
pub enum NotionError {
    /// Missing or malformed token / root page reference
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Local precondition failed before any request was sent
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response from the Notion API
    #[error("Notion API error {status} ({code}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    #[error("Failed to parse response: {0}")]
    Decode(String),
}

impl NotionError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// HTTP status of an API error, if this is one
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Api { status, .. } => StatusCode::from_u16(*status).ok(),
            Self::Http(e) => e.status(),
            _ => None,
        }
    }

    pub fn is_rate_limited(&self) -> bool {
        self.status() == Some(StatusCode::TOO_MANY_REQUESTS)
    }
}

impl From<serde_json::Error> for NotionError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = NotionError::Api {
            status: 400,
            code: "validation_error".to_string(),
            message: "body failed validation".to_string(),
        };

        let msg = err.to_string();
        assert!(msg.contains("400"));
        assert!(msg.contains("validation_error"));
        assert!(msg.contains("body failed validation"));
    }

    #[test]
    fn test_rate_limited() {
        let err = NotionError::Api {
            status: 429,
            code: "rate_limited".to_string(),
            message: "slow down".to_string(),
        };
        assert!(err.is_rate_limited());
        assert!(!NotionError::config("x").is_rate_limited());
        assert_eq!(NotionError::invalid_argument("x").status(), None);
    }
}

//! Error taxonomy for MIMS API access.

use thiserror::Error;

/// Errors produced by the API client.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Server returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Unexpected response body: {0}")]
    Malformed(String),
}

impl ApiError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a status error from an HTTP status code and server message.
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    /// Create a malformed-body error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed(message.into())
    }

    /// Short human-readable form for toasts and logs.
    pub fn summary(&self) -> String {
        match self {
            ApiError::Config(msg) => msg.clone(),
            ApiError::Transport(err) => {
                if err.is_timeout() {
                    "Request timed out".to_string()
                } else if err.is_connect() {
                    "Could not reach the server".to_string()
                } else {
                    "Network error".to_string()
                }
            }
            ApiError::Status { status, message } => format!("{status}: {message}"),
            ApiError::Malformed(_) => "Unexpected server response".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_summary_includes_code_and_message() {
        let err = ApiError::status(403, "You do not have permission");
        assert_eq!(err.summary(), "403: You do not have permission");
    }

    #[test]
    fn config_summary_passes_message_through() {
        let err = ApiError::config("MIMS_API_BASE must use https");
        assert!(matches!(err, ApiError::Config(_)));
        assert_eq!(err.summary(), "MIMS_API_BASE must use https");
    }
}

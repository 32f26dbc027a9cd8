//! Error types for Hearth

use thiserror::Error;

/// Result type alias for Hearth operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in Hearth
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    /// The model backend could not be reached or answered with an error.
    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Tool error: {0}")]
    Tool(String),

    #[error("Chat not found: {0}")]
    ChatNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    /// Message suitable for a failed tool result.
    ///
    /// Tool errors carry their own user-facing text, so the variant prefix is dropped.
    pub fn into_tool_message(self) -> String {
        match self {
            Error::Tool(msg) => msg,
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_message_strips_prefix() {
        let err = Error::Tool("File does not exist: a.txt".to_string());
        assert_eq!(err.into_tool_message(), "File does not exist: a.txt");
    }

    #[test]
    fn test_other_errors_keep_display() {
        let err = Error::Config("bad".to_string());
        assert_eq!(err.into_tool_message(), "Configuration error: bad");
    }
}

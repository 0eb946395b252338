use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ForumError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store responded with status {0}")]
    Status(StatusCode),

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ForumError>;

/// The two failure kinds surfaced to the user. Both end up in the same
/// error slot; only the text differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncFailure {
    Load,
    Submit,
}

impl SyncFailure {
    pub fn user_message(&self) -> &'static str {
        match self {
            SyncFailure::Load => "Failed to load messages. Using local cache if available.",
            SyncFailure::Submit => "Failed to send message. Please try again.",
        }
    }
}

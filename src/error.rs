use thiserror::Error;

/// Failure of a single upstream call. Always recoverable: the caller skips
/// the affected item until the next tick.
#[derive(Error, Debug)]
pub enum RequestError {
    #[error("API error: {0}")]
    ApiError(String),

    #[error("Unexpected status {status} for {url}")]
    StatusError { status: u16, url: String },

    #[error("Request timeout: {0}")]
    TimeoutError(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Can't decode response: {0}")]
    DecodeError(String),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum AlertError {
    #[error("Telegram error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    #[error("Invalid recipient: {0}")]
    InvalidRecipient(String),
}

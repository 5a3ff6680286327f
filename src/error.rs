use thiserror::Error;

use crate::models::ErrorKind;

/// Error type for quote/joke data source operations.
///
/// - `RequestFailed`: network/transport errors (wraps `reqwest::Error`)
/// - `NotFound`: HTTP 404
/// - `RateLimited`: HTTP 429
/// - `Api`: any other non-2xx status code, or an API-level error body
/// - `Decode`: a 2xx response whose body does not have the expected shape
/// - `NoResults`: a valid response with zero matches
#[derive(Debug, Error)]
pub enum QuoteApiError {
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Rate limited: {message}")]
    RateLimited { message: String },

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Deserialization error: {0}")]
    Decode(String),

    #[error("No results found")]
    NoResults,
}

impl QuoteApiError {
    /// True for outcomes that mean "nothing to show" rather than a failure.
    ///
    /// Empty and malformed successful responses both land here; they are
    /// rendered as "no results" and never retried.
    pub fn is_no_results(&self) -> bool {
        matches!(self, QuoteApiError::NoResults | QuoteApiError::Decode(_))
    }

    /// Classify the error for [`crate::models::RequestState::Failed`].
    pub fn kind(&self) -> ErrorKind {
        match self {
            QuoteApiError::RequestFailed(e) => match e.status() {
                Some(status) => ErrorKind::Http(status.as_u16()),
                None => ErrorKind::Network,
            },
            QuoteApiError::NotFound { .. } => ErrorKind::Http(404),
            QuoteApiError::RateLimited { .. } => ErrorKind::Http(429),
            QuoteApiError::Api { status, .. } => ErrorKind::Http(*status),
            QuoteApiError::Decode(_) | QuoteApiError::NoResults => ErrorKind::EmptyResult,
        }
    }
}

pub type Result<T> = std::result::Result<T, QuoteApiError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Failed to initialise logging: {0}")]
    Logging(String),
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed favorites data: {0}")]
    Json(#[from] serde_json::Error),
}

/// Best-effort user actions. Surfaced as a transient notification, never fatal.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ActionError {
    #[error("Copy failed: {0}")]
    Clipboard(String),

    #[error("Share failed: {0}")]
    Share(String),
}

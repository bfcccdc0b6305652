use thiserror::Error;

/// Centralized error types for the application
///
/// Layer-specific errors (`StoreError`, `DecodeError`, `ConfigError`) convert into this enum
/// so the binary and the Telegram layer can report them uniformly.
///
/// # Example
///
/// ```no_run
/// use linkvault::core::error::AppError;
///
/// fn handle_error(err: AppError) {
///     eprintln!("Error: {}", err);
/// }
/// ```
#[derive(Error, Debug)]
pub enum AppError {
    /// Persistence errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Malformed deep-link payloads
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Telegram API errors
    #[error("Telegram error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    /// HTTP/Fetch errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// HTTP status code errors
    #[error("HTTP request failed with status: {0}")]
    HttpStatus(reqwest::StatusCode),

    /// Link shortener answered but refused the request
    #[error("Shortener error: {0}")]
    Shortener(String),

    /// URL parsing errors
    #[error("URL parsing error: {0}")]
    Url(#[from] url::ParseError),
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

/// Errors raised by the token and user stores.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Database pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] refinery::Error),

    /// A row exists but cannot be turned back into a record
    #[error("Corrupt record for user {user_id}: {reason}")]
    Corrupt { user_id: i64, reason: String },
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised while decoding a deep-link start parameter.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("decoded payload is not ASCII")]
    NotAscii,

    #[error("unrecognised start payload: {0:?}")]
    Payload(String),
}

/// Errors raised while reading configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be a positive number of seconds, got {value}")]
    InvalidValidity { name: &'static str, value: i64 },

    #[error("{name} is required but not set")]
    Missing { name: &'static str },

    #[error("{name} is not a valid URL: {value}")]
    InvalidUrl { name: &'static str, value: String },
}

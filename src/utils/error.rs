use thiserror::Error;

#[derive(Error, Debug)]
pub enum WatchError {
    #[error("Listing search request failed: {0}")]
    FetchError(#[from] reqwest::Error),

    #[error("Listing search returned non-success status: {status}")]
    FetchStatusError { status: u16 },

    #[error("Seen-set store error: {message}")]
    StoreError { message: String },

    #[error("Seen-set store used before load()")]
    StoreNotLoadedError,

    #[error("Notification error: {message}")]
    NotifyError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid configuration value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

pub type Result<T> = std::result::Result<T, WatchError>;

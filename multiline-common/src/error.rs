use thiserror::Error;

/// Common error type for the chart components.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Data fetch error: {0}")]
    DataFetch(String),

    #[error("Rendering surface error: {0}")]
    Surface(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a data fetch error.
    pub fn data_fetch(msg: impl Into<String>) -> Self {
        Self::DataFetch(msg.into())
    }

    /// Create a rendering surface error.
    pub fn surface(msg: impl Into<String>) -> Self {
        Self::Surface(msg.into())
    }

    /// The message shown to the user, without the kind prefix.
    pub fn user_message(&self) -> String {
        match self {
            Error::Config(msg) | Error::DataFetch(msg) | Error::Surface(msg) => msg.clone(),
            Error::Json(e) => e.to_string(),
            Error::Io(e) => e.to_string(),
        }
    }
}

/// Result type alias using the chart Error.
pub type Result<T> = std::result::Result<T, Error>;

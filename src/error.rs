//! Error types for urbex-hud

use thiserror::Error;

/// Result type for urbex-hud operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while storing spots or processing photos
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Image decoding or encoding error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// A spot failed validation
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The spot store cannot serve requests
    #[error("Store unavailable")]
    StoreUnavailable,
}

impl Error {
    pub fn validation(msg: impl Into<String>) -> Self {
        Error::Validation(msg.into())
    }
}

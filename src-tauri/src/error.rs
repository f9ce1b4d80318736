//! Error types for the caption and packaging pipeline.
//!
//! Library code returns these typed errors; the Tauri command layer turns
//! them into strings for the frontend.

use thiserror::Error;

/// Failure of a single captioning request. Terminal for the affected item.
#[derive(Debug, Error)]
pub enum CaptionError {
    #[error("caption request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("vision API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("malformed vision API response: {0}")]
    MalformedResponse(String),

    #[error("caption service not configured: {0}")]
    NotConfigured(String),
}

/// Application-level failures surfaced to the user.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("no captioned images to download yet")]
    EmptyBatch,

    #[error("failed to build archive: {0}")]
    ArchiveBuild(String),

    #[error("invalid rename settings: {0}")]
    InvalidSettings(String),

    #[error("no caption API key found, set CAPTION_API_KEY in the environment or .env")]
    MissingApiKey,

    #[error("caption API key appears to be a placeholder (contains '{0}')")]
    InvalidApiKey(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<zip::result::ZipError> for AppError {
    fn from(err: zip::result::ZipError) -> Self {
        AppError::ArchiveBuild(err.to_string())
    }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;

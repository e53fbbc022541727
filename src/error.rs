// src/error.rs

//! Unified error handling for the cat watcher.

use std::fmt;
use std::path::Path;

use thiserror::Error;

/// Result type alias for catwatch operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request to the listing source failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Building or submitting the digest mail failed
    #[error("Mail error: {message}")]
    Mail { message: String },

    /// A record is missing a required field or carries an unusable value
    #[error("Malformed record {id}: {message}")]
    MalformedRecord { id: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The persisted snapshot exists but cannot be used
    #[error("Persistence error at {path}: {message}")]
    Persistence { path: String, message: String },
}

impl AppError {
    /// Create a mail transport error.
    pub fn mail(message: impl fmt::Display) -> Self {
        Self::Mail {
            message: message.to_string(),
        }
    }

    /// Create a malformed record error naming the offending identifier.
    pub fn malformed(id: impl fmt::Display, message: impl Into<String>) -> Self {
        Self::MalformedRecord {
            id: id.to_string(),
            message: message.into(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a persistence error for the given state file.
    pub fn persistence(path: &Path, message: impl fmt::Display) -> Self {
        Self::Persistence {
            path: path.display().to_string(),
            message: message.to_string(),
        }
    }

    /// Whether the error should stop the process instead of a single cycle.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

impl From<lettre::error::Error> for AppError {
    fn from(e: lettre::error::Error) -> Self {
        Self::mail(e)
    }
}

impl From<lettre::transport::smtp::Error> for AppError {
    fn from(e: lettre::transport::smtp::Error) -> Self {
        Self::mail(e)
    }
}

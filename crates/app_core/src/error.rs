//! Gallery error types

use serde::Serialize;
use thiserror::Error;

/// Error raised by group and image operations
#[derive(Error, Debug)]
pub enum GalleryError {
    #[error("Invalid name: {0}")]
    Validation(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl GalleryError {
    /// Get a user-friendly message.
    ///
    /// Validation errors carry their own message; I/O details stay in the log.
    pub fn user_message(&self) -> String {
        match self {
            GalleryError::Validation(msg) => msg.clone(),
            GalleryError::AlreadyExists(_) => "Target name already exists".to_string(),
            GalleryError::NotFound(_) => "Original item does not exist".to_string(),
            GalleryError::Io(_) => "Operation failed, please retry".to_string(),
        }
    }
}

impl From<app_fs::FsError> for GalleryError {
    fn from(e: app_fs::FsError) -> Self {
        match e {
            app_fs::FsError::Io(err) => GalleryError::Io(err),
            app_fs::FsError::NotFound(p) => GalleryError::NotFound(p),
            app_fs::FsError::AlreadyExists(p) => GalleryError::AlreadyExists(p),
        }
    }
}

pub type Result<T> = std::result::Result<T, GalleryError>;

/// Outcome of a namespace-changing operation, as handed to the UI
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl OpResult {
    pub fn ok() -> Self {
        Self { success: true, error: None }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(message.into()),
        }
    }
}

impl From<Result<()>> for OpResult {
    fn from(result: Result<()>) -> Self {
        match result {
            Ok(()) => OpResult::ok(),
            Err(e) => OpResult::failed(e.user_message()),
        }
    }
}

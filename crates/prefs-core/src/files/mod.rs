//! File access collaborator.
//!
//! The resolver never touches the filesystem directly; reads and writes go
//! through a [`FileService`] so hosts can back settings with any storage.

mod local;

use async_trait::async_trait;
use url::Url;

pub use local::LocalFileService;

/// Result code attached to a failed file operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileOperationResult {
    FileNotFound,
    FileIsBinary,
    PermissionDenied,
    /// The URI cannot be mapped to a location this service handles.
    InvalidPath,
    Other,
}

/// Typed failure of a [`FileService`] call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct FileOperationError {
    result: FileOperationResult,
    message: String,
}

impl FileOperationError {
    pub fn new(result: FileOperationResult, message: impl Into<String>) -> Self {
        Self {
            result,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &Url) -> Self {
        Self::new(
            FileOperationResult::FileNotFound,
            format!("Unable to read file '{}' (file not found)", resource),
        )
    }

    pub fn result(&self) -> FileOperationResult {
        self.result
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_not_found(&self) -> bool {
        self.result == FileOperationResult::FileNotFound
    }
}

/// Options for [`FileService::read`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadOptions {
    /// Fail with [`FileOperationResult::FileIsBinary`] instead of returning binary data.
    pub accept_text_only: bool,
}

impl ReadOptions {
    pub fn text_only() -> Self {
        Self {
            accept_text_only: true,
        }
    }
}

#[async_trait]
pub trait FileService: Send + Sync {
    /// Read the whole resource as text.
    async fn read(&self, resource: &Url, options: ReadOptions) -> Result<String, FileOperationError>;

    /// Create or replace the resource.
    async fn write(&self, resource: &Url, contents: &str) -> Result<(), FileOperationError>;
}

//! `file:` URI backed file service.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use url::Url;

use super::{FileOperationError, FileOperationResult, FileService, ReadOptions};

/// Bytes inspected when deciding whether a file is binary.
const BINARY_SNIFF_LEN: usize = 512;

#[derive(Debug, Default, Clone)]
pub struct LocalFileService;

impl LocalFileService {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl FileService for LocalFileService {
    async fn read(&self, resource: &Url, options: ReadOptions) -> Result<String, FileOperationError> {
        let path = to_path(resource)?;
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| map_io_error(resource, &path, "read", e))?;

        let sniff = &bytes[..bytes.len().min(BINARY_SNIFF_LEN)];
        if options.accept_text_only && sniff.contains(&0) {
            return Err(binary_error(resource));
        }

        match String::from_utf8(bytes) {
            Ok(text) => Ok(text),
            Err(_) if options.accept_text_only => Err(binary_error(resource)),
            Err(e) => Ok(String::from_utf8_lossy(e.as_bytes()).into_owned()),
        }
    }

    async fn write(&self, resource: &Url, contents: &str) -> Result<(), FileOperationError> {
        let path = to_path(resource)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| map_io_error(resource, parent, "create directory for", e))?;
        }
        tokio::fs::write(&path, contents)
            .await
            .map_err(|e| map_io_error(resource, &path, "write", e))
    }
}

fn to_path(resource: &Url) -> Result<PathBuf, FileOperationError> {
    if resource.scheme() != "file" {
        return Err(FileOperationError::new(
            FileOperationResult::InvalidPath,
            format!("Unsupported scheme '{}' for {}", resource.scheme(), resource),
        ));
    }
    resource.to_file_path().map_err(|()| {
        FileOperationError::new(
            FileOperationResult::InvalidPath,
            format!("Not a local file path: {}", resource),
        )
    })
}

fn binary_error(resource: &Url) -> FileOperationError {
    FileOperationError::new(
        FileOperationResult::FileIsBinary,
        format!("File seems to be binary and cannot be opened as text: {}", resource),
    )
}

fn map_io_error(resource: &Url, path: &Path, action: &str, err: io::Error) -> FileOperationError {
    match err.kind() {
        io::ErrorKind::NotFound => FileOperationError::not_found(resource),
        io::ErrorKind::PermissionDenied => FileOperationError::new(
            FileOperationResult::PermissionDenied,
            format!("Permission denied to {} {}", action, path.display()),
        ),
        _ => FileOperationError::new(
            FileOperationResult::Other,
            format!("Failed to {} {}: {}", action, path.display(), err),
        ),
    }
}

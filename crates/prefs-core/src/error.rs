//! Error types for settings resolution and model provisioning.

use crate::files::FileOperationError;

/// Errors surfaced by the preferences service.
///
/// Absence (no workspace open, no remote, resource outside every folder) is
/// reported as `None` by the resolver and never through this type.
#[derive(Debug, thiserror::Error)]
pub enum PrefsError {
    /// Caller contract violation; retrying will not help.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// File access failed; carries the collaborator's result code.
    #[error(transparent)]
    File(#[from] FileOperationError),

    /// Writing a missing settings file failed.
    #[error("Unable to create '{resource}' ({source}).")]
    CreateFailed {
        resource: String,
        #[source]
        source: FileOperationError,
    },

    #[error("Open a folder or workspace first to create workspace or folder settings.")]
    NoWorkspaceOpen,

    /// Editable settings content is not a JSON object.
    #[error("invalid settings in {resource}: {message}")]
    InvalidSettings { resource: String, message: String },

    #[error("command '{command}' failed: {message}")]
    Command { command: String, message: String },
}

impl PrefsError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn command(command: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Command {
            command: command.into(),
            message: message.into(),
        }
    }

    /// True when the underlying file operation reported a missing file.
    pub fn is_not_found(&self) -> bool {
        matches!(self, PrefsError::File(err) if err.is_not_found())
    }
}

pub type PrefsResult<T> = Result<T, PrefsError>;

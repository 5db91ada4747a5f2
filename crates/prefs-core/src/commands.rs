//! Command dispatch collaborator.

use async_trait::async_trait;
use url::Url;

use crate::error::PrefsResult;

/// Reveals a file in the platform file manager.
pub const REVEAL_FILE_IN_OS: &str = "revealFileInOS";

#[async_trait]
pub trait CommandService: Send + Sync {
    async fn execute_command(&self, command: &str, resource: &Url) -> PrefsResult<()>;
}

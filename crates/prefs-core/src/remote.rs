//! Remote environment collaborator.

use async_trait::async_trait;
use url::Url;

/// What the connected remote agent reports about itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteEnvironment {
    /// User settings file on the remote machine.
    pub settings_path: Url,
}

#[async_trait]
pub trait RemoteAgent: Send + Sync {
    /// `None` when no remote is connected.
    async fn environment(&self) -> Option<RemoteEnvironment>;
}

/// No remote connection.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalOnly;

#[async_trait]
impl RemoteAgent for LocalOnly {
    async fn environment(&self) -> Option<RemoteEnvironment> {
        None
    }
}

/// Remote environment fixed at startup.
#[derive(Debug, Clone)]
pub struct StaticRemote {
    environment: Option<RemoteEnvironment>,
}

impl StaticRemote {
    pub fn new(settings_path: Url) -> Self {
        Self {
            environment: Some(RemoteEnvironment { settings_path }),
        }
    }
}

#[async_trait]
impl RemoteAgent for StaticRemote {
    async fn environment(&self) -> Option<RemoteEnvironment> {
        self.environment.clone()
    }
}

//! Shared core types used across the resolver, models and configuration layers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Scope a settings document belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConfigurationTarget {
    /// User settings on the local machine.
    UserLocal,
    /// User settings of the connected remote machine.
    UserRemote,
    /// Workspace settings (workspace file or first folder).
    Workspace,
    /// Settings of a single folder of the workspace.
    WorkspaceFolder,
}

impl ConfigurationTarget {
    pub const ALL: [ConfigurationTarget; 4] = [
        ConfigurationTarget::UserLocal,
        ConfigurationTarget::UserRemote,
        ConfigurationTarget::Workspace,
        ConfigurationTarget::WorkspaceFolder,
    ];

    /// Short name used on the command line and in `prefs.toml`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigurationTarget::UserLocal => "user",
            ConfigurationTarget::UserRemote => "remote",
            ConfigurationTarget::Workspace => "workspace",
            ConfigurationTarget::WorkspaceFolder => "folder",
        }
    }
}

impl fmt::Display for ConfigurationTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfigurationTarget {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" | "user-local" | "global" => Ok(ConfigurationTarget::UserLocal),
            "remote" | "user-remote" => Ok(ConfigurationTarget::UserRemote),
            "workspace" => Ok(ConfigurationTarget::Workspace),
            "folder" | "workspace-folder" => Ok(ConfigurationTarget::WorkspaceFolder),
            _ => anyhow::bail!(
                "Unknown configuration target: {}. Use 'user', 'remote', 'workspace' or 'folder'",
                s
            ),
        }
    }
}

/// What the host currently has open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WorkbenchState {
    /// No folder or workspace.
    Empty,
    /// A single folder without a workspace file.
    Folder,
    /// A (possibly multi-root) workspace backed by a workspace file.
    Workspace,
}

/// Where a configuration change originated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConfigurationSource {
    /// Registered default values changed (e.g. an extension contributed settings).
    Default,
    UserLocal,
    UserRemote,
    Workspace,
    WorkspaceFolder,
    Memory,
}

/// Notification emitted by the host configuration store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigurationChangeEvent {
    pub source: ConfigurationSource,
    /// Keys affected by the change, when known.
    pub affected_keys: Vec<String>,
}

impl ConfigurationChangeEvent {
    pub fn new(source: ConfigurationSource) -> Self {
        Self {
            source,
            affected_keys: Vec::new(),
        }
    }

    pub fn with_keys(mut self, keys: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.affected_keys = keys.into_iter().map(Into::into).collect();
        self
    }
}

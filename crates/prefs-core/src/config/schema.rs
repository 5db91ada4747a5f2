//! Configuration schema for prefs.toml
//!
//! Describes the host the resolver runs in:
//! - where the user's settings and keybindings live
//! - which workspace file and folders are open
//! - the remote settings location, if a remote is connected
//! - editor preferences and extra default values

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use super::paths::resource_from_location;

/// Root configuration structure for prefs.toml
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PrefsConfig {
    #[serde(default)]
    pub environment: EnvironmentConfig,

    #[serde(default)]
    pub workspace: WorkspaceConfig,

    #[serde(default)]
    pub remote: RemoteConfig,

    #[serde(default)]
    pub editor: EditorConfig,

    /// Default values added to (or overriding) the built-in defaults table
    #[serde(default)]
    pub defaults: BTreeMap<String, toml::Value>,
}

/// Locations of the local user's editable files
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EnvironmentConfig {
    /// Path or URI of the user settings file
    #[serde(default)]
    pub settings: Option<String>,

    /// Path or URI of the user keybindings file
    #[serde(default)]
    pub keybindings: Option<String>,
}

/// What is open in the host
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WorkspaceConfig {
    /// Workspace file (e.g. `project.code-workspace`)
    #[serde(default)]
    pub configuration: Option<String>,

    /// Root folders, in order
    #[serde(default)]
    pub folders: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RemoteConfig {
    /// URI of the remote user settings file
    #[serde(default)]
    pub settings: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EditorConfig {
    /// Open settings as JSON rather than in the settings editor
    #[serde(default)]
    pub json: bool,
}

impl PrefsConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the configuration
    ///
    /// Relative locations are checked against `base_dir`.
    pub fn validate(&self, base_dir: &Path) -> anyhow::Result<()> {
        let locations = [
            ("environment.settings", self.environment.settings.as_deref()),
            (
                "environment.keybindings",
                self.environment.keybindings.as_deref(),
            ),
            (
                "workspace.configuration",
                self.workspace.configuration.as_deref(),
            ),
            ("remote.settings", self.remote.settings.as_deref()),
        ];
        for (field, location) in locations {
            if let Some(location) = location {
                resource_from_location(location, base_dir)
                    .with_context(|| format!("Invalid location for {}", field))?;
            }
        }

        for folder in &self.workspace.folders {
            if folder.trim().is_empty() {
                anyhow::bail!("Workspace folder entries cannot be empty");
            }
            resource_from_location(folder, base_dir)
                .with_context(|| format!("Invalid workspace folder: {}", folder))?;
        }

        if self.remote.settings.as_deref().is_some_and(|s| !s.contains("://")) {
            anyhow::bail!("remote.settings must be a URI (e.g. vscode-remote://host/path)");
        }

        for key in self.defaults.keys() {
            if key.trim().is_empty() || key.starts_with('.') || key.ends_with('.') {
                anyhow::bail!("Invalid default setting key: '{}'", key);
            }
        }
        Ok(())
    }

    /// Defaults table as JSON values.
    pub fn default_values(&self) -> anyhow::Result<BTreeMap<String, serde_json::Value>> {
        self.defaults
            .iter()
            .map(|(key, value)| {
                let value = serde_json::to_value(value)
                    .with_context(|| format!("Failed to convert default for {}", key))?;
                Ok((key.clone(), value))
            })
            .collect()
    }
}

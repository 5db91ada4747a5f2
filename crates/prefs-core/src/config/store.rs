//! Config store for loading and saving prefs.toml.

use std::path::{Path, PathBuf};

use anyhow::Context;

use super::{PrefsConfig, parser, paths::config_file_candidates};

#[derive(Debug, Clone)]
pub struct ConfigStore {
    config_path: PathBuf,
}

impl ConfigStore {
    /// Use the first existing candidate, or the project file when none exists.
    pub fn discover(project_root: &Path, config_dir: &Path) -> Self {
        let candidates = config_file_candidates(project_root, config_dir);
        let config_path = candidates
            .iter()
            .find(|path| path.exists())
            .or_else(|| candidates.first())
            .cloned()
            .unwrap_or_else(|| project_root.join(super::paths::CONFIG_FILE_NAME));
        Self { config_path }
    }

    pub fn from_path(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn exists(&self) -> bool {
        self.config_path.exists()
    }

    pub fn load(&self) -> anyhow::Result<PrefsConfig> {
        if !self.config_path.exists() {
            tracing::debug!(path = %self.config_path.display(), "no config file, using defaults");
            return Ok(PrefsConfig::new());
        }
        parser::parse_prefs_toml(&self.config_path)
    }

    pub fn save(&self, config: &PrefsConfig) -> anyhow::Result<()> {
        let content = parser::to_toml(config).context("Failed to serialize config to TOML")?;
        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        std::fs::write(&self.config_path, content).with_context(|| {
            format!(
                "Failed to write config file: {}",
                self.config_path.display()
            )
        })?;
        Ok(())
    }
}

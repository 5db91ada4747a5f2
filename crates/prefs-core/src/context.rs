//! Application context: turns prefs.toml into a wired preferences service.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::commands::CommandService;
use crate::config::paths::{default_keybindings_path, default_settings_path, path_to_resource};
use crate::config::{ConfigStore, PrefsConfig, resource_from_location};
use crate::defaults::StaticDefaults;
use crate::environment::Environment;
use crate::files::{FileService, LocalFileService};
use crate::preferences::{Collaborators, PreferencesService};
use crate::remote::{LocalOnly, RemoteAgent, StaticRemote};
use crate::text_model::ModelStore;
use crate::workspace::{StaticWorkspace, Workspace, WorkspaceFolder};

/// Unified application context for dependency injection.
///
/// Frontends create this once, load the config and build the service from it.
#[derive(Debug, Clone)]
pub struct AppContext {
    project_root: PathBuf,
    config_dir: PathBuf,
    config_store: ConfigStore,
}

impl AppContext {
    pub fn new(project_root: PathBuf) -> Self {
        let config_dir = dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
            .unwrap_or_else(|| project_root.join(".config"));
        Self::with_config_dir(project_root, config_dir)
    }

    /// Create context with a custom config directory (for testing).
    pub fn with_config_dir(project_root: PathBuf, config_dir: PathBuf) -> Self {
        let config_store = ConfigStore::discover(&project_root, &config_dir);
        Self {
            project_root,
            config_dir,
            config_store,
        }
    }

    /// Read prefs.toml from an explicit path instead of discovering it.
    pub fn with_config_path(mut self, config_path: PathBuf) -> Self {
        self.config_store = ConfigStore::from_path(config_path);
        self
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn config_store(&self) -> &ConfigStore {
        &self.config_store
    }

    pub fn load_config(&self) -> anyhow::Result<PrefsConfig> {
        self.config_store.load()
    }

    /// Directory relative locations in the config are resolved from.
    pub fn base_dir(&self) -> &Path {
        self.config_store
            .config_path()
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or(self.project_root.as_path())
    }

    pub fn environment(&self, config: &PrefsConfig) -> anyhow::Result<Environment> {
        let settings_resource = match &config.environment.settings {
            Some(location) => resource_from_location(location, self.base_dir())?,
            None => path_to_resource(&default_settings_path(&self.config_dir))?,
        };
        let keybindings_resource = match &config.environment.keybindings {
            Some(location) => resource_from_location(location, self.base_dir())?,
            None => path_to_resource(&default_keybindings_path(&self.config_dir))?,
        };
        Ok(Environment::new(settings_resource, keybindings_resource))
    }

    pub fn workspace(&self, config: &PrefsConfig) -> anyhow::Result<StaticWorkspace> {
        let configuration = config
            .workspace
            .configuration
            .as_deref()
            .map(|location| resource_from_location(location, self.base_dir()))
            .transpose()?;
        let folders = config
            .workspace
            .folders
            .iter()
            .enumerate()
            .map(|(index, location)| {
                resource_from_location(location, self.base_dir())
                    .map(|uri| WorkspaceFolder::new(uri, index))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        Ok(StaticWorkspace::from_workspace(Workspace {
            configuration,
            folders,
        }))
    }

    pub fn remote(&self, config: &PrefsConfig) -> anyhow::Result<Arc<dyn RemoteAgent>> {
        Ok(match &config.remote.settings {
            Some(location) => Arc::new(StaticRemote::new(resource_from_location(
                location,
                self.base_dir(),
            )?)),
            None => Arc::new(LocalOnly),
        })
    }

    /// Built-in defaults with the `[defaults]` table applied on top.
    pub fn defaults(&self, config: &PrefsConfig) -> anyhow::Result<StaticDefaults> {
        let defaults = StaticDefaults::builtin();
        for (key, value) in config.default_values()? {
            defaults.set_default(&key, value);
        }
        Ok(defaults)
    }

    /// Wire a preferences service over local files.
    pub fn build_service(
        &self,
        config: &PrefsConfig,
        commands: Arc<dyn CommandService>,
    ) -> anyhow::Result<PreferencesService> {
        let files: Arc<dyn FileService> = Arc::new(LocalFileService::new());
        let store = Arc::new(ModelStore::new(files.clone()));

        let service = PreferencesService::new(Collaborators {
            environment: self.environment(config)?,
            workspace: Arc::new(self.workspace(config)?),
            remote: self.remote(config)?,
            text_models: store.clone(),
            models: store,
            files,
            commands,
            defaults: Arc::new(self.defaults(config)?),
        })
        .with_json_editor(config.editor.json);

        tracing::debug!(?service, "preferences service ready");
        Ok(service)
    }
}

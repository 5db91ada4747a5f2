//! Settings resource resolution and editor-model provisioning.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::watch;
use url::Url;

use super::default_settings::{DefaultSettings, MOST_COMMONLY_USED_SETTINGS};
use super::models::{
    DefaultSettingsEditorModel, PreferencesEditorModel, SettingsEditorModel, SettingsModelKind,
};
use super::open::{OpenSettingsOptions, OpenedSettings, RevealSetting};
use super::resources::{default_raw_settings_resource, default_settings_target};
use crate::commands::{CommandService, REVEAL_FILE_IN_OS};
use crate::defaults::ConfigurationDefaults;
use crate::environment::Environment;
use crate::error::{PrefsError, PrefsResult};
use crate::files::{FileService, ReadOptions};
use crate::remote::RemoteAgent;
use crate::text_model::{ModelService, TextModel, TextModelResolver};
use crate::types::{ConfigurationChangeEvent, ConfigurationSource, ConfigurationTarget, WorkbenchState};
use crate::workspace::{FOLDER_SETTINGS_PATH, WorkspaceContext};

/// Initial content of a freshly created keybindings file.
pub const EMPTY_KEYBINDINGS_CONTENT: &str =
    "// Place your key bindings in this file to override the defaults\n[\n]";

/// Initial content of a freshly created settings file.
pub const EMPTY_SETTINGS_CONTENT: &str = "{\n}";

/// Everything the service talks to, wired by the composition root.
#[derive(Clone)]
pub struct Collaborators {
    pub environment: Environment,
    pub workspace: Arc<dyn WorkspaceContext>,
    pub remote: Arc<dyn RemoteAgent>,
    pub text_models: Arc<dyn TextModelResolver>,
    pub models: Arc<dyn ModelService>,
    pub files: Arc<dyn FileService>,
    pub commands: Arc<dyn CommandService>,
    pub defaults: Arc<dyn ConfigurationDefaults>,
}

/// Text models this service materialised and keeps in sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LiveModel {
    Default(ConfigurationTarget),
    Raw,
}

/// Resolves settings scopes to documents and hands out settings models.
pub struct PreferencesService {
    environment: Environment,
    workspace: Arc<dyn WorkspaceContext>,
    remote: Arc<dyn RemoteAgent>,
    text_models: Arc<dyn TextModelResolver>,
    models: Arc<dyn ModelService>,
    files: Arc<dyn FileService>,
    commands: Arc<dyn CommandService>,
    defaults: Arc<dyn ConfigurationDefaults>,
    prefer_json_editor: bool,
    default_settings: Mutex<HashMap<ConfigurationTarget, Arc<DefaultSettings>>>,
    live_models: Mutex<HashMap<Url, LiveModel>>,
    disposed: watch::Sender<bool>,
}

impl PreferencesService {
    pub fn new(collaborators: Collaborators) -> Self {
        let Collaborators {
            environment,
            workspace,
            remote,
            text_models,
            models,
            files,
            commands,
            defaults,
        } = collaborators;
        let (disposed, _) = watch::channel(false);
        Self {
            environment,
            workspace,
            remote,
            text_models,
            models,
            files,
            commands,
            defaults,
            prefer_json_editor: false,
            default_settings: Mutex::new(HashMap::new()),
            live_models: Mutex::new(HashMap::new()),
            disposed,
        }
    }

    /// Open JSON documents rather than the settings editor unless told otherwise.
    pub fn with_json_editor(mut self, prefer_json_editor: bool) -> Self {
        self.prefer_json_editor = prefer_json_editor;
        self
    }

    pub fn prefers_json_editor(&self) -> bool {
        self.prefer_json_editor
    }

    // Resource resolution

    pub fn user_settings_resource(&self) -> Url {
        self.environment.settings_resource.clone()
    }

    /// Workspace file when one is open, otherwise the first folder's settings file.
    pub fn workspace_settings_resource(&self) -> Option<Url> {
        if self.workspace.workbench_state() == WorkbenchState::Empty {
            return None;
        }
        let workspace = self.workspace.workspace();
        if let Some(configuration) = workspace.configuration {
            return Some(configuration);
        }
        workspace
            .folders
            .first()
            .map(|folder| folder.to_resource(FOLDER_SETTINGS_PATH))
    }

    /// Settings file of the folder containing `resource`.
    pub fn folder_settings_resource(&self, resource: &Url) -> Option<Url> {
        self.workspace
            .workspace_folder(resource)
            .map(|folder| folder.to_resource(FOLDER_SETTINGS_PATH))
    }

    pub async fn remote_settings_resource(&self) -> Option<Url> {
        self.remote
            .environment()
            .await
            .map(|environment| environment.settings_path)
    }

    /// Editable settings document for `target`.
    ///
    /// `resource` is required for [`ConfigurationTarget::WorkspaceFolder`] and
    /// ignored otherwise.
    pub async fn editable_settings_resource(
        &self,
        target: ConfigurationTarget,
        resource: Option<&Url>,
    ) -> PrefsResult<Option<Url>> {
        let uri = match target {
            ConfigurationTarget::UserLocal => Some(self.user_settings_resource()),
            ConfigurationTarget::UserRemote => self.remote_settings_resource().await,
            ConfigurationTarget::Workspace => self.workspace_settings_resource(),
            ConfigurationTarget::WorkspaceFolder => {
                let resource = resource.ok_or_else(|| {
                    PrefsError::invalid_argument("a resource is required to resolve folder settings")
                })?;
                self.folder_settings_resource(resource)
            }
        };
        tracing::debug!(%target, uri = ?uri.as_ref().map(Url::as_str), "resolved editable settings");
        Ok(uri)
    }

    // Default settings

    /// The cached default settings for `target`, created on first use.
    pub fn default_settings(&self, target: ConfigurationTarget) -> Arc<DefaultSettings> {
        let mut cache = lock(&self.default_settings);
        cache
            .entry(target)
            .or_insert_with(|| {
                tracing::debug!(%target, "creating default settings");
                Arc::new(DefaultSettings::new(
                    MOST_COMMONLY_USED_SETTINGS
                        .iter()
                        .map(|key| key.to_string())
                        .collect(),
                    target,
                    self.defaults.clone(),
                ))
            })
            .clone()
    }

    /// React to a configuration change; only DEFAULT-source changes matter.
    pub fn handle_configuration_change(&self, event: &ConfigurationChangeEvent) {
        if event.source != ConfigurationSource::Default {
            return;
        }

        let cached: Vec<Arc<DefaultSettings>> =
            lock(&self.default_settings).values().cloned().collect();
        for default_settings in &cached {
            default_settings.refresh();
        }

        let live: Vec<(Url, LiveModel)> = lock(&self.live_models)
            .iter()
            .map(|(uri, live)| (uri.clone(), *live))
            .collect();
        for (uri, live) in live {
            let Some(model) = self.models.get_model(&uri) else {
                continue;
            };
            model.set_content(self.live_content(live));
        }

        tracing::info!(
            models = cached.len(),
            keys = event.affected_keys.len(),
            "default settings changed"
        );
        for default_settings in cached {
            default_settings.notify_changed();
        }
    }

    /// Materialise the text model behind a synthetic default settings URI.
    pub fn resolve_model(&self, uri: &Url) -> Option<Arc<TextModel>> {
        let live = if let Some(target) = default_settings_target(uri) {
            LiveModel::Default(target)
        } else if *uri == default_raw_settings_resource() {
            LiveModel::Raw
        } else {
            return None;
        };

        let model = self.models.create_model(self.live_content(live), uri);
        lock(&self.live_models).insert(uri.clone(), live);
        Some(model)
    }

    pub fn raw_default_settings_model(&self) -> Arc<TextModel> {
        let uri = default_raw_settings_resource();
        self.models.get_model(&uri).unwrap_or_else(|| {
            let model = self.models.create_model(self.live_content(LiveModel::Raw), &uri);
            lock(&self.live_models).insert(uri, LiveModel::Raw);
            model
        })
    }

    fn live_content(&self, live: LiveModel) -> String {
        match live {
            LiveModel::Default(target) => self
                .default_settings(target)
                .content_without_most_commonly_used(),
            LiveModel::Raw => self
                .default_settings(ConfigurationTarget::UserLocal)
                .raw_content(),
        }
    }

    // Editor models

    /// Model for any settings document this service knows about.
    pub async fn create_preferences_editor_model(
        &self,
        uri: &Url,
    ) -> PrefsResult<Option<PreferencesEditorModel>> {
        if default_settings_target(uri).is_some() {
            return self
                .create_default_settings_model(uri)
                .await
                .map(|model| Some(PreferencesEditorModel::Default(model)));
        }

        if *uri == self.environment.settings_resource {
            return self
                .editable(ConfigurationTarget::UserLocal, uri)
                .await
                .map(Some);
        }

        if self.workspace_settings_resource().as_ref() == Some(uri) {
            return self
                .editable(ConfigurationTarget::Workspace, uri)
                .await
                .map(Some);
        }

        if self.workspace.workbench_state() == WorkbenchState::Workspace
            && self.folder_settings_resource(uri).as_ref() == Some(uri)
        {
            return self
                .editable(ConfigurationTarget::WorkspaceFolder, uri)
                .await
                .map(Some);
        }

        if self.remote_settings_resource().await.as_ref() == Some(uri) {
            return self
                .editable(ConfigurationTarget::UserRemote, uri)
                .await
                .map(Some);
        }

        Ok(None)
    }

    async fn editable(
        &self,
        target: ConfigurationTarget,
        uri: &Url,
    ) -> PrefsResult<PreferencesEditorModel> {
        self.create_editable_settings_model(target, uri)
            .await
            .map(PreferencesEditorModel::Editable)
    }

    /// Wrap the document at `uri` as the editable settings of `target`.
    ///
    /// The workspace file gets the workspace-configuration flavour regardless
    /// of `target`.
    pub async fn create_editable_settings_model(
        &self,
        target: ConfigurationTarget,
        uri: &Url,
    ) -> PrefsResult<SettingsEditorModel> {
        let kind = match self.workspace.workspace().configuration {
            Some(configuration) if configuration == *uri => SettingsModelKind::WorkspaceConfiguration,
            _ => SettingsModelKind::Settings,
        };
        let reference = self.text_models.create_model_reference(uri).await?;
        tracing::debug!(%target, ?kind, uri = %uri, "created settings editor model");
        Ok(SettingsEditorModel::new(kind, target, reference))
    }

    pub async fn create_default_settings_model(
        &self,
        uri: &Url,
    ) -> PrefsResult<DefaultSettingsEditorModel> {
        let target = default_settings_target(uri).ok_or_else(|| {
            PrefsError::invalid_argument(format!("not a default settings resource: {}", uri))
        })?;

        if self.models.get_model(uri).is_none() {
            self.resolve_model(uri);
        }
        let reference = self.text_models.create_model_reference(uri).await?;
        Ok(DefaultSettingsEditorModel::new(
            uri.clone(),
            target,
            reference,
            self.default_settings(target),
        ))
    }

    // File creation

    /// Create `resource` with `contents` unless it can already be read.
    ///
    /// Not atomic: two callers racing on a missing file both write, and the
    /// last write wins.
    pub async fn ensure_exists(&self, resource: &Url, contents: &str) -> PrefsResult<()> {
        match self.files.read(resource, ReadOptions::text_only()).await {
            Ok(_) => Ok(()),
            Err(err) if err.is_not_found() => {
                tracing::info!(uri = %resource, "creating settings file");
                self.files
                    .write(resource, contents)
                    .await
                    .map_err(|source| PrefsError::CreateFailed {
                        resource: self.resource_label(resource),
                        source,
                    })
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Make sure the editable keybindings file exists and return it.
    pub async fn prepare_keybindings_file(&self) -> PrefsResult<Url> {
        let resource = self.environment.keybindings_resource.clone();
        self.ensure_exists(&resource, EMPTY_KEYBINDINGS_CONTENT)
            .await?;
        Ok(resource)
    }

    /// Short, human-readable name for `resource`.
    pub fn resource_label(&self, resource: &Url) -> String {
        let workspace = self.workspace.workspace();
        if let Some(folder) = workspace.folder_containing(resource)
            && let Some(relative) = folder.relative_path(resource)
        {
            return if workspace.folders.len() > 1 {
                format!("{}/{}", folder.name, relative)
            } else {
                relative
            };
        }
        if resource.scheme() == "file"
            && let Ok(path) = resource.to_file_path()
        {
            return path.display().to_string();
        }
        resource.to_string()
    }

    // Opening

    pub async fn open_settings(&self, options: OpenSettingsOptions) -> PrefsResult<OpenedSettings> {
        let mut options = options.with_target(ConfigurationTarget::UserLocal);
        if options.query.is_some() {
            options.json_editor = Some(false);
        }
        self.open(&self.user_settings_resource(), options).await
    }

    pub async fn open_user_settings(
        &self,
        options: OpenSettingsOptions,
    ) -> PrefsResult<OpenedSettings> {
        let options = options.with_target(ConfigurationTarget::UserLocal);
        self.open(&self.user_settings_resource(), options).await
    }

    /// Open user settings filtered (or positioned) on one language.
    pub async fn open_language_specific_settings(
        &self,
        language_id: &str,
        mut options: OpenSettingsOptions,
    ) -> PrefsResult<OpenedSettings> {
        if self.prefer_json_editor {
            options.query = None;
            options.reveal_setting = Some(RevealSetting {
                key: format!("[{}]", language_id),
                edit: true,
            });
        } else {
            options.query = Some(match options.query.take() {
                Some(query) => format!("@lang:{} {}", language_id, query),
                None => format!("@lang:{}", language_id),
            });
        }
        options.target = options.target.or(Some(ConfigurationTarget::UserLocal));
        self.open(&self.user_settings_resource(), options).await
    }

    /// Open remote user settings; `None` when no remote is connected.
    pub async fn open_remote_settings(
        &self,
        options: OpenSettingsOptions,
    ) -> PrefsResult<Option<OpenedSettings>> {
        let Some(environment) = self.remote.environment().await else {
            return Ok(None);
        };
        let options = options.with_target(ConfigurationTarget::UserRemote);
        self.open(&environment.settings_path, options).await.map(Some)
    }

    pub async fn open_workspace_settings(
        &self,
        options: OpenSettingsOptions,
    ) -> PrefsResult<OpenedSettings> {
        let Some(resource) = self.workspace_settings_resource() else {
            tracing::warn!("no folder or workspace open");
            return Err(PrefsError::NoWorkspaceOpen);
        };
        let options = options.with_target(ConfigurationTarget::Workspace);
        self.open(&resource, options).await
    }

    pub async fn open_folder_settings(
        &self,
        options: OpenSettingsOptions,
    ) -> PrefsResult<OpenedSettings> {
        let options = options.with_target(ConfigurationTarget::WorkspaceFolder);
        let folder_uri = options
            .folder_uri
            .clone()
            .ok_or_else(|| PrefsError::invalid_argument("Missing folder URI"))?;
        let resource = self
            .editable_settings_resource(ConfigurationTarget::WorkspaceFolder, Some(&folder_uri))
            .await?
            .ok_or_else(|| {
                PrefsError::invalid_argument(format!("Invalid folder URI - {}", folder_uri))
            })?;
        self.open(&resource, options).await
    }

    async fn open(
        &self,
        resource: &Url,
        mut options: OpenSettingsOptions,
    ) -> PrefsResult<OpenedSettings> {
        options.json_editor = Some(options.json_editor.unwrap_or(self.prefer_json_editor));
        let revealed = canonical_file_uri(resource);
        tracing::info!(
            uri = %resource,
            target = ?options.target,
            json_editor = ?options.json_editor,
            "opening settings"
        );
        self.commands
            .execute_command(REVEAL_FILE_IN_OS, &revealed)
            .await?;
        Ok(OpenedSettings {
            resource: resource.clone(),
            revealed,
            options,
        })
    }

    // Lifecycle

    /// Tear down: notify listeners once and drop cached state.
    pub fn dispose(&self) {
        let fired = self.disposed.send_if_modified(|disposed| {
            if *disposed {
                false
            } else {
                *disposed = true;
                true
            }
        });
        if fired {
            lock(&self.live_models).clear();
            lock(&self.default_settings).clear();
            tracing::debug!("preferences service disposed");
        }
    }

    pub fn is_disposed(&self) -> bool {
        *self.disposed.borrow()
    }

    /// Receiver that flips to `true` on [`dispose`](Self::dispose).
    pub fn on_dispose(&self) -> watch::Receiver<bool> {
        self.disposed.subscribe()
    }
}

impl std::fmt::Debug for PreferencesService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreferencesService")
            .field("environment", &self.environment)
            .field("prefer_json_editor", &self.prefer_json_editor)
            .finish_non_exhaustive()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Local file URI for the path of `resource`, as the OS reveal command expects.
fn canonical_file_uri(resource: &Url) -> Url {
    if resource.scheme() == "file" {
        return resource.clone();
    }
    Url::from_file_path(resource.path()).unwrap_or_else(|()| resource.clone())
}

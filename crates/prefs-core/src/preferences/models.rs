//! Editor models handed out by the preferences service.

use std::sync::Arc;

use serde_json::{Map, Value};
use tokio::sync::watch;
use url::Url;

use super::default_settings::DefaultSettings;
use crate::defaults::SettingDescriptor;
use crate::error::{PrefsError, PrefsResult};
use crate::text_model::ModelReference;
use crate::types::ConfigurationTarget;

/// Which flavour of editable settings document a model wraps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingsModelKind {
    /// A plain `settings.json`.
    Settings,
    /// A workspace file; settings live under its `settings` key.
    WorkspaceConfiguration,
}

/// Editable settings document of one configuration target.
#[derive(Debug)]
pub struct SettingsEditorModel {
    kind: SettingsModelKind,
    target: ConfigurationTarget,
    reference: ModelReference,
}

impl SettingsEditorModel {
    pub fn new(kind: SettingsModelKind, target: ConfigurationTarget, reference: ModelReference) -> Self {
        Self {
            kind,
            target,
            reference,
        }
    }

    pub fn uri(&self) -> &Url {
        self.reference.model().uri()
    }

    pub fn target(&self) -> ConfigurationTarget {
        self.target
    }

    pub fn kind(&self) -> SettingsModelKind {
        self.kind
    }

    pub fn is_workspace_configuration(&self) -> bool {
        self.kind == SettingsModelKind::WorkspaceConfiguration
    }

    pub fn content(&self) -> String {
        self.reference.model().content()
    }

    /// Key path of the settings object inside the document.
    pub fn settings_path(&self) -> &'static [&'static str] {
        match self.kind {
            SettingsModelKind::Settings => &[],
            SettingsModelKind::WorkspaceConfiguration => &["settings"],
        }
    }

    /// Configured settings, read from the current document content.
    ///
    /// Documents are JSONC: comments and trailing commas are accepted. An
    /// empty document or a workspace file without a `settings` key yields an
    /// empty map.
    pub fn settings(&self) -> PrefsResult<Map<String, Value>> {
        let content = self.content();
        let Some(root) = jsonc_parser::parse_to_serde_value::<Option<Value>>(&content, &Default::default())
            .map_err(|e| self.invalid(e.to_string()))?
        else {
            return Ok(Map::new());
        };

        let mut current = &root;
        for key in self.settings_path() {
            match current.get(key) {
                Some(value) => current = value,
                None => return Ok(Map::new()),
            }
        }
        match current {
            Value::Object(map) => Ok(map.clone()),
            _ => Err(self.invalid("expected a JSON object".to_string())),
        }
    }

    fn invalid(&self, message: String) -> PrefsError {
        PrefsError::InvalidSettings {
            resource: self.uri().to_string(),
            message,
        }
    }
}

/// Read-only default settings document paired with its cached [`DefaultSettings`].
#[derive(Debug)]
pub struct DefaultSettingsEditorModel {
    uri: Url,
    target: ConfigurationTarget,
    reference: ModelReference,
    default_settings: Arc<DefaultSettings>,
}

impl DefaultSettingsEditorModel {
    pub fn new(
        uri: Url,
        target: ConfigurationTarget,
        reference: ModelReference,
        default_settings: Arc<DefaultSettings>,
    ) -> Self {
        Self {
            uri,
            target,
            reference,
            default_settings,
        }
    }

    pub fn uri(&self) -> &Url {
        &self.uri
    }

    pub fn target(&self) -> ConfigurationTarget {
        self.target
    }

    /// Current text of the backing model.
    pub fn content(&self) -> String {
        self.reference.model().content()
    }

    pub fn settings(&self) -> Vec<SettingDescriptor> {
        self.default_settings.settings()
    }

    pub fn most_commonly_used(&self) -> &[String] {
        self.default_settings.most_commonly_used()
    }

    /// Fires whenever the default settings are regenerated.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.default_settings.subscribe()
    }

    pub fn default_settings(&self) -> &Arc<DefaultSettings> {
        &self.default_settings
    }
}

/// Any model the preferences service can create for a settings URI.
#[derive(Debug)]
pub enum PreferencesEditorModel {
    Default(DefaultSettingsEditorModel),
    Editable(SettingsEditorModel),
}

impl PreferencesEditorModel {
    pub fn uri(&self) -> &Url {
        match self {
            PreferencesEditorModel::Default(model) => model.uri(),
            PreferencesEditorModel::Editable(model) => model.uri(),
        }
    }

    pub fn target(&self) -> ConfigurationTarget {
        match self {
            PreferencesEditorModel::Default(model) => model.target(),
            PreferencesEditorModel::Editable(model) => model.target(),
        }
    }
}

//! Options for opening settings documents.

use serde::Serialize;
use url::Url;

use crate::types::ConfigurationTarget;

/// Setting to reveal once the document is shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RevealSetting {
    pub key: String,
    /// Put the cursor into the value for editing.
    pub edit: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OpenSettingsOptions {
    pub target: Option<ConfigurationTarget>,
    /// Folder whose settings should open; required for folder settings.
    pub folder_uri: Option<Url>,
    /// Search query for the settings editor.
    pub query: Option<String>,
    pub reveal_setting: Option<RevealSetting>,
    /// Open the JSON document instead of the settings editor.
    /// Unset means "use the configured preference".
    pub json_editor: Option<bool>,
}

impl OpenSettingsOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_target(mut self, target: ConfigurationTarget) -> Self {
        self.target = Some(target);
        self
    }

    pub fn with_folder(mut self, folder_uri: Url) -> Self {
        self.folder_uri = Some(folder_uri);
        self
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn with_json_editor(mut self, json_editor: bool) -> Self {
        self.json_editor = Some(json_editor);
        self
    }
}

/// What an open request resolved to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpenedSettings {
    /// The settings document that was requested.
    pub resource: Url,
    /// The location handed to the reveal command.
    pub revealed: Url,
    /// Options after defaults were applied.
    pub options: OpenSettingsOptions,
}

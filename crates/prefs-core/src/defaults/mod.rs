//! Registered setting defaults.
//!
//! The host's configuration registry is modelled as a [`ConfigurationDefaults`]
//! provider; default settings documents are rendered from its descriptors.

use std::collections::BTreeMap;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::types::ConfigurationTarget;

/// Where a setting may be configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SettingScope {
    /// Only in local user settings.
    Application,
    /// User settings, local or remote.
    Machine,
    /// User or workspace settings.
    #[default]
    Window,
    /// User, workspace or folder settings.
    Resource,
}

impl SettingScope {
    /// Whether a setting with this scope may appear in a document for `target`.
    pub fn applies_to(&self, target: ConfigurationTarget) -> bool {
        match target {
            ConfigurationTarget::UserLocal => true,
            ConfigurationTarget::UserRemote => *self != SettingScope::Application,
            ConfigurationTarget::Workspace => {
                matches!(self, SettingScope::Window | SettingScope::Resource)
            }
            ConfigurationTarget::WorkspaceFolder => *self == SettingScope::Resource,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingDescriptor {
    pub key: String,
    pub default: Value,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub scope: SettingScope,
}

impl SettingDescriptor {
    pub fn new(key: impl Into<String>, default: Value, scope: SettingScope) -> Self {
        Self {
            key: key.into(),
            default,
            description: None,
            scope,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// First dotted segment, used to group settings in rendered documents.
    pub fn section(&self) -> &str {
        self.key.split('.').next().unwrap_or(&self.key)
    }
}

pub trait ConfigurationDefaults: Send + Sync {
    /// Every registered setting, in any order.
    fn settings(&self) -> Vec<SettingDescriptor>;
}

/// Mutable in-memory defaults table.
///
/// Changing it does not notify anyone; the owner is expected to raise a
/// DEFAULT-source configuration change afterwards.
#[derive(Debug, Default)]
pub struct StaticDefaults {
    settings: RwLock<BTreeMap<String, SettingDescriptor>>,
}

impl StaticDefaults {
    pub fn new(settings: impl IntoIterator<Item = SettingDescriptor>) -> Self {
        let defaults = Self::default();
        for setting in settings {
            defaults.register(setting);
        }
        defaults
    }

    /// Defaults for the settings users reach for most often.
    pub fn builtin() -> Self {
        Self::new(builtin_settings())
    }

    /// Add or replace a descriptor.
    pub fn register(&self, setting: SettingDescriptor) {
        let mut settings = match self.settings.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        settings.insert(setting.key.clone(), setting);
    }

    /// Change the default value of a registered setting, or register it with window scope.
    pub fn set_default(&self, key: &str, value: Value) {
        let mut settings = match self.settings.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        settings
            .entry(key.to_string())
            .and_modify(|setting| setting.default = value.clone())
            .or_insert_with(|| SettingDescriptor::new(key, value, SettingScope::Window));
    }
}

impl ConfigurationDefaults for StaticDefaults {
    fn settings(&self) -> Vec<SettingDescriptor> {
        match self.settings.read() {
            Ok(settings) => settings.values().cloned().collect(),
            Err(poisoned) => poisoned.into_inner().values().cloned().collect(),
        }
    }
}

fn builtin_settings() -> Vec<SettingDescriptor> {
    vec![
        SettingDescriptor::new("files.autoSave", json!("off"), SettingScope::Resource)
            .with_description("Controls auto save of dirty editors."),
        SettingDescriptor::new("editor.fontSize", json!(14), SettingScope::Window)
            .with_description("Controls the font size in pixels."),
        SettingDescriptor::new(
            "editor.fontFamily",
            json!("Menlo, Monaco, 'Courier New', monospace"),
            SettingScope::Window,
        )
        .with_description("Controls the font family."),
        SettingDescriptor::new("editor.tabSize", json!(4), SettingScope::Resource)
            .with_description("The number of spaces a tab is equal to."),
        SettingDescriptor::new("editor.renderWhitespace", json!("selection"), SettingScope::Resource)
            .with_description("Controls how the editor should render whitespace characters."),
        SettingDescriptor::new("editor.cursorStyle", json!("line"), SettingScope::Window)
            .with_description("Controls the cursor style."),
        SettingDescriptor::new("editor.multiCursorModifier", json!("alt"), SettingScope::Window)
            .with_description("The modifier to be used to add multiple cursors with the mouse."),
        SettingDescriptor::new("editor.insertSpaces", json!(true), SettingScope::Resource)
            .with_description("Insert spaces when pressing Tab."),
        SettingDescriptor::new("editor.wordWrap", json!("off"), SettingScope::Resource)
            .with_description("Controls how lines should wrap."),
        SettingDescriptor::new(
            "files.exclude",
            json!({ "**/.git": true, "**/.DS_Store": true }),
            SettingScope::Resource,
        )
        .with_description("Configure glob patterns for excluding files and folders."),
        SettingDescriptor::new("files.associations", json!({}), SettingScope::Resource)
            .with_description("Configure file associations to languages."),
        SettingDescriptor::new("workbench.editor.enablePreview", json!(true), SettingScope::Window)
            .with_description("Controls whether opened editors show as preview editors."),
        SettingDescriptor::new("window.zoomLevel", json!(0), SettingScope::Application)
            .with_description("Adjust the zoom level of the window."),
        SettingDescriptor::new("terminal.integrated.shell.linux", json!(null), SettingScope::Machine)
            .with_description("The path of the shell that the terminal uses on Linux."),
    ]
}

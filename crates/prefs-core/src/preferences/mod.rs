//! Preferences service: settings resources, default settings and editor models.

pub mod default_settings;
pub mod models;
pub mod open;
pub mod resources;
pub mod service;

pub use default_settings::{DefaultSettings, MOST_COMMONLY_USED_SETTINGS};
pub use models::{
    DefaultSettingsEditorModel, PreferencesEditorModel, SettingsEditorModel, SettingsModelKind,
};
pub use open::{OpenSettingsOptions, OpenedSettings, RevealSetting};
pub use resources::{
    DEFAULT_SETTINGS_AUTHORITY, default_raw_settings_resource, default_settings_resource,
    default_settings_target, is_default_settings_resource,
};
pub use service::{
    Collaborators, EMPTY_KEYBINDINGS_CONTENT, EMPTY_SETTINGS_CONTENT, PreferencesService,
};

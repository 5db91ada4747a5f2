//! Prefs Core Library
//!
//! Resolves where each settings scope lives, synthesises read-only default
//! settings documents and hands out editor models for settings files.

pub mod commands;
pub mod config;
pub mod context;
pub mod defaults;
pub mod environment;
pub mod error;
pub mod files;
pub mod preferences;
pub mod remote;
pub mod text_model;
pub mod types;
pub mod workspace;

/// Re-exports of commonly used types
pub mod prelude {
    // Configuration
    pub use crate::config::{ConfigStore, PrefsConfig};
    pub use crate::context::AppContext;

    // Preferences
    pub use crate::preferences::{
        Collaborators, DefaultSettings, DefaultSettingsEditorModel, OpenSettingsOptions,
        OpenedSettings, PreferencesEditorModel, PreferencesService, SettingsEditorModel,
        default_raw_settings_resource, default_settings_resource, default_settings_target,
    };

    // Collaborators
    pub use crate::commands::CommandService;
    pub use crate::defaults::{ConfigurationDefaults, SettingDescriptor, SettingScope};
    pub use crate::environment::Environment;
    pub use crate::files::FileService;
    pub use crate::remote::RemoteAgent;
    pub use crate::text_model::{ModelService, TextModel, TextModelResolver};
    pub use crate::workspace::WorkspaceContext;

    // Types
    pub use crate::error::{PrefsError, PrefsResult};
    pub use crate::types::{
        ConfigurationChangeEvent, ConfigurationSource, ConfigurationTarget, WorkbenchState,
    };
}

//! Host configuration loaded from prefs.toml
//!
//! The file describes the environment the preferences service runs in:
//! settings locations, open folders, the remote connection and extra defaults.

pub mod parser;
pub mod paths;
pub mod schema;
pub mod store;

pub use parser::{parse_prefs_toml, parse_prefs_toml_str, to_toml};
pub use paths::{CONFIG_FILE_NAME, resource_from_location};
pub use schema::{EditorConfig, EnvironmentConfig, PrefsConfig, RemoteConfig, WorkspaceConfig};
pub use store::ConfigStore;

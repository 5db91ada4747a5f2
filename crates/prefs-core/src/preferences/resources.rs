//! Synthetic `defaultsettings` resources.
//!
//! Default settings documents are not backed by files; they live under a fixed
//! authority and are recognised purely by the shape of their URI.

use url::Url;

use crate::types::ConfigurationTarget;

pub const DEFAULT_SETTINGS_SCHEME: &str = "vscode";
pub const DEFAULT_SETTINGS_AUTHORITY: &str = "defaultsettings";

const USER_FILE: &str = "/settings.json";
const WORKSPACE_FILE: &str = "/workspaceSettings.json";
const FOLDER_FILE: &str = "/resourceSettings.json";
const RAW_FILE: &str = "/defaultSettings.json";

fn synthetic(path: &str) -> Url {
    let mut uri = Url::parse(&format!("{DEFAULT_SETTINGS_SCHEME}://{DEFAULT_SETTINGS_AUTHORITY}"))
        .unwrap_or_else(|_| unreachable!("static default settings URI is valid"));
    uri.set_path(path);
    uri
}

/// Default settings document shown next to the editable settings of `target`.
pub fn default_settings_resource(target: ConfigurationTarget) -> Url {
    match target {
        ConfigurationTarget::Workspace => synthetic(WORKSPACE_FILE),
        ConfigurationTarget::WorkspaceFolder => synthetic(FOLDER_FILE),
        ConfigurationTarget::UserLocal | ConfigurationTarget::UserRemote => synthetic(USER_FILE),
    }
}

/// Raw JSON dump of every default value.
pub fn default_raw_settings_resource() -> Url {
    synthetic(RAW_FILE)
}

/// Target of a default settings URI, or `None` if `uri` is not one.
///
/// The whole authority must be `defaultsettings` (no user info, no port) and
/// the path must end in one of the
/// three document names. A numeric segment such as `/1/settings.json` sits in
/// front of the name and is accepted as part of the suffix match.
pub fn default_settings_target(uri: &Url) -> Option<ConfigurationTarget> {
    if uri.authority() != DEFAULT_SETTINGS_AUTHORITY {
        return None;
    }
    let path = uri.path();
    if path.ends_with(WORKSPACE_FILE) {
        Some(ConfigurationTarget::Workspace)
    } else if path.ends_with(FOLDER_FILE) {
        Some(ConfigurationTarget::WorkspaceFolder)
    } else if path.ends_with(USER_FILE) {
        Some(ConfigurationTarget::UserLocal)
    } else {
        None
    }
}

pub fn is_default_settings_resource(uri: &Url) -> bool {
    default_settings_target(uri).is_some()
}

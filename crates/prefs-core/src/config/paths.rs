//! Config path resolution helpers.

use std::path::{Path, PathBuf};

use url::Url;

pub const CONFIG_FILE_NAME: &str = "prefs.toml";

/// Directory holding the user's editable files.
pub fn user_data_dir(config_dir: &Path) -> PathBuf {
    config_dir.join("prefs").join("User")
}

pub fn default_settings_path(config_dir: &Path) -> PathBuf {
    user_data_dir(config_dir).join("settings.json")
}

pub fn default_keybindings_path(config_dir: &Path) -> PathBuf {
    user_data_dir(config_dir).join("keybindings.json")
}

/// Where prefs.toml is looked for, in priority order.
pub fn config_file_candidates(project_root: &Path, config_dir: &Path) -> Vec<PathBuf> {
    vec![
        project_root.join(CONFIG_FILE_NAME),
        config_dir.join("prefs").join(CONFIG_FILE_NAME),
    ]
}

/// Turn a configured location into a resource URI.
///
/// Handles:
/// - `scheme://...` -> parsed as-is
/// - `~/path` -> under the home directory
/// - `/absolute/path` -> file URI
/// - `./relative` or `relative` -> resolved from `base_dir`
pub fn resource_from_location(location: &str, base_dir: &Path) -> anyhow::Result<Url> {
    if location.contains("://") {
        return Url::parse(location)
            .map_err(|e| anyhow::anyhow!("Invalid URI '{}': {}", location, e));
    }

    let path = if let Some(rest) = location.strip_prefix("~/") {
        dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?
            .join(rest)
    } else if Path::new(location).is_absolute() {
        PathBuf::from(location)
    } else {
        let stripped = location.strip_prefix("./").unwrap_or(location);
        base_dir.join(stripped)
    };

    Url::from_file_path(&path)
        .map_err(|()| anyhow::anyhow!("Not an absolute path: {}", path.display()))
}

pub fn path_to_resource(path: &Path) -> anyhow::Result<Url> {
    Url::from_file_path(path)
        .map_err(|()| anyhow::anyhow!("Not an absolute path: {}", path.display()))
}

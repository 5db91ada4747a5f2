//! Fixed locations supplied by the host environment.

use url::Url;

/// Editable user files owned by the local installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    pub settings_resource: Url,
    pub keybindings_resource: Url,
}

impl Environment {
    pub fn new(settings_resource: Url, keybindings_resource: Url) -> Self {
        Self {
            settings_resource,
            keybindings_resource,
        }
    }
}

//! Workspace context collaborator.
//!
//! Tells the resolver what is open: nothing, a single folder, or a workspace
//! backed by a workspace file with one or more folders.

use serde::Serialize;
use url::Url;

use crate::types::WorkbenchState;

/// Location of a folder's settings file relative to the folder root.
pub const FOLDER_SETTINGS_PATH: &str = ".vscode/settings.json";

/// A root folder of the open workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkspaceFolder {
    pub uri: Url,
    pub name: String,
    pub index: usize,
}

impl WorkspaceFolder {
    pub fn new(uri: Url, index: usize) -> Self {
        let name = uri
            .path_segments()
            .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
            .unwrap_or_else(|| uri.as_str())
            .to_string();
        Self { uri, name, index }
    }

    /// Resolve a `/`-separated path relative to the folder root.
    pub fn to_resource(&self, relative_path: &str) -> Url {
        let mut resource = self.uri.clone();
        let base = self.uri.path().trim_end_matches('/');
        resource.set_path(&format!(
            "{}/{}",
            base,
            relative_path.trim_start_matches('/')
        ));
        resource.set_query(None);
        resource.set_fragment(None);
        resource
    }

    /// Whether `resource` is the folder itself or lies beneath it.
    pub fn contains(&self, resource: &Url) -> bool {
        if resource.scheme() != self.uri.scheme()
            || resource.host_str() != self.uri.host_str()
            || resource.port() != self.uri.port()
        {
            return false;
        }
        let base = self.uri.path().trim_end_matches('/');
        let path = resource.path();
        match path.strip_prefix(base) {
            Some("") => true,
            Some(rest) => rest.starts_with('/'),
            None => false,
        }
    }

    /// Path of `resource` relative to this folder, if it lies beneath it.
    pub fn relative_path(&self, resource: &Url) -> Option<String> {
        if !self.contains(resource) {
            return None;
        }
        let base = self.uri.path().trim_end_matches('/');
        resource
            .path()
            .strip_prefix(base)
            .map(|rest| rest.trim_start_matches('/').to_string())
    }
}

/// Snapshot of the open workspace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Workspace {
    /// Workspace file holding shared settings, when one is open.
    pub configuration: Option<Url>,
    pub folders: Vec<WorkspaceFolder>,
}

impl Workspace {
    /// The innermost folder containing `resource`.
    pub fn folder_containing(&self, resource: &Url) -> Option<&WorkspaceFolder> {
        self.folders
            .iter()
            .filter(|folder| folder.contains(resource))
            .max_by_key(|folder| folder.uri.path().trim_end_matches('/').len())
    }
}

pub trait WorkspaceContext: Send + Sync {
    fn workbench_state(&self) -> WorkbenchState;

    fn workspace(&self) -> Workspace;

    fn workspace_folder(&self, resource: &Url) -> Option<WorkspaceFolder> {
        self.workspace().folder_containing(resource).cloned()
    }
}

/// Fixed workspace supplied by the composition root.
#[derive(Debug, Clone, Default)]
pub struct StaticWorkspace {
    workspace: Workspace,
}

impl StaticWorkspace {
    /// Nothing open.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A single folder without a workspace file.
    pub fn folder(uri: Url) -> Self {
        Self {
            workspace: Workspace {
                configuration: None,
                folders: vec![WorkspaceFolder::new(uri, 0)],
            },
        }
    }

    /// A workspace file with the given folders.
    pub fn workspace(configuration: Url, folders: impl IntoIterator<Item = Url>) -> Self {
        Self {
            workspace: Workspace {
                configuration: Some(configuration),
                folders: folders
                    .into_iter()
                    .enumerate()
                    .map(|(index, uri)| WorkspaceFolder::new(uri, index))
                    .collect(),
            },
        }
    }

    pub fn from_workspace(workspace: Workspace) -> Self {
        Self { workspace }
    }
}

impl WorkspaceContext for StaticWorkspace {
    fn workbench_state(&self) -> WorkbenchState {
        if self.workspace.configuration.is_some() {
            WorkbenchState::Workspace
        } else if self.workspace.folders.is_empty() {
            WorkbenchState::Empty
        } else {
            WorkbenchState::Folder
        }
    }

    fn workspace(&self) -> Workspace {
        self.workspace.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn to_resource_appends_relative_path() {
        let folder = WorkspaceFolder::new(url("file:///work/app"), 0);
        assert_eq!(
            folder.to_resource(FOLDER_SETTINGS_PATH),
            url("file:///work/app/.vscode/settings.json")
        );

        let trailing = WorkspaceFolder::new(url("file:///work/app/"), 0);
        assert_eq!(
            trailing.to_resource(FOLDER_SETTINGS_PATH),
            url("file:///work/app/.vscode/settings.json")
        );
    }

    #[test]
    fn contains_respects_segment_boundaries() {
        let folder = WorkspaceFolder::new(url("file:///work/app"), 0);
        assert!(folder.contains(&url("file:///work/app")));
        assert!(folder.contains(&url("file:///work/app/src/main.rs")));
        assert!(!folder.contains(&url("file:///work/application/main.rs")));
        assert!(!folder.contains(&url("vscode-remote://box/work/app/main.rs")));
    }

    #[test]
    fn nested_folders_pick_innermost() {
        let workspace = Workspace {
            configuration: None,
            folders: vec![
                WorkspaceFolder::new(url("file:///work"), 0),
                WorkspaceFolder::new(url("file:///work/lib"), 1),
            ],
        };
        let folder = workspace
            .folder_containing(&url("file:///work/lib/src/a.rs"))
            .unwrap();
        assert_eq!(folder.index, 1);
    }

    #[test]
    fn folder_name_defaults_to_last_segment() {
        let folder = WorkspaceFolder::new(url("file:///work/app/"), 0);
        assert_eq!(folder.name, "app");
    }

    #[test]
    fn static_workspace_reports_state() {
        assert_eq!(StaticWorkspace::empty().workbench_state(), WorkbenchState::Empty);
        assert_eq!(
            StaticWorkspace::folder(url("file:///work/app")).workbench_state(),
            WorkbenchState::Folder
        );
        assert_eq!(
            StaticWorkspace::workspace(url("file:///work/a.code-workspace"), [])
                .workbench_state(),
            WorkbenchState::Workspace
        );
    }
}

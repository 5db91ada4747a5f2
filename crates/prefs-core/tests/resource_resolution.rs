mod support;

use prefs_core::error::PrefsError;
use prefs_core::types::{ConfigurationTarget, WorkbenchState};
use prefs_core::workspace::{StaticWorkspace, WorkspaceContext};

use support::{Setup, USER_SETTINGS, harness, url};

#[test]
fn user_settings_come_from_the_environment() {
    let h = harness(StaticWorkspace::empty());

    assert_eq!(h.service.user_settings_resource(), url(USER_SETTINGS));
}

#[test]
fn workspace_settings_absent_when_nothing_is_open() {
    let h = harness(StaticWorkspace::empty());

    assert_eq!(h.service.workspace_settings_resource(), None);
}

#[test]
fn workspace_settings_of_a_single_folder() {
    let h = harness(StaticWorkspace::folder(url("file:///work/api")));

    assert_eq!(
        h.service.workspace_settings_resource(),
        Some(url("file:///work/api/.vscode/settings.json"))
    );
}

#[test]
fn workspace_settings_prefer_the_workspace_file() {
    let workspace = StaticWorkspace::workspace(
        url("file:///work/app.code-workspace"),
        [url("file:///work/api"), url("file:///work/web")],
    );
    assert_eq!(workspace.workbench_state(), WorkbenchState::Workspace);
    let h = harness(workspace);

    assert_eq!(
        h.service.workspace_settings_resource(),
        Some(url("file:///work/app.code-workspace"))
    );
}

#[test]
fn workspace_settings_present_iff_not_empty() {
    let workspaces = [
        StaticWorkspace::empty(),
        StaticWorkspace::folder(url("file:///work/api")),
        StaticWorkspace::workspace(url("file:///work/app.code-workspace"), [url("file:///work/api")]),
    ];
    for workspace in workspaces {
        let empty = workspace.workbench_state() == WorkbenchState::Empty;
        let h = harness(workspace);
        assert_eq!(h.service.workspace_settings_resource().is_none(), empty);
    }
}

#[test]
fn folder_settings_of_the_containing_folder() {
    let h = harness(StaticWorkspace::workspace(
        url("file:///work/app.code-workspace"),
        [url("file:///work/api"), url("file:///work/web")],
    ));

    assert_eq!(
        h.service
            .folder_settings_resource(&url("file:///work/web/src/index.ts")),
        Some(url("file:///work/web/.vscode/settings.json"))
    );
}

#[test]
fn folder_settings_absent_outside_every_folder() {
    let h = harness(StaticWorkspace::folder(url("file:///work/api")));

    assert_eq!(
        h.service
            .folder_settings_resource(&url("file:///work/api-old/main.rs")),
        None
    );
    assert_eq!(
        h.service.folder_settings_resource(&url("file:///elsewhere/a.rs")),
        None
    );
}

#[test]
fn folder_settings_use_the_innermost_folder() {
    let h = harness(StaticWorkspace::workspace(
        url("file:///work/app.code-workspace"),
        [url("file:///work"), url("file:///work/nested")],
    ));

    assert_eq!(
        h.service
            .folder_settings_resource(&url("file:///work/nested/a.rs")),
        Some(url("file:///work/nested/.vscode/settings.json"))
    );
}

#[tokio::test]
async fn remote_settings_absent_without_remote() {
    let h = harness(StaticWorkspace::empty());

    assert_eq!(h.service.remote_settings_resource().await, None);
    assert_eq!(h.remote.calls(), 1);
}

#[tokio::test]
async fn remote_settings_query_the_agent_once() {
    let remote = "vscode-remote://ssh-remote+box/home/me/.prefs-server/settings.json";
    let h = Setup::new(StaticWorkspace::empty()).remote(remote).build();

    assert_eq!(h.service.remote_settings_resource().await, Some(url(remote)));
    assert_eq!(h.remote.calls(), 1);
}

#[tokio::test]
async fn editable_settings_dispatch_by_target() {
    let remote = "vscode-remote://ssh-remote+box/home/me/settings.json";
    let h = Setup::new(StaticWorkspace::folder(url("file:///work/api")))
        .remote(remote)
        .build();
    let file = url("file:///work/api/src/lib.rs");

    let expected = [
        (ConfigurationTarget::UserLocal, url(USER_SETTINGS)),
        (ConfigurationTarget::UserRemote, url(remote)),
        (
            ConfigurationTarget::Workspace,
            url("file:///work/api/.vscode/settings.json"),
        ),
        (
            ConfigurationTarget::WorkspaceFolder,
            url("file:///work/api/.vscode/settings.json"),
        ),
    ];
    for (target, uri) in expected {
        let resolved = h
            .service
            .editable_settings_resource(target, Some(&file))
            .await
            .unwrap();
        assert_eq!(resolved, Some(uri), "target {}", target);
    }
}

#[tokio::test]
async fn folder_target_requires_a_resource() {
    let h = harness(StaticWorkspace::folder(url("file:///work/api")));

    let err = h
        .service
        .editable_settings_resource(ConfigurationTarget::WorkspaceFolder, None)
        .await
        .unwrap_err();

    assert!(matches!(err, PrefsError::InvalidArgument(_)));
}

#[tokio::test]
async fn folder_target_outside_folders_is_absent() {
    let h = harness(StaticWorkspace::folder(url("file:///work/api")));

    let uri = h
        .service
        .editable_settings_resource(
            ConfigurationTarget::WorkspaceFolder,
            Some(&url("file:///tmp/scratch.rs")),
        )
        .await
        .unwrap();

    assert_eq!(uri, None);
}

#[test]
fn resource_label_is_folder_relative() {
    let single = harness(StaticWorkspace::folder(url("file:///work/api")));
    assert_eq!(
        single
            .service
            .resource_label(&url("file:///work/api/.vscode/settings.json")),
        ".vscode/settings.json"
    );

    let multi = harness(StaticWorkspace::workspace(
        url("file:///work/app.code-workspace"),
        [url("file:///work/api"), url("file:///work/web")],
    ));
    assert_eq!(
        multi
            .service
            .resource_label(&url("file:///work/web/.vscode/settings.json")),
        "web/.vscode/settings.json"
    );
    assert_eq!(
        multi
            .service
            .resource_label(&url("file:///home/me/settings.json")),
        "/home/me/settings.json"
    );
}

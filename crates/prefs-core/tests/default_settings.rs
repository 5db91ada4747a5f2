mod support;

use std::sync::Arc;

use serde_json::json;

use prefs_core::error::PrefsError;
use prefs_core::preferences::{
    default_raw_settings_resource, default_settings_resource, default_settings_target,
};
use prefs_core::text_model::ModelService;
use prefs_core::types::{ConfigurationChangeEvent, ConfigurationSource, ConfigurationTarget};
use prefs_core::workspace::StaticWorkspace;

use support::{harness, url};

#[test]
fn classifies_default_settings_uris() {
    let cases = [
        ("vscode://defaultsettings/settings.json", Some(ConfigurationTarget::UserLocal)),
        (
            "vscode://defaultsettings/workspaceSettings.json",
            Some(ConfigurationTarget::Workspace),
        ),
        (
            "vscode://defaultsettings/resourceSettings.json",
            Some(ConfigurationTarget::WorkspaceFolder),
        ),
        (
            "vscode://defaultsettings/2/settings.json",
            Some(ConfigurationTarget::UserLocal),
        ),
        (
            "vscode://defaultsettings/1/workspaceSettings.json",
            Some(ConfigurationTarget::Workspace),
        ),
        (
            "vscode://defaultsettings/0/resourceSettings.json",
            Some(ConfigurationTarget::WorkspaceFolder),
        ),
        ("vscode://user@defaultsettings/settings.json", None),
        ("vscode://defaultsettings:8080/workspaceSettings.json", None),
        ("vscode://defaultsettings/keybindings.json", None),
        ("vscode://defaultsettings/defaultSettings.json", None),
        ("vscode://elsewhere/settings.json", None),
        ("file:///home/me/settings.json", None),
    ];

    for (uri, expected) in cases {
        assert_eq!(default_settings_target(&url(uri)), expected, "{}", uri);
    }
}

#[test]
fn default_settings_resources_classify_back_to_their_target() {
    for target in [
        ConfigurationTarget::UserLocal,
        ConfigurationTarget::Workspace,
        ConfigurationTarget::WorkspaceFolder,
    ] {
        assert_eq!(
            default_settings_target(&default_settings_resource(target)),
            Some(target)
        );
    }
    assert_eq!(
        default_settings_resource(ConfigurationTarget::UserRemote),
        default_settings_resource(ConfigurationTarget::UserLocal)
    );
}

#[test]
fn default_settings_are_memoized_per_target() {
    let h = harness(StaticWorkspace::empty());

    let first = h.service.default_settings(ConfigurationTarget::Workspace);
    let second = h.service.default_settings(ConfigurationTarget::Workspace);
    let user = h.service.default_settings(ConfigurationTarget::UserLocal);

    assert!(Arc::ptr_eq(&first, &second));
    assert!(!Arc::ptr_eq(&first, &user));
    assert_eq!(first.target(), ConfigurationTarget::Workspace);
}

#[test]
fn default_settings_filter_by_target_scope() {
    let h = harness(StaticWorkspace::empty());

    let user = h.service.default_settings(ConfigurationTarget::UserLocal);
    let folder = h
        .service
        .default_settings(ConfigurationTarget::WorkspaceFolder);

    assert!(user.content().contains("\"window.zoomLevel\""));
    assert!(!folder.content().contains("\"window.zoomLevel\""));
    assert!(!folder.content().contains("\"editor.fontSize\""));
    assert!(folder.content().contains("\"editor.tabSize\""));
}

#[test]
fn default_change_keeps_identity_and_updates_content() {
    let h = harness(StaticWorkspace::empty());
    let before = h.service.default_settings(ConfigurationTarget::UserLocal);
    let mut changes = before.subscribe();

    h.defaults.set_default("editor.tabSize", json!(2));
    h.service.handle_configuration_change(
        &ConfigurationChangeEvent::new(ConfigurationSource::Default).with_keys(["editor.tabSize"]),
    );

    let after = h.service.default_settings(ConfigurationTarget::UserLocal);
    assert!(Arc::ptr_eq(&before, &after));
    assert!(changes.has_changed().unwrap());
    assert_eq!(*changes.borrow_and_update(), 1);
    assert!(after.raw_content().contains("\"editor.tabSize\": 2"));
}

#[test]
fn non_default_changes_are_ignored() {
    let h = harness(StaticWorkspace::empty());
    let settings = h.service.default_settings(ConfigurationTarget::UserLocal);

    for source in [
        ConfigurationSource::UserLocal,
        ConfigurationSource::UserRemote,
        ConfigurationSource::Workspace,
        ConfigurationSource::WorkspaceFolder,
        ConfigurationSource::Memory,
    ] {
        h.service
            .handle_configuration_change(&ConfigurationChangeEvent::new(source));
    }

    assert_eq!(settings.revision(), 0);
}

#[test]
fn every_cached_model_is_notified() {
    let h = harness(StaticWorkspace::empty());
    let user = h.service.default_settings(ConfigurationTarget::UserLocal);
    let folder = h
        .service
        .default_settings(ConfigurationTarget::WorkspaceFolder);

    h.service
        .handle_configuration_change(&ConfigurationChangeEvent::new(ConfigurationSource::Default));

    assert_eq!(user.revision(), 1);
    assert_eq!(folder.revision(), 1);
}

#[test]
fn resolve_model_materialises_default_documents() {
    let h = harness(StaticWorkspace::empty());
    let uri = default_settings_resource(ConfigurationTarget::Workspace);

    let model = h.service.resolve_model(&uri).unwrap();

    assert_eq!(
        model.content(),
        h.service
            .default_settings(ConfigurationTarget::Workspace)
            .content_without_most_commonly_used()
    );
    assert!(Arc::ptr_eq(&model, &h.store.get_model(&uri).unwrap()));
}

#[test]
fn resolve_model_ignores_other_uris() {
    let h = harness(StaticWorkspace::empty());

    assert!(
        h.service
            .resolve_model(&url("file:///home/me/settings.json"))
            .is_none()
    );
    assert!(
        h.service
            .resolve_model(&url("vscode://defaultsettings/keybindings.json"))
            .is_none()
    );
    assert!(h.store.is_empty());
}

#[test]
fn live_models_follow_default_changes() {
    let h = harness(StaticWorkspace::empty());
    let uri = default_settings_resource(ConfigurationTarget::UserLocal);
    let model = h.service.resolve_model(&uri).unwrap();
    let raw = h.service.raw_default_settings_model();
    let version = model.version();

    h.defaults.set_default("editor.wordWrap", json!("on"));
    h.service
        .handle_configuration_change(&ConfigurationChangeEvent::new(ConfigurationSource::Default));

    assert!(model.version() > version);
    assert!(model.content().contains("\"editor.wordWrap\": \"on\""));
    assert!(raw.content().contains("\"editor.wordWrap\": \"on\""));
}

#[test]
fn raw_default_settings_model_is_reused() {
    let h = harness(StaticWorkspace::empty());

    let first = h.service.raw_default_settings_model();
    let second = h.service.raw_default_settings_model();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.uri(), &default_raw_settings_resource());
    let raw: serde_json::Value = serde_json::from_str(&first.content()).unwrap();
    assert_eq!(raw["editor.tabSize"], json!(4));
}

#[tokio::test]
async fn default_settings_model_wraps_the_cached_defaults() {
    let h = harness(StaticWorkspace::empty());
    let uri = default_settings_resource(ConfigurationTarget::WorkspaceFolder);

    let model = h.service.create_default_settings_model(&uri).await.unwrap();

    assert_eq!(model.target(), ConfigurationTarget::WorkspaceFolder);
    assert_eq!(model.uri(), &uri);
    assert!(Arc::ptr_eq(
        model.default_settings(),
        &h.service
            .default_settings(ConfigurationTarget::WorkspaceFolder)
    ));
    assert_eq!(
        model.content(),
        model.default_settings().content_without_most_commonly_used()
    );
    assert_eq!(h.store.reference_count(&uri), 1);

    drop(model);
    assert_eq!(h.store.reference_count(&uri), 0);
    assert!(h.store.get_model(&uri).is_some());
}

#[tokio::test]
async fn default_settings_model_rejects_other_uris() {
    let h = harness(StaticWorkspace::empty());

    let err = h
        .service
        .create_default_settings_model(&url("file:///home/me/settings.json"))
        .await
        .unwrap_err();

    assert!(matches!(err, PrefsError::InvalidArgument(_)));
}

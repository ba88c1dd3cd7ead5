//! Configuration Integration Tests
//!
//! Settings precedence, validation and persistence through `AppState`.

use behave_explorer::models::settings::SettingsUpdate;
use behave_explorer::state::AppState;
use behave_explorer::storage::ConfigService;
use behave_explorer::utils::paths::{workspace_config_path, WORKSPACE_CONFIG_FILE};
use behave_explorer::AppError;

use crate::common::Workspace;

#[tokio::test]
async fn test_workspace_file_is_loaded() {
    let ws = Workspace::new();
    std::fs::write(
        ws.root().join(WORKSPACE_CONFIG_FILE),
        r#"{"discoverSteps": true, "allowedFiles": "features/*.feature", "debugPort": 6000}"#,
    )
    .unwrap();

    let state = AppState::new(ws.root()).unwrap();
    let settings = state.get_settings().await;

    assert!(settings.discover_steps);
    assert_eq!(settings.allowed_files, "features/*.feature");
    assert_eq!(settings.debug_port, 6000);
    // Unset fields keep their defaults
    assert!(settings.code_lens);
    assert_eq!(settings.python, "python3");
    assert!(state.explorer().settings().discover_steps);
}

#[test]
fn test_invalid_diff_pattern_is_rejected() {
    let ws = Workspace::new();
    let path = workspace_config_path(ws.root());
    std::fs::write(&path, r#"{"diffRegex": ["Expected: (\\d+"]}"#).unwrap();

    let err = ConfigService::from_path(path).unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[test]
fn test_malformed_file_is_config_error() {
    let ws = Workspace::new();
    let path = workspace_config_path(ws.root());
    std::fs::write(&path, "{ not json").unwrap();

    let err = ConfigService::from_path(path).unwrap_err();
    assert!(matches!(err, AppError::Config(_)));
}

#[tokio::test]
async fn test_update_settings_persists() {
    let ws = Workspace::new();
    std::fs::write(ws.root().join(WORKSPACE_CONFIG_FILE), "{}").unwrap();
    let state = AppState::new(ws.root()).unwrap();

    let updated = state
        .update_settings(SettingsUpdate {
            code_lens: Some(false),
            arguments: Some(vec!["--tags=@wip".to_string()]),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(!updated.code_lens);

    let reloaded = ConfigService::from_path(workspace_config_path(ws.root())).unwrap();
    assert!(!reloaded.get_settings().code_lens);
    assert_eq!(reloaded.get_settings().arguments, vec!["--tags=@wip"]);

    let err = state
        .update_settings(SettingsUpdate {
            debug_port: Some(0),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(state.get_settings().await.debug_port, 5678);
}

//! Explorer Integration Tests
//!
//! Discovery and the item collection:
//! - Discovery loads each allowed file once
//! - Reconciling the same results twice changes nothing
//! - Unloading a file drops its items
//! - Outline groups and step definitions

use std::path::Path;
use std::sync::Arc;

use behave_explorer::commands::{discover, find_definition, outline_groups};
use behave_explorer::models::settings::Settings;
use behave_explorer::models::test_item::ItemKind;
use behave_explorer::services::explorer::LoadOutcome;

use crate::common::{report, FakeLauncher, Workspace, FEATURE};

#[tokio::test]
async fn test_discover_builds_item_tree() {
    let ws = Workspace::new();
    std::fs::write(ws.root().join("features/README.md"), "not a feature").unwrap();
    let runner = Arc::new(FakeLauncher::new(report("a calculator", "passed")));
    let state = ws.state(runner.clone(), Settings::default());

    let summary = discover(&state).await.unwrap();
    assert_eq!(summary.matched, 1);
    assert_eq!(summary.loaded, 1);
    assert!(summary.failed.is_empty());
    assert_eq!(summary.items, 4);

    let items = state.explorer().items().await;
    let roots: Vec<_> = items.roots().map(|item| item.id.clone()).collect();
    assert_eq!(roots, vec!["features/calc.feature"]);

    let feature = items.get("features/calc.feature").unwrap();
    assert_eq!(feature.kind, ItemKind::Container);
    assert!(feature.has_tag("math"));
    assert!(feature.has_tag("Feature"));
    assert_eq!(
        feature.children,
        vec![
            "features/calc.feature:3",
            "features/calc.feature:12",
            "features/calc.feature:13"
        ]
    );
    assert!(items.get("features/calc.feature:12").unwrap().has_tag("Scenario Outline"));

    // Steps are not items unless discoverSteps is set
    assert!(!items.contains("features/calc.feature:4"));

    let again = discover(&state).await.unwrap();
    assert_eq!(again.skipped, 1);
    assert_eq!(runner.calls(), 1);
}

#[tokio::test]
async fn test_reload_is_idempotent() {
    let ws = Workspace::new();
    let runner = Arc::new(FakeLauncher::new(report("a calculator", "passed")));
    let state = ws.state(runner.clone(), Settings::default());
    let explorer = state.explorer();

    let first = explorer.reload_file(&ws.feature()).await.unwrap();
    assert_eq!(first.roots, vec!["features/calc.feature"]);
    assert_eq!(first.changed, 4);

    let before = explorer.items().await;
    let second = explorer.reload_file(&ws.feature()).await.unwrap();
    assert_eq!(second.changed, 0);
    assert_eq!(explorer.items().await, before);
    assert_eq!(runner.calls(), 2);
}

#[tokio::test]
async fn test_failed_load_can_retry() {
    let ws = Workspace::new();
    let runner = Arc::new(FakeLauncher::new("not json".to_string()));
    let state = ws.state(runner.clone(), Settings::default());
    let explorer = state.explorer();

    assert!(explorer.load_file(&ws.feature()).await.is_err());
    assert!(!explorer.is_loaded(&ws.feature()).await);

    runner.set_report(report("a calculator", "passed"));
    let outcome = explorer.load_file(&ws.feature()).await.unwrap();
    assert!(matches!(outcome, LoadOutcome::Loaded(_)));
    assert!(matches!(explorer.load_file(&ws.feature()).await.unwrap(), LoadOutcome::Skipped));
}

#[tokio::test]
async fn test_unload_removes_items_under_path() {
    let ws = Workspace::new();
    let runner = Arc::new(FakeLauncher::new(report("a calculator", "passed")));
    let state = ws.state(runner, Settings::default());
    let explorer = state.explorer();

    discover(&state).await.unwrap();
    let removed = explorer.unload_file(&ws.root().join("features")).await;

    assert_eq!(removed, 4);
    assert!(explorer.items().await.is_empty());
    assert!(!explorer.is_loaded(&ws.feature()).await);
}

#[tokio::test]
async fn test_outline_groups_and_definitions() {
    let ws = Workspace::new();
    let runner = Arc::new(FakeLauncher::new(report("a calculator", "passed")));
    let state = ws.state(runner.clone(), Settings::default());

    let groups = outline_groups(&state, Path::new(FEATURE)).await.unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].line, 9);
    assert_eq!(groups[0].include, vec!["features/calc.feature:12", "features/calc.feature:13"]);

    let definition = find_definition(&state, Path::new(FEATURE), 4).await.unwrap().unwrap();
    assert_eq!(definition.path, ws.root().join("features/steps/calc.py"));
    assert_eq!(definition.line, 11);

    assert!(find_definition(&state, Path::new(FEATURE), 3).await.unwrap().is_none());
    // Everything after the first analysis came from the cache or the memo
    assert_eq!(runner.calls(), 1);
}

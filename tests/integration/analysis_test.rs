//! Analysis Integration Tests
//!
//! Dry-run analysis through the result cache:
//! - Fresh cached results are served without running the runner
//! - Editing the feature file makes the cached result stale
//! - Failed dry runs surface the runner output and leave nothing cached

use std::sync::Arc;
use std::time::{Duration, SystemTime};

use behave_explorer::commands::{analyze_file, clear_cache};
use behave_explorer::models::settings::Settings;
use behave_explorer::models::test_item::ItemKind;
use behave_explorer::AppError;
use behave_explorer_core::CoreError;
use behave_explorer_runner::CacheLookup;

use crate::common::{report, FakeLauncher, Workspace, FEATURE};

fn touch_later(path: &std::path::Path) {
    let file = std::fs::File::options().write(true).open(path).unwrap();
    file.set_modified(SystemTime::now() + Duration::from_secs(120)).unwrap();
}

#[tokio::test]
async fn test_fresh_result_is_reused() {
    let ws = Workspace::new();
    let runner = Arc::new(FakeLauncher::new(report("a calculator", "passed")));
    let state = ws.state(runner.clone(), Settings::default());

    let first = analyze_file(&state, FEATURE.as_ref(), false).await.unwrap();
    let second = analyze_file(&state, FEATURE.as_ref(), false).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(runner.calls(), 1);

    let args = runner.last_args();
    assert!(args.contains(&"--dry-run".to_string()));
    assert!(args.contains(&"--format".to_string()));
    assert_eq!(args.last().unwrap(), &ws.feature().to_string_lossy());
}

#[tokio::test]
async fn test_edited_feature_is_reanalyzed() {
    let ws = Workspace::new();
    let runner = Arc::new(FakeLauncher::new(report("a calculator", "passed")));
    let settings = Settings {
        discover_steps: true,
        ..Default::default()
    };
    let state = ws.state(runner.clone(), settings);

    let items = analyze_file(&state, FEATURE.as_ref(), false).await.unwrap();
    let step = items.iter().find(|i| i.id == "features/calc.feature:4").unwrap();
    assert_eq!(step.kind, ItemKind::Step);
    assert_eq!(step.label, "a calculator");
    assert_eq!(step.parent.as_deref(), Some("features/calc.feature:3"));

    runner.set_report(report("a scientific calculator", "passed"));
    touch_later(&ws.feature());

    let items = analyze_file(&state, FEATURE.as_ref(), false).await.unwrap();
    let step = items.iter().find(|i| i.id == "features/calc.feature:4").unwrap();
    assert_eq!(step.label, "a scientific calculator");
    assert_eq!(runner.calls(), 2);
}

#[tokio::test]
async fn test_failed_dry_run_is_not_cached() {
    let ws = Workspace::new();
    let runner = Arc::new(FakeLauncher::failing(1));
    let state = ws.state(runner.clone(), Settings::default());

    let err = analyze_file(&state, FEATURE.as_ref(), false).await.unwrap_err();
    match err {
        AppError::Core(CoreError::RunnerFailed { status, stderr, .. }) => {
            assert_eq!(status, Some(1));
            assert!(stderr.contains("No steps directory"));
        }
        other => panic!("unexpected error: {other}"),
    }

    let lookup = ws.cache().lookup(&ws.feature(), ws.root()).await.unwrap();
    assert!(matches!(lookup, CacheLookup::Stale(_)));
    assert!(!lookup.path().exists());

    // A later attempt runs again instead of serving a broken result
    analyze_file(&state, FEATURE.as_ref(), false).await.unwrap_err();
    assert_eq!(runner.calls(), 2);
}

#[tokio::test]
async fn test_cache_is_partitioned_by_workspace() {
    let first = Workspace::new();
    let second = Workspace::new();
    let cache = first.cache();

    let a = cache.entry_for(FEATURE, first.root()).await.unwrap();
    let b = cache.entry_for(FEATURE, second.root()).await.unwrap();

    assert_ne!(a.parent(), b.parent());
    assert_eq!(a.file_name(), b.file_name());
}

#[tokio::test]
async fn test_clear_cache_removes_results() {
    let ws = Workspace::new();
    let runner = Arc::new(FakeLauncher::new(report("a calculator", "passed")));
    let state = ws.state(runner.clone(), Settings::default());

    analyze_file(&state, FEATURE.as_ref(), false).await.unwrap();
    assert!(ws.root().join(".results").exists());

    clear_cache(&state).await.unwrap();
    assert!(!ws.root().join(".results").exists());
    // Clearing twice is fine
    clear_cache(&state).await.unwrap();

    analyze_file(&state, FEATURE.as_ref(), false).await.unwrap();
    assert_eq!(runner.calls(), 2);
}

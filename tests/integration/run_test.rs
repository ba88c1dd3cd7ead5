//! Run Integration Tests
//!
//! Live runs through the session manager:
//! - Outcomes projected onto discovered items, with expected/actual extraction
//! - Requested step ids run through their scenario
//! - Cancellation aborts the session
//! - Debug sessions and debugger refusal

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use behave_explorer::commands::run_tests;
use behave_explorer::models::run_report::Outcome;
use behave_explorer::models::settings::Settings;
use behave_explorer::services::explorer::RunRequest;
use behave_explorer::AppError;
use behave_explorer_core::CoreError;
use behave_explorer_runner::LaunchMode;

use crate::common::{report, FakeDebugger, FakeLauncher, Workspace};

#[tokio::test]
async fn test_run_projects_outcomes() {
    let ws = Workspace::new();
    let runner = Arc::new(FakeLauncher::new(report("a calculator", "failed")));
    let settings = Settings {
        diff_regex: vec![r"Expected: (\d+) but: was (\d+)".to_string()],
        ..Default::default()
    };
    let state = ws.state(runner.clone(), settings);

    let report = run_tests(&state, RunRequest::default(), CancellationToken::new())
        .await
        .unwrap();

    assert!(!report.aborted);
    assert!(!report.success());
    assert_eq!(report.counts.failed, 2);
    assert_eq!(report.counts.passed, 1);
    assert_eq!(report.counts.skipped, 1);

    match report.outcome("features/calc.feature:3").unwrap() {
        Outcome::Failed { messages, .. } => {
            assert_eq!(messages.len(), 1);
            assert_eq!(messages[0].message, "Expected: 5 but: was 6");
            assert_eq!(messages[0].expected.as_deref(), Some("5"));
            assert_eq!(messages[0].actual.as_deref(), Some("6"));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(
        report.outcome("features/calc.feature:13").unwrap(),
        &Outcome::Skipped
    );

    // The full error text is appended to the failing scenario's output
    let output = &report.output["features/calc.feature:3"];
    assert_eq!(output[0], "Traceback\nExpected: 5 but: was 6");

    let args = runner.last_args();
    assert!(!args.contains(&"--dry-run".to_string()));
    assert!(args.contains(&"--outfile".to_string()));
}

#[tokio::test]
async fn test_step_ids_run_through_scenario() {
    let ws = Workspace::new();
    let runner = Arc::new(FakeLauncher::new(report("a calculator", "passed")));
    let settings = Settings {
        discover_steps: true,
        ..Default::default()
    };
    let state = ws.state(runner.clone(), settings);

    let request = RunRequest {
        include: vec![
            "features/calc.feature:4".to_string(),
            "features/calc.feature:5".to_string(),
        ],
        exclude: vec!["features/calc.feature:12".to_string()],
        mode: LaunchMode::Run,
    };
    let report = run_tests(&state, request, CancellationToken::new()).await.unwrap();
    assert!(report.success());

    let args = runner.last_args();
    assert_eq!(args.last().unwrap(), "features/calc.feature:3");
    assert_eq!(args.iter().filter(|a| *a == "features/calc.feature:3").count(), 1);
    let exclude = args.iter().position(|a| a == "-e").unwrap();
    assert_eq!(args[exclude + 1], r"features/calc\.feature:12");

    // Steps get their own outcomes when they are items
    assert!(matches!(
        report.outcome("features/calc.feature:4"),
        Some(Outcome::Passed { .. })
    ));
}

#[tokio::test]
async fn test_cancelled_run_reports_aborted() {
    let ws = Workspace::new();
    let runner = Arc::new(FakeLauncher::hanging(report("a calculator", "passed")));
    let state = ws.state(runner, Settings::default());

    let token = CancellationToken::new();
    let cancel = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        cancel.cancel();
    });

    let report = tokio::time::timeout(
        Duration::from_secs(5),
        run_tests(&state, RunRequest::default(), token),
    )
    .await
    .expect("run did not stop after cancellation")
    .unwrap();

    assert!(report.aborted);
    assert!(!report.success());
    // Results written before the abort are still projected
    assert!(report.outcome("features/calc.feature:3").is_some());
}

#[tokio::test]
async fn test_debug_run_uses_debugger() {
    let ws = Workspace::new();
    let runner = Arc::new(FakeLauncher::new(report("a calculator", "passed")));
    let debugger = Arc::new(FakeDebugger::new(report("a calculator", "passed")));
    let state = ws.state_with_debugger(runner.clone(), debugger.clone());

    let request = RunRequest {
        mode: LaunchMode::Debug,
        ..Default::default()
    };
    let report = run_tests(&state, request, CancellationToken::new()).await.unwrap();
    assert!(report.success());

    let configs = debugger.configs();
    assert_eq!(configs.len(), 1);
    assert_eq!(configs[0].module, "behave");
    assert_eq!(configs[0].kind, "python");
    assert_eq!(configs[0].request, "launch");
    assert_eq!(configs[0].cwd, ws.root());
    assert!(!configs[0].args.contains(&"-m".to_string()));

    // Only the discovery dry run went through the process launcher
    assert_eq!(runner.calls(), 1);
}

#[tokio::test]
async fn test_refused_debug_session_fails_to_start() {
    let ws = Workspace::new();
    let runner = Arc::new(FakeLauncher::new(report("a calculator", "passed")));
    let debugger = Arc::new(FakeDebugger::refusing());
    let state = ws.state_with_debugger(runner, debugger);

    let request = RunRequest {
        mode: LaunchMode::Debug,
        ..Default::default()
    };
    let err = run_tests(&state, request, CancellationToken::new()).await.unwrap_err();
    assert!(matches!(err, AppError::Core(CoreError::FailedToStart(_))));
}

//! behave-explorer CLI host

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

use behave_explorer::cli::{self, Cli, Commands};
use behave_explorer::commands;
use behave_explorer::models::response::CommandResponse;
use behave_explorer::services::explorer::RunRequest;
use behave_explorer::state::AppState;
use behave_explorer::utils::error::AppResult;
use behave_explorer::utils::logging::init_logging;
use behave_explorer::utils::paths::resolve_workspace;
use behave_explorer_runner::LaunchMode;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let workspace = resolve_workspace(cli.workspace.as_deref()).context("Failed to resolve workspace")?;
    let state = AppState::new(&workspace)
        .with_context(|| format!("Failed to load settings for {}", workspace.display()))?;

    let settings = state.get_settings().await;
    if settings.auto_discover && !matches!(cli.command, Commands::Discover | Commands::ClearCache) {
        debug!("Auto-discovering {}", workspace.display());
        if let Err(e) = commands::discover(&state).await {
            error!("Auto-discovery failed: {}", e);
        }
    }

    let json = cli.json;
    let code = match cli.command {
        Commands::Discover => emit(json, commands::discover(&state).await, cli::render_discovery),
        Commands::Analyze { file, skip_cache } => emit(
            json,
            commands::analyze_file(&state, &file, skip_cache).await,
            |items| cli::render_items(items),
        ),
        Commands::Run { include, exclude, debug } => {
            let token = CancellationToken::new();
            let on_interrupt = token.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    on_interrupt.cancel();
                }
            });

            let request = RunRequest {
                include,
                exclude,
                mode: if debug { LaunchMode::Debug } else { LaunchMode::Run },
            };
            let result = commands::run_tests(&state, request, token).await;
            let passed = matches!(&result, Ok(report) if report.success());

            let code = emit(json, result, cli::render_run);
            if passed {
                code
            } else {
                ExitCode::FAILURE
            }
        }
        Commands::Definition { file, line } => emit(
            json,
            commands::find_definition(&state, &file, line).await,
            |found| cli::render_definition(found.as_ref()),
        ),
        Commands::Outlines { file } => emit(
            json,
            commands::outline_groups(&state, &file).await,
            |groups| cli::render_outlines(groups),
        ),
        Commands::ClearCache => emit(json, commands::clear_cache(&state).await, |_| "Cache cleared".to_string()),
    };

    Ok(code)
}

/// Print a command result and map it to an exit code.
fn emit<T: Serialize>(json: bool, result: AppResult<T>, render: impl Fn(&T) -> String) -> ExitCode {
    let failed = result.is_err();

    if json {
        let response = CommandResponse::from(result);
        match serde_json::to_string_pretty(&response) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                error!("Failed to serialize response: {}", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        match &result {
            Ok(data) => println!("{}", render(data)),
            Err(e) => error!("{}", e),
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

//! Runner Command Builder
//!
//! Builds the argument vector for the external runner. The same builder serves
//! dry-run analysis, live runs and debug sessions.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Runner settings shared by analysis and live sessions.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Interpreter used to launch `-m behave`
    pub python: String,
    /// Extra arguments for live runs (never used for dry runs)
    pub arguments: Vec<String>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            python: "python3".to_string(),
            arguments: Vec::new(),
        }
    }
}

/// Options for a single invocation
#[derive(Debug, Clone, Default)]
pub struct CommandOptions {
    /// Write a JSON report to this path
    pub output: Option<PathBuf>,
    /// Locations to run (passed positionally)
    pub include: Vec<String>,
    /// Locations to exclude (passed as escaped `-e` patterns)
    pub exclude: Vec<String>,
    /// Discovery only, no step bodies are executed
    pub dry: bool,
    /// Let the runner capture stdout/stderr
    pub capture: bool,
    /// Omit `-m behave` (the debugger launches the module itself)
    pub skip_python: bool,
}

/// A fully resolved runner invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub executable: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
}

impl Invocation {
    /// Report path passed via `--outfile`, if any.
    pub fn output_path(&self) -> Option<PathBuf> {
        self.args
            .iter()
            .position(|arg| arg == "--outfile")
            .and_then(|i| self.args.get(i + 1))
            .map(PathBuf::from)
    }

    /// Command line for logging.
    pub fn display(&self) -> String {
        std::iter::once(self.executable.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Build the runner invocation for a workspace.
pub fn build_command(config: &RunnerConfig, workspace: &Path, options: &CommandOptions) -> Invocation {
    let mut args: Vec<String> = Vec::new();

    if !options.skip_python {
        args.extend(["-m".to_string(), "behave".to_string()]);
    }

    if !options.capture {
        args.push("--no-capture".to_string());
    }

    if let Some(ref output) = options.output {
        args.push("--outfile".to_string());
        args.push(output.to_string_lossy().into_owned());
        args.extend(["--format".to_string(), "json".to_string()]);
    }

    if options.dry {
        args.extend(
            ["--dry-run", "--show-timings", "--show-source", "--no-junit", "--no-summary"]
                .iter()
                .map(|s| s.to_string()),
        );
    } else {
        args.extend(config.arguments.iter().cloned());
    }

    for id in &options.exclude {
        args.push("-e".to_string());
        args.push(regex::escape(id));
    }

    args.extend(options.include.iter().cloned());

    let invocation = Invocation {
        executable: config.python.clone(),
        args,
        cwd: workspace.to_path_buf(),
    };

    tracing::trace!("Command is: {}", invocation.display());
    invocation
}

/// Launch request handed to a debugging host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugConfiguration {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub request: String,
    pub module: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
}

impl DebugConfiguration {
    /// Configuration launching the runner module with the given arguments.
    pub fn behave(args: Vec<String>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            name: "Behave".to_string(),
            kind: "python".to_string(),
            request: "launch".to_string(),
            module: "behave".to_string(),
            args,
            cwd: cwd.into(),
        }
    }
}

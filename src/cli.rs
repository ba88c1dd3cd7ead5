//! CLI definitions and output rendering.

use std::fmt::Write as _;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::models::response::{DefinitionLocation, DiscoverySummary, OutlineGroup};
use crate::models::run_report::{Outcome, RunReport};
use crate::models::test_item::TestItem;

/// Test explorer for behave feature files
#[derive(Parser, Debug)]
#[command(name = "behave-explorer", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root (defaults to the current directory)
    #[arg(long, global = true)]
    pub workspace: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (no logging except errors)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Discover every allowed feature file
    Discover,

    /// Analyze one feature file and list its items
    Analyze {
        /// Feature file, relative to the workspace
        file: PathBuf,

        /// Re-run the dry run even when the cached result is fresh
        #[arg(long)]
        skip_cache: bool,
    },

    /// Run tests
    Run {
        /// Item ids to run (all when omitted)
        #[arg(long = "include", value_name = "ID")]
        include: Vec<String>,

        /// Item ids to leave out
        #[arg(long = "exclude", value_name = "ID")]
        exclude: Vec<String>,

        /// Launch under debugpy
        #[arg(long)]
        debug: bool,
    },

    /// Find the definition of the step on a line
    Definition {
        file: PathBuf,

        /// One-based line of the step
        line: u32,
    },

    /// List launchable outline groups of a feature file
    Outlines { file: PathBuf },

    /// Remove cached results
    ClearCache,
}

// ============================================================================
// Human-readable rendering
// ============================================================================

pub fn render_discovery(summary: &DiscoverySummary) -> String {
    let mut out = format!(
        "{} file(s) matched, {} loaded, {} already loaded, {} item(s)",
        summary.matched, summary.loaded, summary.skipped, summary.items
    );
    for file in &summary.failed {
        let _ = write!(out, "\nfailed: {}", file.display());
    }
    out
}

/// Items indented by depth (items arrive parents first)
pub fn render_items(items: &[TestItem]) -> String {
    let mut out = String::new();
    for item in items {
        let depth = ancestors(items, item);
        let _ = writeln!(out, "{}{}  {}", "  ".repeat(depth), item.label, item.id);
    }
    out.trim_end().to_string()
}

fn ancestors(items: &[TestItem], item: &TestItem) -> usize {
    let mut depth = 0;
    let mut parent = item.parent.as_deref();
    while let Some(id) = parent {
        depth += 1;
        parent = items.iter().find(|i| i.id == id).and_then(|i| i.parent.as_deref());
    }
    depth
}

pub fn render_run(report: &RunReport) -> String {
    let mut out = String::new();
    for (id, outcome) in &report.outcomes {
        let _ = writeln!(out, "{:<8} {}", outcome.label(), id);
        if let Outcome::Failed { messages, .. } = outcome {
            for message in messages.iter().filter(|m| !m.message.is_empty()) {
                let _ = writeln!(out, "         {}", message.message.replace('\n', "\n         "));
                if let (Some(expected), Some(actual)) = (&message.expected, &message.actual) {
                    let _ = writeln!(out, "         expected: {}", expected);
                    let _ = writeln!(out, "         actual:   {}", actual);
                }
            }
        }
    }

    let counts = &report.counts;
    let _ = write!(
        out,
        "{} passed, {} failed, {} skipped",
        counts.passed, counts.failed, counts.skipped
    );
    if counts.missing > 0 {
        let _ = write!(out, ", {} without item", counts.missing);
    }
    if report.aborted {
        out.push_str(" (aborted)");
    }
    out
}

/// Definition as `path:line`, one-based
pub fn render_definition(definition: Option<&DefinitionLocation>) -> String {
    match definition {
        Some(d) => format!("{}:{}", d.path.display(), d.line + 1),
        None => "No definition found".to_string(),
    }
}

pub fn render_outlines(groups: &[OutlineGroup]) -> String {
    if groups.is_empty() {
        return "No outline groups".to_string();
    }
    groups
        .iter()
        .map(|g| format!("line {}: {}", g.line + 1, g.include.join(" ")))
        .collect::<Vec<_>>()
        .join("\n")
}

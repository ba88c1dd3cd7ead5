//! Result Projection
//!
//! Maps a finished run's tree onto the test items and reports each outcome to
//! a `RunSink`.

use behave_explorer_core::{node_leaves, Node, Nodes, Status};
use regex::Regex;
use tracing::{debug, warn};

use super::collection::TestItemCollection;
use crate::models::run_report::{Outcome, RunReport, TestMessage};
use crate::utils::error::AppResult;

/// Receives projected outcomes.
pub trait RunSink {
    fn passed(&mut self, id: &str, duration: Option<f64>);
    fn failed(&mut self, id: &str, messages: Vec<TestMessage>, duration: Option<f64>);
    fn skipped(&mut self, id: &str);
    fn append_output(&mut self, text: &str, id: &str);

    /// A result node had no matching item.
    fn missing(&mut self, _bare: &str) {}
}

// ============================================================================
// Diff patterns
// ============================================================================

/// Compiled `diffRegex` patterns
#[derive(Debug, Clone, Default)]
pub struct DiffPatterns {
    patterns: Vec<Regex>,
}

impl DiffPatterns {
    pub fn compile(sources: &[String]) -> AppResult<Self> {
        let patterns = sources
            .iter()
            .map(|source| Regex::new(source))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Expected/actual values from the first matching pattern.
    ///
    /// Groups named `expected` and `actual` are used when present, otherwise
    /// groups 1 and 2. A step's error lines are joined with a bare `\n`
    /// before matching, never `\r\n`, so patterns spanning lines should match
    /// `\n` or `\s`.
    pub fn extract(&self, text: &str) -> Option<(Option<String>, Option<String>)> {
        self.patterns.iter().find_map(|re| {
            let caps = re.captures(text)?;
            let expected = caps.name("expected").or_else(|| caps.get(1));
            let actual = caps.name("actual").or_else(|| caps.get(2));
            Some((
                expected.map(|m| m.as_str().to_string()),
                actual.map(|m| m.as_str().to_string()),
            ))
        })
    }
}

// ============================================================================
// Test run
// ============================================================================

/// Sink that records everything into a `RunReport`
#[derive(Debug, Default)]
pub struct TestRun {
    report: RunReport,
}

impl TestRun {
    pub fn new() -> Self {
        Self::default()
    }

    /// End the run and compute the counters.
    pub fn finish(mut self, aborted: bool) -> RunReport {
        let counts = &mut self.report.counts;
        for outcome in self.report.outcomes.values() {
            match outcome {
                Outcome::Passed { .. } => counts.passed += 1,
                Outcome::Failed { .. } => counts.failed += 1,
                Outcome::Skipped => counts.skipped += 1,
            }
        }
        self.report.aborted = aborted;
        self.report
    }
}

impl RunSink for TestRun {
    fn passed(&mut self, id: &str, duration: Option<f64>) {
        self.report.outcomes.insert(id.to_string(), Outcome::Passed { duration });
    }

    fn failed(&mut self, id: &str, messages: Vec<TestMessage>, duration: Option<f64>) {
        self.report
            .outcomes
            .insert(id.to_string(), Outcome::Failed { messages, duration });
    }

    fn skipped(&mut self, id: &str) {
        self.report.outcomes.insert(id.to_string(), Outcome::Skipped);
    }

    fn append_output(&mut self, text: &str, id: &str) {
        self.report
            .output
            .entry(id.to_string())
            .or_default()
            .push(text.to_string());
    }

    fn missing(&mut self, _bare: &str) {
        self.report.counts.missing += 1;
    }
}

// ============================================================================
// Projection
// ============================================================================

/// Projects run results onto a collection
pub struct Projector<'a> {
    collection: &'a TestItemCollection,
    patterns: &'a DiffPatterns,
    discover_steps: bool,
}

impl<'a> Projector<'a> {
    pub fn new(collection: &'a TestItemCollection, patterns: &'a DiffPatterns, discover_steps: bool) -> Self {
        Self {
            collection,
            patterns,
            discover_steps,
        }
    }

    /// Report the outcome of every node that carries a status.
    pub fn project(&self, tree: &[Node], sink: &mut dyn RunSink) {
        for node in Nodes::new(tree) {
            let Some(status) = node.status() else {
                continue;
            };

            if node.is_step() && !self.discover_steps {
                continue;
            }

            let id = node.location.bare.as_str();
            if !self.collection.contains(id) {
                warn!("No test item for {} ({})", id, node.name);
                sink.missing(id);
                continue;
            }

            let duration = node.duration();
            match status {
                Status::Passed => sink.passed(id, duration),
                Status::Failed => {
                    let messages = self.messages_for(node, id, sink);
                    sink.failed(id, messages, duration);
                }
                Status::Skipped => sink.skipped(id),
                Status::Untested | Status::Other(_) => {
                    warn!("Unhandled status '{}' for {}", status.as_str(), id);
                    sink.skipped(id);
                }
            }
        }
    }

    fn messages_for(&self, node: &Node, id: &str, sink: &mut dyn RunSink) -> Vec<TestMessage> {
        if node.is_step() {
            return vec![self
                .step_message(node, id, sink)
                .unwrap_or_else(|| TestMessage::new(""))];
        }

        // Steps report their own failures when they are items
        if self.discover_steps {
            return vec![TestMessage::new("")];
        }

        node_leaves(node)
            .filter_map(|step| self.step_message(step, id, sink))
            .collect()
    }

    fn step_message(&self, step: &Node, id: &str, sink: &mut dyn RunSink) -> Option<TestMessage> {
        let lines = step.result()?.error_message.as_ref()?;
        let last = lines.last()?;
        // Same text for the output log and for `DiffPatterns::extract`
        let whole = lines.join("\n");

        sink.append_output(&whole, id);

        let mut message = TestMessage::new(last.clone());
        if let Some((expected, actual)) = self.patterns.extract(&whole) {
            debug!("Diff pattern matched for {}", id);
            message.expected = expected;
            message.actual = actual;
        }
        Some(message)
    }
}

/// Project `tree` onto `collection`, recording into `sink`.
pub fn project(
    tree: &[Node],
    collection: &TestItemCollection,
    patterns: &DiffPatterns,
    discover_steps: bool,
    sink: &mut dyn RunSink,
) {
    Projector::new(collection, patterns, discover_steps).project(tree, sink);
}

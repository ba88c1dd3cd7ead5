//! Result Tree Model
//!
//! Typed, normalized representation of a runner report. Every node carries an
//! explicit variant decided once at parse time (by its position in the
//! report), so consumers never have to guess a node's shape from which fields
//! happen to be present.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Keyword the runner uses for scenarios generated from an outline.
pub const KEYWORD_OUTLINE: &str = "Scenario Outline";

/// Execution status reported by the runner.
///
/// Unknown values are preserved verbatim in `Other` so they can be logged
/// instead of being rejected at parse time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Status {
    Untested,
    Skipped,
    Passed,
    Failed,
    Other(String),
}

impl Status {
    pub fn as_str(&self) -> &str {
        match self {
            Status::Untested => "untested",
            Status::Skipped => "skipped",
            Status::Passed => "passed",
            Status::Failed => "failed",
            Status::Other(raw) => raw,
        }
    }
}

impl From<String> for Status {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "untested" => Status::Untested,
            "skipped" => Status::Skipped,
            "passed" => Status::Passed,
            "failed" => Status::Failed,
            _ => Status::Other(raw),
        }
    }
}

impl From<Status> for String {
    fn from(status: Status) -> String {
        status.as_str().to_string()
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A structured, host-addressable source location.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Location {
    /// File path as reported by the runner (relative to the workspace)
    pub file: String,
    /// Zero-based line
    pub line: u32,
    /// Canonical identity key (`file:line`, or just `file` for whole-file containers)
    pub bare: String,
    /// File resolved against the workspace root
    pub full: PathBuf,
}

/// Execution result attached to a step after a live run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepResult {
    pub status: Status,
    /// Duration in seconds
    pub duration: f64,
    pub error_message: Option<Vec<String>>,
}

/// Step-definition source bound to a step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepMatch {
    pub location: Location,
}

/// Top-level grouping node (a feature).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Container {
    pub status: Option<Status>,
    pub tags: Vec<String>,
    pub elements: Vec<Node>,
}

/// A named sequence of steps.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scenario {
    pub status: Option<Status>,
    pub tags: Vec<String>,
    pub steps: Vec<Node>,
}

/// The smallest executable unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Step {
    pub step_type: Option<String>,
    pub result: Option<StepResult>,
    #[serde(rename = "match")]
    pub matched: Option<StepMatch>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeKind {
    Container(Container),
    Scenario(Scenario),
    Step(Step),
}

/// A node of the normalized result tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub keyword: String,
    /// Display name; falls back to `keyword` for anonymous nodes
    pub name: String,
    pub location: Location,
    #[serde(flatten)]
    pub kind: NodeKind,
}

/// Ordered top-level containers of one report.
pub type Tree = Vec<Node>;

impl Node {
    /// Ordered children (scenarios of a container, steps of a scenario).
    pub fn children(&self) -> &[Node] {
        match &self.kind {
            NodeKind::Container(container) => &container.elements,
            NodeKind::Scenario(scenario) => &scenario.steps,
            NodeKind::Step(_) => &[],
        }
    }

    /// The node's own status, or the step result status for steps.
    pub fn status(&self) -> Option<&Status> {
        match &self.kind {
            NodeKind::Container(container) => container.status.as_ref(),
            NodeKind::Scenario(scenario) => scenario.status.as_ref(),
            NodeKind::Step(step) => step.result.as_ref().map(|r| &r.status),
        }
    }

    /// Step duration in seconds. Containers and scenarios carry none.
    pub fn duration(&self) -> Option<f64> {
        self.result().map(|r| r.duration)
    }

    pub fn result(&self) -> Option<&StepResult> {
        self.as_step().and_then(|step| step.result.as_ref())
    }

    pub fn tags(&self) -> &[String] {
        match &self.kind {
            NodeKind::Container(container) => &container.tags,
            NodeKind::Scenario(scenario) => &scenario.tags,
            NodeKind::Step(_) => &[],
        }
    }

    pub fn as_step(&self) -> Option<&Step> {
        match &self.kind {
            NodeKind::Step(step) => Some(step),
            _ => None,
        }
    }

    pub fn is_step(&self) -> bool {
        matches!(self.kind, NodeKind::Step(_))
    }

    pub fn is_container(&self) -> bool {
        matches!(self.kind, NodeKind::Container(_))
    }

    pub fn is_outline(&self) -> bool {
        matches!(self.kind, NodeKind::Scenario(_)) && self.keyword == KEYWORD_OUTLINE
    }
}

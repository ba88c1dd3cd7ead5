//! Report Parser
//!
//! Deserializes the runner's JSON report into the raw schema below, then
//! normalizes every location and fixes each node's variant by its position:
//! top-level objects are containers, their `elements` are scenarios and a
//! scenario's `steps` are steps.
//!
//! The parser is pure: identical bytes and workspace root always produce an
//! identical tree.

use std::path::Path;

use serde::Deserialize;

use crate::error::CoreResult;
use crate::location::{normalize_location, BareKey};
use crate::model::{Container, Node, NodeKind, Scenario, Status, Step, StepMatch, StepResult, Tree};

// ============================================================================
// Raw report schema
// ============================================================================

#[derive(Debug, Deserialize)]
struct RawFeature {
    #[serde(default)]
    keyword: String,
    #[serde(default)]
    name: Option<String>,
    location: String,
    #[serde(default)]
    status: Option<Status>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    elements: Vec<RawScenario>,
}

#[derive(Debug, Deserialize)]
struct RawScenario {
    #[serde(default)]
    keyword: String,
    #[serde(default)]
    name: Option<String>,
    location: String,
    #[serde(default)]
    status: Option<Status>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    steps: Vec<RawStep>,
}

#[derive(Debug, Deserialize)]
struct RawStep {
    #[serde(default)]
    keyword: String,
    #[serde(default)]
    name: Option<String>,
    location: String,
    #[serde(default)]
    step_type: Option<String>,
    #[serde(default)]
    result: Option<RawResult>,
    #[serde(default, rename = "match")]
    matched: Option<RawMatch>,
}

#[derive(Debug, Deserialize)]
struct RawResult {
    status: Status,
    #[serde(default)]
    duration: f64,
    #[serde(default)]
    error_message: Option<RawErrorMessage>,
}

/// Older runner versions emit the error as one string instead of lines.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawErrorMessage {
    Lines(Vec<String>),
    Text(String),
}

#[derive(Debug, Deserialize)]
struct RawMatch {
    location: String,
}

// ============================================================================
// Parsing
// ============================================================================

/// Parse report content into a normalized tree.
pub fn parse_report(content: &str, workspace_root: &Path) -> CoreResult<Tree> {
    let raw: Vec<RawFeature> = serde_json::from_str(content)?;

    raw.into_iter()
        .map(|feature| convert_feature(feature, workspace_root))
        .collect()
}

fn display_name(name: Option<String>, keyword: &str) -> String {
    match name {
        Some(name) if !name.is_empty() => name,
        _ => keyword.to_string(),
    }
}

fn convert_feature(raw: RawFeature, root: &Path) -> CoreResult<Node> {
    let location = normalize_location(&raw.location, root, BareKey::WholeFile)?;
    let elements = raw
        .elements
        .into_iter()
        .map(|scenario| convert_scenario(scenario, root))
        .collect::<CoreResult<Vec<_>>>()?;

    Ok(Node {
        name: display_name(raw.name, &raw.keyword),
        keyword: raw.keyword,
        location,
        kind: NodeKind::Container(Container {
            status: raw.status,
            tags: raw.tags,
            elements,
        }),
    })
}

fn convert_scenario(raw: RawScenario, root: &Path) -> CoreResult<Node> {
    let location = normalize_location(&raw.location, root, BareKey::Line)?;
    let steps = raw
        .steps
        .into_iter()
        .map(|step| convert_step(step, root))
        .collect::<CoreResult<Vec<_>>>()?;

    Ok(Node {
        name: display_name(raw.name, &raw.keyword),
        keyword: raw.keyword,
        location,
        kind: NodeKind::Scenario(Scenario {
            status: raw.status,
            tags: raw.tags,
            steps,
        }),
    })
}

fn convert_step(raw: RawStep, root: &Path) -> CoreResult<Node> {
    let location = normalize_location(&raw.location, root, BareKey::Line)?;

    // Definitions living outside a file (builtins) carry no line; such a match
    // is useless for navigation, so it is dropped rather than failing the report.
    let matched = raw.matched.and_then(|m| {
        match normalize_location(&m.location, root, BareKey::Line) {
            Ok(location) => Some(StepMatch { location }),
            Err(e) => {
                tracing::debug!("Ignoring step match at {}: {}", raw.location, e);
                None
            }
        }
    });

    let result = raw.result.map(|r| StepResult {
        status: r.status,
        duration: r.duration,
        error_message: r.error_message.map(|message| match message {
            RawErrorMessage::Lines(lines) => lines,
            RawErrorMessage::Text(text) => text.lines().map(str::to_string).collect(),
        }),
    });

    Ok(Node {
        name: display_name(raw.name, &raw.keyword),
        keyword: raw.keyword,
        location,
        kind: NodeKind::Step(Step {
            step_type: raw.step_type,
            result,
            matched,
        }),
    })
}

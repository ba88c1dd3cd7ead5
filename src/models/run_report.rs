//! Run Report Models
//!
//! Outcomes recorded while projecting a run onto the test items.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Failure message attached to an item
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestMessage {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual: Option<String>,
}

impl TestMessage {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Default::default()
        }
    }
}

/// Final outcome of one item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    Passed {
        #[serde(skip_serializing_if = "Option::is_none")]
        duration: Option<f64>,
    },
    Failed {
        messages: Vec<TestMessage>,
        #[serde(skip_serializing_if = "Option::is_none")]
        duration: Option<f64>,
    },
    Skipped,
}

impl Outcome {
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Passed { .. } => "passed",
            Outcome::Failed { .. } => "failed",
            Outcome::Skipped => "skipped",
        }
    }
}

/// Outcome counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunCounts {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    /// Result nodes with no matching test item
    pub missing: usize,
}

/// Everything a finished run recorded
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Outcome per item id (last outcome wins)
    pub outcomes: BTreeMap<String, Outcome>,
    /// Output appended per item id, in order
    pub output: BTreeMap<String, Vec<String>>,
    pub counts: RunCounts,
    /// Whether the run was aborted before it finished
    pub aborted: bool,
}

impl RunReport {
    pub fn outcome(&self, id: &str) -> Option<&Outcome> {
        self.outcomes.get(id)
    }

    /// True when nothing failed
    pub fn success(&self) -> bool {
        self.counts.failed == 0 && !self.aborted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_serialization() {
        let outcome = Outcome::Failed {
            messages: vec![TestMessage::new("boom")],
            duration: Some(0.5),
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["outcome"], "failed");
        assert_eq!(json["messages"][0]["message"], "boom");
        assert!(json["messages"][0].get("expected").is_none());

        let skipped = serde_json::to_value(Outcome::Skipped).unwrap();
        assert_eq!(skipped["outcome"], "skipped");
    }

    #[test]
    fn test_report_success() {
        let mut report = RunReport::default();
        assert!(report.success());

        report.counts.failed = 1;
        assert!(!report.success());
    }
}

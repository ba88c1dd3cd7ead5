//! Behave Explorer Core
//!
//! Foundational types for the Behave Explorer workspace: the error taxonomy,
//! the normalized result tree, and the pure functions that build and walk it.
//! Nothing here touches processes, the cache directory or the host.
//!
//! ## Module Organization
//!
//! - `error` - Core error types (`CoreError`, `CoreResult`)
//! - `model` - Result tree (`Node`, `NodeKind`, `Location`, `Status`, ...)
//! - `location` - Runner `file:line` location normalization
//! - `parser` - Report JSON to `Tree`
//! - `traverse` - Accumulating visitor and lazy node/leaf iterators

pub mod error;
pub mod location;
pub mod model;
pub mod parser;
pub mod traverse;

// ── Error Types ────────────────────────────────────────────────────────
pub use error::{CoreError, CoreResult};

// ── Result Tree ────────────────────────────────────────────────────────
pub use model::{
    Container, Location, Node, NodeKind, Scenario, Status, Step, StepMatch, StepResult, Tree,
    KEYWORD_OUTLINE,
};

// ── Normalization & Parsing ────────────────────────────────────────────
pub use location::{normalize_location, BareKey};
pub use parser::parse_report;

// ── Traversal ──────────────────────────────────────────────────────────
pub use traverse::{iterate_leaves, node_leaves, traverse, Leaves, Nodes};

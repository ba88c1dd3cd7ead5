//! Location Normalizer
//!
//! Converts runner-native `"file:line"` strings (one-based lines) into
//! structured [`Location`]s with zero-based lines and a path resolved against
//! the workspace root.

use std::path::Path;

use crate::error::{CoreError, CoreResult};
use crate::model::Location;

/// How the canonical key of a location is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BareKey {
    /// Always `file:line`.
    Line,
    /// `file` alone when the location points at the first line. Used for
    /// top-level containers: handing `file:1` back to the runner would only
    /// select the first child instead of the whole file.
    WholeFile,
}

/// Normalize a raw `"file:line"` location.
pub fn normalize_location(raw: &str, workspace_root: &Path, key: BareKey) -> CoreResult<Location> {
    let delim = raw
        .rfind(':')
        .ok_or_else(|| CoreError::parse(format!("Location without line: {}", raw)))?;

    let (file, line) = (&raw[..delim], &raw[delim + 1..]);
    let line: u32 = line
        .trim()
        .parse()
        .map_err(|e| CoreError::parse(format!("Invalid line in location '{}': {}", raw, e)))?;

    if line == 0 {
        return Err(CoreError::parse(format!("Location line must be positive: {}", raw)));
    }

    let line = line - 1;
    let bare = if key == BareKey::WholeFile && line == 0 {
        file.to_string()
    } else {
        raw.to_string()
    };

    Ok(Location {
        file: file.to_string(),
        line,
        bare,
        full: workspace_root.join(file),
    })
}

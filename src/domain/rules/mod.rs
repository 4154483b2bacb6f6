// Business rules - Import normalization for marker data

use serde_json::Value;
use tracing::warn;

use crate::domain::model::{TimeSpec, CATEGORY_COUNT, DEFAULT_COMMENT};

/// A marker entry extracted from external JSON, already normalized
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMarker {
    pub position: TimeSpec,
    pub comment: String,
    pub category: usize,
}

/// Clamp an external category value into the category table.
///
/// Out-of-range values collapse to category 0 with a diagnostic; this is the
/// tolerant channel for external input, as opposed to the direct API which
/// treats an out-of-range category as a caller bug.
pub fn normalize_category(raw: i64) -> usize {
    if raw < 0 || raw >= CATEGORY_COUNT as i64 {
        warn!("Invalid marker category {}, defaulting to 0", raw);
        0
    } else {
        raw as usize
    }
}

/// Validate one entry of a marker JSON array.
///
/// Returns `None` for entries that must be skipped (not an object, or no
/// numeric `pos`); missing comment and category fall back to defaults, an
/// out-of-range category is clamped. Skips are diagnostics, never errors.
pub fn validate_entry(entry: &Value) -> Option<RawMarker> {
    let Some(obj) = entry.as_object() else {
        warn!("Skipping invalid marker data (not an object)");
        return None;
    };
    let Some(pos) = obj.get("pos").and_then(Value::as_f64) else {
        warn!("Skipping invalid marker data (does not contain position)");
        return None;
    };
    let comment = obj
        .get("comment")
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_COMMENT)
        .to_string();
    let category = normalize_category(obj.get("type").and_then(Value::as_i64).unwrap_or(0));
    Some(RawMarker {
        position: TimeSpec::from_seconds(pos),
        comment,
        category,
    })
}

#[cfg(test)]
mod tests;

//! The comparison view.
//!
//! Everything here derives throwaway normalized forms used only to decide
//! match status. Raw values flow to the output table untouched, so the audit
//! trail survives formatting noise.

use crate::model::Value;

/// Collapse whitespace runs (including newlines) to single spaces, trim,
/// and uppercase.
pub fn normalize_text(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ").to_uppercase()
}

/// Canonical comparison key for a cell: normalized text, canonical number
/// rendering (`10.0` and `10` agree), empty string for null/absent.
pub fn comparison_key(value: &Value) -> String {
    match value {
        Value::Text(s) => normalize_text(s),
        Value::Number(_) => value.display(),
        Value::Null => String::new(),
    }
}

/// Coerce a cell to a whole unit for rounding comparison, half away from
/// zero. `Null` stays `None` (null-vs-null still matches); text cells are
/// parsed after trimming. `Err` carries the unparseable literal.
pub fn rounded_unit(value: &Value) -> Result<Option<i64>, String> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => Ok(Some(n.round() as i64)),
        Value::Text(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            trimmed
                .parse::<f64>()
                .map(|n| Some(n.round() as i64))
                .map_err(|_| s.clone())
        }
    }
}

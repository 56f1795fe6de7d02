//! Per-field comparison and the row-level verdict.

use crate::config::ReconcileConfig;
use crate::error::ReconError;
use crate::join::JoinedRow;
use crate::model::{FieldPair, MatchStatus, RowResult, Value};
use crate::normalize::{comparison_key, rounded_unit};
use crate::schema::SchemaMap;

/// One joined row after comparison: its field pairs plus the folded verdict.
#[derive(Debug)]
pub struct ComparedRow {
    pub pairs: Vec<FieldPair>,
    pub result: RowResult,
    pub not_matched_count: usize,
    /// Fields whose coercion failure was downgraded to `NotMatched`.
    pub degraded: usize,
}

/// Compare every paired field of one joined row against the normalized view.
///
/// Coercion failures in rounded fields become `NotMatched` with a diagnostic
/// note; under `strict` they propagate and abort the run. `row_number` is the
/// 1-based position in the reconciled table, used in diagnostics.
pub fn compare_row(
    row: &JoinedRow<'_>,
    row_number: usize,
    schema: &SchemaMap,
    config: &ReconcileConfig,
) -> Result<ComparedRow, ReconError> {
    let mut pairs = Vec::with_capacity(schema.pairs.len());
    let mut not_matched_count = 0;
    let mut degraded = 0;

    for mapping in &schema.pairs {
        let input = cell(row.input, &mapping.input_column);
        let output = cell(row.output, &mapping.output_column);

        let (status, note) = if config.is_rounded(&mapping.base) {
            match (rounded_unit(&input), rounded_unit(&output)) {
                (Ok(a), Ok(b)) => (equal_status(a == b), None),
                (Err(literal), _) | (_, Err(literal)) => {
                    if config.strict {
                        return Err(ReconError::Comparison {
                            row: row_number,
                            field: mapping.base.clone(),
                            value: literal,
                        });
                    }
                    degraded += 1;
                    (
                        MatchStatus::NotMatched,
                        Some(format!("cannot coerce '{literal}' to a number")),
                    )
                }
            }
        } else {
            (equal_status(comparison_key(&input) == comparison_key(&output)), None)
        };

        if status == MatchStatus::NotMatched {
            not_matched_count += 1;
        }
        pairs.push(FieldPair {
            base: mapping.base.clone(),
            input,
            output,
            status,
            note,
        });
    }

    let result = if not_matched_count > 0 {
        RowResult::Fail
    } else {
        RowResult::Pass
    };

    Ok(ComparedRow { pairs, result, not_matched_count, degraded })
}

fn cell(record: Option<&crate::model::Record>, column: &str) -> Value {
    record
        .and_then(|r| r.get(column))
        .cloned()
        .unwrap_or(Value::Null)
}

fn equal_status(equal: bool) -> MatchStatus {
    if equal {
        MatchStatus::Matched
    } else {
        MatchStatus::NotMatched
    }
}

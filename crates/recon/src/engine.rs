//! Pipeline orchestration: schema → join → compare → summary → mismatches.

use crate::compare::compare_row;
use crate::config::ReconcileConfig;
use crate::error::ReconError;
use crate::join::{outer_join, JoinedRow};
use crate::mismatch::extract_mismatches;
use crate::model::{
    ReconcileOutput, ReconciledRow, ReconciledTable, Record, RowOrigin, RowResult, RunMeta,
    RunReport, Value,
};
use crate::schema::SchemaMap;
use crate::summary::summarize;

/// Reconcile the business source against the system extract.
///
/// One pass, no shared mutable state between stages; the same inputs and
/// config always produce identical tables. A missing key column aborts with
/// `SchemaMismatch` before any output is built; per-field coercion failures
/// only abort under `strict`.
pub fn reconcile(
    config: &ReconcileConfig,
    input: &[Record],
    output: &[Record],
) -> Result<ReconcileOutput, ReconError> {
    let schema = SchemaMap::build(input, output, &config.key)?;
    let layout = schema.layout();
    let joined = outer_join(input, output, &config.key);

    let mut rows = Vec::with_capacity(joined.len());
    let mut report = RunReport::default();

    for (i, joined_row) in joined.iter().enumerate() {
        let compared = compare_row(joined_row, i + 1, &schema, config)?;

        report.rows += 1;
        report.degraded_fields += compared.degraded;
        match compared.result {
            RowResult::Pass => report.passed += 1,
            RowResult::Fail => report.failed += 1,
        }

        rows.push(ReconciledRow {
            origin: origin(joined_row),
            join_values: join_values(joined_row, &schema),
            pairs: compared.pairs,
            result: compared.result,
            not_matched_count: compared.not_matched_count,
        });
    }

    let summary = summarize(&rows, &layout.bases, config.count_unjoined_rows);
    let mismatches = extract_mismatches(&rows, schema.key_index);

    Ok(ReconcileOutput {
        meta: RunMeta {
            config_name: config.name.clone(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        },
        reconciled: ReconciledTable { layout, rows },
        mismatches,
        summary,
        report,
    })
}

fn origin(row: &JoinedRow<'_>) -> RowOrigin {
    match (row.input, row.output) {
        (Some(_), Some(_)) => RowOrigin::Both,
        (Some(_), None) => RowOrigin::InputOnly,
        (None, _) => RowOrigin::OutputOnly,
    }
}

/// Pass-through column values in layout order, null for the absent side.
fn join_values(row: &JoinedRow<'_>, schema: &SchemaMap) -> Vec<Value> {
    schema
        .join_only
        .iter()
        .map(|column| {
            let record = match column.side {
                crate::model::Side::Input => row.input,
                crate::model::Side::Output => row.output,
            };
            record
                .and_then(|r| r.get(&column.name))
                .cloned()
                .unwrap_or(Value::Null)
        })
        .collect()
}

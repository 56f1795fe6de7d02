//! Extraction of rows with at least one mismatched field.

use crate::model::{MatchStatus, MismatchEntry, ReconciledRow, Value};

/// Collect one entry per failing row, in final table order.
///
/// `key_index` locates the key field among each row's pairs. The key value is
/// taken from the input side, falling back to the output side when the input
/// side is null (output-only rows).
pub fn extract_mismatches(rows: &[ReconciledRow], key_index: usize) -> Vec<MismatchEntry> {
    rows.iter()
        .enumerate()
        .filter(|(_, row)| row.not_matched_count > 0)
        .map(|(i, row)| {
            let key_pair = &row.pairs[key_index];
            let key = if key_pair.input.is_null() {
                key_pair.output.clone()
            } else {
                key_pair.input.clone()
            };
            let fields: Vec<String> = row
                .pairs
                .iter()
                .filter(|p| p.status == MatchStatus::NotMatched)
                .map(|p| p.base.clone())
                .collect();
            MismatchEntry { row_number: i + 1, key, fields }
        })
        .collect()
}

/// `Not Matched Columns` cell for the mismatch table.
pub fn joined_fields(entry: &MismatchEntry) -> String {
    entry.fields.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FieldPair, RowOrigin, RowResult};

    fn pair(base: &str, input: Value, output: Value, status: MatchStatus) -> FieldPair {
        FieldPair { base: base.into(), input, output, status, note: None }
    }

    fn row(key_input: Value, key_output: Value, name_status: MatchStatus) -> ReconciledRow {
        let not_matched = usize::from(name_status == MatchStatus::NotMatched);
        ReconciledRow {
            origin: RowOrigin::Both,
            join_values: vec![],
            pairs: vec![
                pair("Id", key_input, key_output, MatchStatus::Matched),
                pair("Name", Value::Null, Value::Null, name_status),
            ],
            result: if not_matched > 0 { RowResult::Fail } else { RowResult::Pass },
            not_matched_count: not_matched,
        }
    }

    #[test]
    fn only_failing_rows_extracted() {
        let rows = vec![
            row(Value::Number(1.0), Value::Number(1.0), MatchStatus::Matched),
            row(Value::Number(2.0), Value::Number(2.0), MatchStatus::NotMatched),
            row(Value::Number(3.0), Value::Number(3.0), MatchStatus::Matched),
            row(Value::Number(4.0), Value::Number(4.0), MatchStatus::NotMatched),
        ];
        let entries = extract_mismatches(&rows, 0);

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].row_number, 2);
        assert_eq!(entries[0].key, Value::Number(2.0));
        assert_eq!(entries[0].fields, vec!["Name".to_string()]);
        assert_eq!(entries[1].row_number, 4);
    }

    #[test]
    fn key_falls_back_to_output_side() {
        let rows = vec![row(Value::Null, Value::Number(9.0), MatchStatus::NotMatched)];
        let entries = extract_mismatches(&rows, 0);
        assert_eq!(entries[0].key, Value::Number(9.0));
    }

    #[test]
    fn field_list_renders_comma_joined() {
        let entry = MismatchEntry {
            row_number: 1,
            key: Value::Number(1.0),
            fields: vec!["Name".into(), "Price".into()],
        };
        assert_eq!(joined_fields(&entry), "Name, Price");
    }
}

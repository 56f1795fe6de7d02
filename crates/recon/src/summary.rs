//! Per-field aggregate accuracy statistics.

use crate::model::{MatchStatus, ReconciledRow, RowOrigin, SummaryStat, SummaryTable};

/// Fold per-field statuses across all counted rows into one stat per base
/// field, in the table's field order. Row order never affects the result.
///
/// With `count_unjoined_rows` off, rows whose key exists on one side only are
/// excluded from every field's denominator.
pub fn summarize(
    rows: &[ReconciledRow],
    bases: &[String],
    count_unjoined_rows: bool,
) -> SummaryTable {
    let mut stats: Vec<SummaryStat> = bases
        .iter()
        .map(|base| SummaryStat {
            field: base.clone(),
            matched: 0,
            not_matched: 0,
            error_percentage: 0.0,
        })
        .collect();

    for row in rows {
        if !count_unjoined_rows && row.origin != RowOrigin::Both {
            continue;
        }
        for (stat, pair) in stats.iter_mut().zip(&row.pairs) {
            match pair.status {
                MatchStatus::Matched => stat.matched += 1,
                MatchStatus::NotMatched => stat.not_matched += 1,
            }
        }
    }

    for stat in &mut stats {
        let total = stat.matched + stat.not_matched;
        if total > 0 {
            stat.error_percentage = stat.not_matched as f64 * 100.0 / total as f64;
        }
    }

    SummaryTable { stats }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FieldPair, RowResult, Value};

    fn row(origin: RowOrigin, statuses: &[MatchStatus]) -> ReconciledRow {
        let bases = ["Id", "Price"];
        let pairs: Vec<FieldPair> = statuses
            .iter()
            .zip(bases)
            .map(|(&status, base)| FieldPair {
                base: base.into(),
                input: Value::Null,
                output: Value::Null,
                status,
                note: None,
            })
            .collect();
        let not_matched_count = statuses
            .iter()
            .filter(|&&s| s == MatchStatus::NotMatched)
            .count();
        ReconciledRow {
            origin,
            join_values: vec![],
            pairs,
            result: if not_matched_count > 0 { RowResult::Fail } else { RowResult::Pass },
            not_matched_count,
        }
    }

    fn bases() -> Vec<String> {
        vec!["Id".into(), "Price".into()]
    }

    use MatchStatus::{Matched, NotMatched};

    #[test]
    fn counts_conserve_row_total() {
        let rows = vec![
            row(RowOrigin::Both, &[Matched, Matched]),
            row(RowOrigin::Both, &[Matched, NotMatched]),
            row(RowOrigin::Both, &[NotMatched, NotMatched]),
        ];
        let summary = summarize(&rows, &bases(), true);

        let id = summary.get("Id").unwrap();
        assert_eq!((id.matched, id.not_matched), (2, 1));
        let price = summary.get("Price").unwrap();
        assert_eq!((price.matched, price.not_matched), (1, 2));

        for stat in &summary.stats {
            assert_eq!(stat.matched + stat.not_matched, rows.len());
        }
    }

    #[test]
    fn error_percentage() {
        let rows = vec![
            row(RowOrigin::Both, &[Matched, NotMatched]),
            row(RowOrigin::Both, &[Matched, Matched]),
            row(RowOrigin::Both, &[Matched, Matched]),
            row(RowOrigin::Both, &[Matched, NotMatched]),
        ];
        let summary = summarize(&rows, &bases(), true);
        assert_eq!(summary.get("Id").unwrap().error_percentage, 0.0);
        assert_eq!(summary.get("Price").unwrap().error_percentage, 50.0);
    }

    #[test]
    fn empty_table_has_zero_percentage() {
        let summary = summarize(&[], &bases(), true);
        let id = summary.get("Id").unwrap();
        assert_eq!((id.matched, id.not_matched), (0, 0));
        assert_eq!(id.error_percentage, 0.0);
    }

    #[test]
    fn unjoined_rows_excluded_when_configured() {
        let rows = vec![
            row(RowOrigin::Both, &[Matched, Matched]),
            row(RowOrigin::InputOnly, &[NotMatched, NotMatched]),
            row(RowOrigin::OutputOnly, &[NotMatched, NotMatched]),
        ];

        let counted = summarize(&rows, &bases(), true);
        let id = counted.get("Id").unwrap();
        assert_eq!((id.matched, id.not_matched), (1, 2));

        let excluded = summarize(&rows, &bases(), false);
        let id = excluded.get("Id").unwrap();
        assert_eq!((id.matched, id.not_matched), (1, 0));
        assert_eq!(id.error_percentage, 0.0);
    }

    #[test]
    fn row_order_does_not_matter() {
        let mut rows = vec![
            row(RowOrigin::Both, &[Matched, NotMatched]),
            row(RowOrigin::Both, &[NotMatched, Matched]),
            row(RowOrigin::Both, &[Matched, Matched]),
        ];
        let forward = summarize(&rows, &bases(), true);
        rows.reverse();
        let backward = summarize(&rows, &bases(), true);

        for (a, b) in forward.stats.iter().zip(&backward.stats) {
            assert_eq!(a.field, b.field);
            assert_eq!(a.matched, b.matched);
            assert_eq!(a.not_matched, b.not_matched);
        }
    }
}

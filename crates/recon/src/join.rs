//! Full outer join of the two record sets on the designated key.

use std::collections::BTreeMap;

use crate::config::KeyConfig;
use crate::model::{Record, Value};

/// A merged row: borrowed views of the source records, one side possibly
/// absent. Nothing is copied or mutated here.
#[derive(Debug, Clone, Copy)]
pub struct JoinedRow<'a> {
    pub input: Option<&'a Record>,
    pub output: Option<&'a Record>,
}

/// Full outer join on the key columns.
///
/// Input rows come first in their original order; each matches every
/// same-keyed output row (duplicate keys cross-match rather than reject).
/// Output rows whose key never matched follow, in their original order.
/// Null keys never match anything.
pub fn outer_join<'a>(
    input: &'a [Record],
    output: &'a [Record],
    key: &KeyConfig,
) -> Vec<JoinedRow<'a>> {
    let mut by_key: BTreeMap<String, Vec<usize>> = BTreeMap::new();
    for (i, record) in output.iter().enumerate() {
        if let Some(k) = join_key(record.get(&key.output)) {
            by_key.entry(k).or_default().push(i);
        }
    }

    let mut output_matched = vec![false; output.len()];
    let mut rows = Vec::new();

    for record in input {
        let matches = join_key(record.get(&key.input)).and_then(|k| by_key.get(&k));
        match matches {
            Some(indices) => {
                for &i in indices {
                    output_matched[i] = true;
                    rows.push(JoinedRow {
                        input: Some(record),
                        output: Some(&output[i]),
                    });
                }
            }
            None => rows.push(JoinedRow { input: Some(record), output: None }),
        }
    }

    for (i, record) in output.iter().enumerate() {
        if !output_matched[i] {
            rows.push(JoinedRow { input: None, output: Some(record) });
        }
    }

    rows
}

/// Canonical join key for a cell. Numbers canonicalize so `1` joins `1.0`;
/// null and absent keys never join.
fn join_key(value: Option<&Value>) -> Option<String> {
    match value {
        None | Some(Value::Null) => None,
        Some(v) => Some(v.display()),
    }
}

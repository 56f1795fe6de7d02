// CSV/TSV import and result-table export

use std::io::Read;
use std::path::Path;

use crosscheck_recon::mismatch::joined_fields;
use crosscheck_recon::model::{MismatchEntry, ReconciledTable, SummaryTable, Value};
use crosscheck_recon::{ReconcileOutput, Record};

use crate::error::IoError;

/// Load one CSV/TSV source into records. Headers come from the first row;
/// empty cells load as null, numeric-looking cells as numbers.
pub fn load_records(path: &Path) -> Result<Vec<Record>, IoError> {
    let content = read_file_as_utf8(path)?;
    let delimiter = sniff_delimiter(&content);
    records_from_string(&content, delimiter)
}

/// Detect the most likely field delimiter by checking consistency across the
/// first few lines.
///
/// For each candidate (tab, semicolon, comma, pipe), count fields per line.
/// The delimiter that produces the most consistent field count (>1 field) wins.
fn sniff_delimiter(content: &str) -> u8 {
    let candidates: &[u8] = &[b'\t', b';', b',', b'|'];
    let sample_lines: Vec<&str> = content.lines().take(10).collect();

    if sample_lines.is_empty() {
        return b',';
    }

    let mut best = b',';
    let mut best_score = 0u64;

    for &delim in candidates {
        let counts: Vec<usize> = sample_lines
            .iter()
            .map(|line| {
                csv::ReaderBuilder::new()
                    .delimiter(delim)
                    .has_headers(false)
                    .flexible(true)
                    .from_reader(line.as_bytes())
                    .records()
                    .next()
                    .and_then(|r| r.ok())
                    .map(|r| r.len())
                    .unwrap_or(1)
            })
            .collect();

        if counts.first().copied().unwrap_or(0) <= 1 {
            continue;
        }

        let target = counts[0];
        let consistent = counts.iter().filter(|&&c| c == target).count() as u64;
        let score = consistent * target as u64;

        if score > best_score {
            best_score = score;
            best = delim;
        }
    }

    best
}

/// Read file and convert to UTF-8 if needed (handles Windows-1252, Latin-1, etc.)
fn read_file_as_utf8(path: &Path) -> Result<String, IoError> {
    let mut file = std::fs::File::open(path)
        .map_err(|e| IoError::Read(format!("{}: {e}", path.display())))?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)
        .map_err(|e| IoError::Read(format!("{}: {e}", path.display())))?;

    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(e) => {
            let bytes = e.into_bytes();
            // Fall back to Windows-1252 (common for Excel-exported CSVs)
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            Ok(decoded.into_owned())
        }
    }
}

fn records_from_string(content: &str, delimiter: u8) -> Result<Vec<Record>, IoError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| IoError::Parse(e.to_string()))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut records = Vec::new();
    for result in reader.records() {
        let row = result.map_err(|e| IoError::Parse(e.to_string()))?;
        let mut record = Record::new();
        for (i, header) in headers.iter().enumerate() {
            record.push(header.clone(), infer_value(row.get(i).unwrap_or("")));
        }
        records.push(record);
    }

    Ok(records)
}

/// Type a raw CSV cell the way the spreadsheet loaders do: empty is null,
/// parseable numbers are numbers, everything else stays text as-is.
fn infer_value(cell: &str) -> Value {
    if cell.is_empty() {
        return Value::Null;
    }
    match cell.trim().parse::<f64>() {
        Ok(n) if n.is_finite() => Value::Number(n),
        _ => Value::Text(cell.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// Persist all three result tables next to `base`: `<stem>.csv`,
/// `<stem>_mismatches.csv`, `<stem>_summary.csv`.
pub fn write_report(base: &Path, output: &ReconcileOutput) -> Result<(), IoError> {
    let stem = base
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "report".into());
    let sibling = |suffix: &str| base.with_file_name(format!("{stem}{suffix}.csv"));

    write_reconciled(&sibling(""), &output.reconciled)?;
    write_mismatches(
        &sibling("_mismatches"),
        &output.mismatches,
        &output.reconciled.layout.key_base,
    )?;
    write_summary(&sibling("_summary"), &output.summary)
}

pub fn write_reconciled(path: &Path, table: &ReconciledTable) -> Result<(), IoError> {
    let mut writer = writer(path)?;
    write_row(&mut writer, table.layout.headers())?;

    for row in &table.rows {
        let mut cells: Vec<String> = row.join_values.iter().map(Value::display).collect();
        for pair in &row.pairs {
            cells.push(pair.input.display());
            cells.push(pair.output.display());
            cells.push(pair.status.to_string());
        }
        cells.push(row.result.to_string());
        cells.push(row.not_matched_count.to_string());
        write_row(&mut writer, cells)?;
    }

    writer.flush().map_err(|e| IoError::Write(e.to_string()))
}

pub fn write_mismatches(
    path: &Path,
    mismatches: &[MismatchEntry],
    key_base: &str,
) -> Result<(), IoError> {
    let mut writer = writer(path)?;
    write_row(
        &mut writer,
        vec![
            "Row Number".to_string(),
            format!("{key_base}_Input"),
            "Not Matched Columns".to_string(),
        ],
    )?;

    for entry in mismatches {
        write_row(
            &mut writer,
            vec![
                entry.row_number.to_string(),
                entry.key.display(),
                joined_fields(entry),
            ],
        )?;
    }

    writer.flush().map_err(|e| IoError::Write(e.to_string()))
}

pub fn write_summary(path: &Path, summary: &SummaryTable) -> Result<(), IoError> {
    let mut writer = writer(path)?;
    write_row(
        &mut writer,
        ["Column", "Total Matched", "Error", "Percent Error"]
            .map(String::from)
            .to_vec(),
    )?;

    for stat in &summary.stats {
        write_row(
            &mut writer,
            vec![
                stat.field.clone(),
                stat.matched.to_string(),
                stat.not_matched.to_string(),
                stat.percent_display(),
            ],
        )?;
    }

    writer.flush().map_err(|e| IoError::Write(e.to_string()))
}

fn writer(path: &Path) -> Result<csv::Writer<std::fs::File>, IoError> {
    csv::Writer::from_path(path)
        .map_err(|e| IoError::Write(format!("{}: {e}", path.display())))
}

fn write_row(
    writer: &mut csv::Writer<std::fs::File>,
    cells: Vec<String>,
) -> Result<(), IoError> {
    writer
        .write_record(&cells)
        .map_err(|e| IoError::Write(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infer_cell_types() {
        assert_eq!(infer_value(""), Value::Null);
        assert_eq!(infer_value("10.4"), Value::Number(10.4));
        assert_eq!(infer_value(" 7 "), Value::Number(7.0));
        assert_eq!(infer_value("Apple"), Value::Text("Apple".into()));
        assert_eq!(infer_value("2026-08-01"), Value::Text("2026-08-01".into()));
    }

    #[test]
    fn sniff_common_delimiters() {
        assert_eq!(sniff_delimiter("a,b,c\n1,2,3\n"), b',');
        assert_eq!(sniff_delimiter("a;b;c\n1;2;3\n"), b';');
        assert_eq!(sniff_delimiter("a\tb\tc\n1\t2\t3\n"), b'\t');
        assert_eq!(sniff_delimiter(""), b',');
    }

    #[test]
    fn records_preserve_header_order() {
        let records = records_from_string("Id,Name,Price\n1,Apple,10.4\n2,,\n", b',').unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0].fields(),
            &["Id".to_string(), "Name".to_string(), "Price".to_string()]
        );
        assert_eq!(records[0].get("Price"), Some(&Value::Number(10.4)));
        assert_eq!(records[1].get("Name"), Some(&Value::Null));
        assert_eq!(records[1].get("Price"), Some(&Value::Null));
    }

    #[test]
    fn short_rows_pad_with_null() {
        let records = records_from_string("Id,Name\n1\n", b',').unwrap();
        assert_eq!(records[0].get("Name"), Some(&Value::Null));
    }

    #[test]
    fn load_and_write_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("source.csv");
        std::fs::write(&source, "Id,Name\n1,Apple\n2,Pear\n").unwrap();

        let records = load_records(&source).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].get("Name"), Some(&Value::Text("Pear".into())));
    }

    #[test]
    fn report_writes_three_files() {
        use crosscheck_recon::config::{KeyConfig, SourceConfig};
        use crosscheck_recon::{reconcile, ReconcileConfig};

        let config = ReconcileConfig {
            name: "csv writer test".into(),
            key: KeyConfig { input: "Id".into(), output: "Id".into() },
            rounded_fields: vec![],
            strict: false,
            count_unjoined_rows: true,
            input: SourceConfig { file: "a.csv".into(), sheet: None },
            output: SourceConfig { file: "b.csv".into(), sheet: None },
            report: None,
        };
        let input = vec![Record::from_pairs([
            ("Id".to_string(), Value::Number(1.0)),
            ("Name".to_string(), Value::Text("Apple".into())),
        ])];
        let output_records = vec![Record::from_pairs([
            ("Id".to_string(), Value::Number(1.0)),
            ("Name".to_string(), Value::Text("Pear".into())),
        ])];
        let output = reconcile(&config, &input, &output_records).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("result.csv");
        write_report(&base, &output).unwrap();

        let reconciled = std::fs::read_to_string(dir.path().join("result.csv")).unwrap();
        assert!(reconciled.starts_with(
            "Id_Input,Id_Output,Id_Status,Name_Input,Name_Output,Name_Status,Result,Not Matched Count"
        ));
        assert!(reconciled.contains("Not Matched"));
        assert!(reconciled.contains("Fail,1"));

        let mismatches =
            std::fs::read_to_string(dir.path().join("result_mismatches.csv")).unwrap();
        assert!(mismatches.starts_with("Row Number,Id_Input,Not Matched Columns"));
        assert!(mismatches.contains("1,1,Name"));

        let summary = std::fs::read_to_string(dir.path().join("result_summary.csv")).unwrap();
        assert!(summary.starts_with("Column,Total Matched,Error,Percent Error"));
        assert!(summary.contains("Name,0,1,100.00%"));
    }
}

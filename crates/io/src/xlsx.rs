// Excel import (xlsx, xls, xlsb, ods) and result-workbook export (xlsx only)

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};

use crosscheck_recon::mismatch::joined_fields;
use crosscheck_recon::model::Value;
use crosscheck_recon::{ReconcileOutput, Record};

use crate::error::IoError;

/// Sheet names of the exported workbook, as the reviewers know them.
pub const RECONCILED_SHEET: &str = "Matched Data";
pub const MISMATCH_SHEET: &str = "Mismatch Data";
pub const SUMMARY_SHEET: &str = "Summary Data";

// ---------------------------------------------------------------------------
// Import
// ---------------------------------------------------------------------------

/// Load one Excel source into records. `sheet` selects by name; the first
/// sheet is used when omitted. The first row supplies field names.
pub fn load_records(path: &Path, sheet: Option<&str>) -> Result<Vec<Record>, IoError> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| IoError::Read(format!("{}: {e}", path.display())))?;

    let sheet_names = workbook.sheet_names().to_vec();
    let sheet_name = match sheet {
        Some(name) => {
            if !sheet_names.iter().any(|s| s == name) {
                return Err(IoError::MissingSheet(name.to_string()));
            }
            name.to_string()
        }
        None => sheet_names
            .first()
            .cloned()
            .ok_or_else(|| IoError::Parse("workbook contains no sheets".into()))?,
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| IoError::Parse(format!("sheet '{sheet_name}': {e}")))?;

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header_row) => header_row.iter().map(Data::to_string).collect(),
        None => return Ok(Vec::new()),
    };

    let mut records = Vec::new();
    for row in rows {
        let mut record = Record::new();
        for (i, header) in headers.iter().enumerate() {
            let value = row.get(i).map(cell_value).unwrap_or(Value::Null);
            record.push(header.clone(), value);
        }
        records.push(record);
    }

    Ok(records)
}

fn cell_value(data: &Data) -> Value {
    match data {
        Data::Empty => Value::Null,
        Data::String(s) => {
            if s.is_empty() {
                Value::Null
            } else {
                Value::Text(s.clone())
            }
        }
        Data::Float(n) => Value::Number(*n),
        Data::Int(n) => Value::Number(*n as f64),
        Data::Bool(b) => Value::Text(if *b { "TRUE" } else { "FALSE" }.into()),
        Data::Error(e) => Value::Text(format!("#{e:?}")),
        Data::DateTime(dt) => Value::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Value::Text(s.clone()),
    }
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// Persist the three result tables as one workbook: reconciled data,
/// mismatches, and the per-field summary.
pub fn write_workbook(path: &Path, output: &ReconcileOutput) -> Result<(), IoError> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    write_reconciled_sheet(workbook.add_worksheet(), output, &header_format).map_err(xe)?;
    write_mismatch_sheet(workbook.add_worksheet(), output, &header_format).map_err(xe)?;
    write_summary_sheet(workbook.add_worksheet(), output, &header_format).map_err(xe)?;

    workbook
        .save(path)
        .map_err(|e| IoError::Write(format!("{}: {e}", path.display())))?;
    Ok(())
}

fn write_reconciled_sheet(
    sheet: &mut Worksheet,
    output: &ReconcileOutput,
    header_format: &Format,
) -> Result<(), XlsxError> {
    sheet.set_name(RECONCILED_SHEET)?;

    for (col, header) in output.reconciled.layout.headers().iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, header, header_format)?;
    }

    for (i, row) in output.reconciled.rows.iter().enumerate() {
        let r = (i + 1) as u32;
        let mut col: u16 = 0;
        for value in &row.join_values {
            write_value(sheet, r, col, value)?;
            col += 1;
        }
        for pair in &row.pairs {
            write_value(sheet, r, col, &pair.input)?;
            write_value(sheet, r, col + 1, &pair.output)?;
            sheet.write_string(r, col + 2, pair.status.to_string())?;
            col += 3;
        }
        sheet.write_string(r, col, row.result.to_string())?;
        sheet.write_number(r, col + 1, row.not_matched_count as f64)?;
    }

    Ok(())
}

fn write_mismatch_sheet(
    sheet: &mut Worksheet,
    output: &ReconcileOutput,
    header_format: &Format,
) -> Result<(), XlsxError> {
    sheet.set_name(MISMATCH_SHEET)?;

    sheet.write_string_with_format(0, 0, "Row Number", header_format)?;
    let key_header = format!("{}_Input", output.reconciled.layout.key_base);
    sheet.write_string_with_format(0, 1, key_header, header_format)?;
    sheet.write_string_with_format(0, 2, "Not Matched Columns", header_format)?;

    for (i, entry) in output.mismatches.iter().enumerate() {
        let r = (i + 1) as u32;
        sheet.write_number(r, 0, entry.row_number as f64)?;
        write_value(sheet, r, 1, &entry.key)?;
        sheet.write_string(r, 2, joined_fields(entry))?;
    }

    Ok(())
}

fn write_summary_sheet(
    sheet: &mut Worksheet,
    output: &ReconcileOutput,
    header_format: &Format,
) -> Result<(), XlsxError> {
    sheet.set_name(SUMMARY_SHEET)?;

    for (col, header) in ["Column", "Total Matched", "Error", "Percent Error"]
        .iter()
        .enumerate()
    {
        sheet.write_string_with_format(0, col as u16, *header, header_format)?;
    }

    for (i, stat) in output.summary.stats.iter().enumerate() {
        let r = (i + 1) as u32;
        sheet.write_string(r, 0, &stat.field)?;
        sheet.write_number(r, 1, stat.matched as f64)?;
        sheet.write_number(r, 2, stat.not_matched as f64)?;
        sheet.write_string(r, 3, stat.percent_display())?;
    }

    Ok(())
}

fn write_value(sheet: &mut Worksheet, row: u32, col: u16, value: &Value) -> Result<(), XlsxError> {
    match value {
        Value::Text(s) => {
            sheet.write_string(row, col, s)?;
        }
        Value::Number(n) => {
            sheet.write_number(row, col, *n)?;
        }
        Value::Null => {}
    }
    Ok(())
}

fn xe(e: XlsxError) -> IoError {
    IoError::Write(e.to_string())
}

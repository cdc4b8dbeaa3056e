pub mod csv;
pub mod xlsx;

use crate::config::schema::ColumnHints;
use crate::error::FerroError;
use crate::model::{Field, MineralRecord};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Rows searched for the header row.
const HEADER_SEARCH_ROWS: usize = 5;

/// A parsed record sheet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordSet {
    /// Column headers in source order.
    pub headers: Vec<String>,
    pub records: Vec<MineralRecord>,
}

/// Read a record set from a file, choosing the reader by extension
/// (`.csv` for CSV, anything else as a spreadsheet workbook).
pub fn read_records_file(path: &Path, hints: &ColumnHints) -> Result<RecordSet, FerroError> {
    let bytes = std::fs::read(path)?;
    let is_csv = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);

    if is_csv {
        csv::read_records_csv(&bytes, hints)
    } else {
        xlsx::read_records_xlsx(&bytes, hints)
    }
}

/// Resolved positions of the required columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Columns {
    quantity: usize,
    commodity: usize,
    grade: usize,
}

/// Turn raw rows (first row offset `first_row` in the source sheet, 0-based)
/// into a record set.
pub(crate) fn build_record_set(
    rows: Vec<Vec<String>>,
    first_row: usize,
    hints: &ColumnHints,
) -> Result<RecordSet, FerroError> {
    let quantity_hint = hints.quantity.to_lowercase();
    let header_idx = rows
        .iter()
        .take(HEADER_SEARCH_ROWS)
        .position(|row| {
            row.iter()
                .any(|cell| cell.to_lowercase().contains(&quantity_hint))
        })
        .ok_or_else(|| {
            FerroError::RecordSet(format!(
                "no header row with a '{}' column in the first {} rows",
                hints.quantity, HEADER_SEARCH_ROWS
            ))
        })?;

    let headers: Vec<String> = rows[header_idx]
        .iter()
        .enumerate()
        .map(|(i, h)| {
            let h = h.trim();
            if h.is_empty() {
                format!("Column {}", i + 1)
            } else {
                h.to_string()
            }
        })
        .collect();

    let columns = resolve_columns(&headers, hints)?;
    log::debug!(
        "record columns: quantity='{}', commodity='{}', grade='{}'",
        headers[columns.quantity],
        headers[columns.commodity],
        headers[columns.grade]
    );

    let mut records = Vec::new();
    let mut skipped = 0usize;
    for (offset, row) in rows.iter().enumerate().skip(header_idx + 1) {
        if row.iter().all(|c| c.trim().is_empty()) {
            skipped += 1;
            continue;
        }

        let cell = |i: usize| row.get(i).map(|s| s.trim().to_string()).unwrap_or_default();
        let fields = headers
            .iter()
            .enumerate()
            .map(|(i, h)| Field {
                header: h.clone(),
                value: cell(i),
            })
            .collect();

        records.push(MineralRecord {
            row_number: first_row + offset + 1,
            fields,
            quantity: cell(columns.quantity),
            commodity: cell(columns.commodity),
            grade: cell(columns.grade),
        });
    }

    if skipped > 0 {
        log::debug!("skipped {} empty row(s)", skipped);
    }
    if records.is_empty() {
        log::warn!("record set has a header row but no data rows");
    }

    Ok(RecordSet { headers, records })
}

fn resolve_columns(headers: &[String], hints: &ColumnHints) -> Result<Columns, FerroError> {
    let lower: Vec<String> = headers.iter().map(|h| h.to_lowercase()).collect();

    let find = |hints: &[String], taken: &[usize]| -> Option<usize> {
        hints.iter().find_map(|hint| {
            let hint = hint.to_lowercase();
            lower
                .iter()
                .enumerate()
                .find(|(i, h)| !taken.contains(i) && h.contains(&hint))
                .map(|(i, _)| i)
        })
    };

    let quantity = find(std::slice::from_ref(&hints.quantity), &[]).ok_or_else(|| {
        FerroError::RecordSet(format!("no column header contains '{}'", hints.quantity))
    })?;
    let commodity = find(&hints.commodity, &[quantity]).ok_or_else(|| {
        FerroError::RecordSet(format!(
            "no commodity column (looked for {})",
            hints.commodity.join(", ")
        ))
    })?;
    let grade = find(&hints.grade, &[quantity, commodity]).ok_or_else(|| {
        FerroError::RecordSet(format!(
            "no grade column (looked for {})",
            hints.grade.join(", ")
        ))
    })?;

    Ok(Columns {
        quantity,
        commodity,
        grade,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(v: &[&[&str]]) -> Vec<Vec<String>> {
        v.iter()
            .map(|r| r.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_header_on_first_row() {
        let set = build_record_set(
            rows(&[
                &["Sr", "Type of Ore", "Grade ( Fe%)", "Quantity (MT)"],
                &["1", "Fines", "62", "100"],
            ]),
            0,
            &ColumnHints::default(),
        )
        .unwrap();
        assert_eq!(set.records.len(), 1);
        let r = &set.records[0];
        assert_eq!(r.row_number, 2);
        assert_eq!(r.commodity, "Fines");
        assert_eq!(r.grade, "62");
        assert_eq!(r.quantity, "100");
        assert_eq!(r.fields.len(), 4);
        assert_eq!(r.fields[0].header, "Sr");
        assert_eq!(r.fields[0].value, "1");
    }

    #[test]
    fn test_header_after_title_row() {
        let set = build_record_set(
            rows(&[
                &["Dispatch register 2024-25", "", ""],
                &["Quantity", "Ore", "Grade"],
                &["10", "Lumps", "D"],
                &["", "", ""],
                &["20", "Fines", "E"],
            ]),
            0,
            &ColumnHints::default(),
        )
        .unwrap();
        assert_eq!(set.headers, vec!["Quantity", "Ore", "Grade"]);
        assert_eq!(set.records.len(), 2);
        assert_eq!(set.records[1].row_number, 5);
    }

    #[test]
    fn test_quantity_column_not_reused_for_commodity() {
        let set = build_record_set(
            rows(&[
                &["Quantity of Ore", "Mineral", "Fe Grade"],
                &["5", "Lumps", "60"],
            ]),
            0,
            &ColumnHints::default(),
        )
        .unwrap();
        assert_eq!(set.records[0].commodity, "Lumps");
        assert_eq!(set.records[0].grade, "60");
    }

    #[test]
    fn test_short_rows_are_padded() {
        let set = build_record_set(
            rows(&[&["Quantity", "Ore", "Grade", "Remarks"], &["5", "Lumps"]]),
            0,
            &ColumnHints::default(),
        )
        .unwrap();
        assert_eq!(set.records[0].grade, "");
        assert_eq!(set.records[0].fields[3].value, "");
    }

    #[test]
    fn test_missing_header_row_is_fatal() {
        let err = build_record_set(
            rows(&[&["a", "b"], &["1", "2"]]),
            0,
            &ColumnHints::default(),
        )
        .unwrap_err();
        assert!(matches!(err, FerroError::RecordSet(_)));
    }

    #[test]
    fn test_missing_grade_column_is_fatal() {
        let err = build_record_set(
            rows(&[&["Quantity", "Ore"], &["1", "Lumps"]]),
            0,
            &ColumnHints::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("grade"));
    }
}

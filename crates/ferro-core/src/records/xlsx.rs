use std::io::Cursor;

use calamine::{Data, Reader};

use crate::config::schema::ColumnHints;
use crate::error::FerroError;
use crate::records::{build_record_set, RecordSet};

/// Read the first worksheet of a spreadsheet workbook (xlsx, xls, ods) as a
/// record set.
pub fn read_records_xlsx(bytes: &[u8], hints: &ColumnHints) -> Result<RecordSet, FerroError> {
    let cursor = Cursor::new(bytes);
    let mut workbook = calamine::open_workbook_auto_from_rs(cursor)
        .map_err(|e| FerroError::RecordSet(format!("failed to open workbook: {e}")))?;

    let sheet = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| FerroError::RecordSet("workbook has no worksheets".into()))?
        .map_err(|e| FerroError::RecordSet(format!("failed to read first worksheet: {e}")))?;

    let first_row = sheet.start().map(|(row, _)| row as usize).unwrap_or(0);
    let rows: Vec<Vec<String>> = sheet
        .rows()
        .map(|row| row.iter().map(cell_as_string).collect())
        .collect();

    log::debug!("read {} worksheet row(s)", rows.len());
    build_record_set(rows, first_row, hints)
}

fn cell_as_string(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::DateTime(dt) => dt.to_string(),
        Data::Empty => String::new(),
        _ => format!("{cell}"),
    }
}

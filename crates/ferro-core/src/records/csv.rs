use crate::config::schema::ColumnHints;
use crate::error::FerroError;
use crate::records::{build_record_set, RecordSet};

/// Read a CSV record set. Rows may have differing lengths.
pub fn read_records_csv(bytes: &[u8], hints: &ColumnHints) -> Result<RecordSet, FerroError> {
    let mut reader = ::csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(record.iter().map(|s| s.trim().to_string()).collect());
    }

    log::debug!("read {} CSV row(s)", rows.len());
    build_record_set(rows, 0, hints)
}

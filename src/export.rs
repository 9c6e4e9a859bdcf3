//! CSV rendering of report tables for `/download`.

use crate::error::ApiError;
use crate::report::OutputTable;

pub const CSV_EXTENSION: &str = "csv";

/// Content type for exported tables, falling back to `text/csv`.
pub fn csv_content_type() -> String {
    mime_guess::from_ext(CSV_EXTENSION)
        .first_raw()
        .unwrap_or("text/csv")
        .to_string()
}

/// Header row from the column titles, then one record per table row.
/// Person-days are written with two decimals.
pub fn table_to_csv(table: &OutputTable) -> Result<Vec<u8>, ApiError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(table.columns.iter().map(|column| column.text.as_str()))?;
    for row in &table.rows {
        writer.write_record(row.iter().map(|cell| cell.to_string()))?;
    }
    writer
        .into_inner()
        .map_err(|err| ApiError::Export(err.error().to_string()))
}

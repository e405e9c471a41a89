//! CSV rendering
//!
//! Fields are quoted only when they contain a delimiter, quote or newline.
//! Missing cells are left empty and every record ends with `\n`.

use super::ReportRow;
use crate::error::ReportError;
use csv::{Terminator, WriterBuilder};

/// Column headers, in output order
pub const HEADERS: [&str; 7] = [
    "Submitted At",
    "Station Name",
    "Station Address",
    "Fuel Type",
    "Price",
    "User Name",
    "User Email",
];

/// Render rows with a header line; an empty report is an error
pub fn render_csv(rows: &[ReportRow]) -> Result<String, ReportError> {
    if rows.is_empty() {
        return Err(ReportError::NoData);
    }

    let mut writer = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer.write_record(HEADERS)?;
    for row in rows {
        let cells = row.cells();
        let record = cells.iter().map(|c| c.as_deref().unwrap_or(""));
        writer.write_record(record)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ReportError::Io(e.into_error()))?;
    String::from_utf8(bytes)
        .map_err(|e| ReportError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

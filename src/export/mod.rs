//! Flattening joined alert data into CSV reports.

pub mod conditions;
pub mod emails;

use std::path::Path;

use serde::Serialize;
use serde_json::Value;

use crate::error::ExportError;

pub use conditions::{CONDITIONS_HEADER, ConditionRow, condition_rows, export_conditions};
pub use emails::{
    EMAIL_DESTINATIONS_HEADER, EmailDestinationRow, email_destination_rows,
    export_email_destinations,
};

/// Render a JSON scalar the way it appears in the source payload: strings
/// verbatim, numbers and booleans as JSON text, null as an empty cell.
pub fn render_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Serialize `rows` under `header` into CSV bytes (CRLF records, minimal quoting).
pub fn to_csv_bytes<R: Serialize>(header: &[&str], rows: &[R]) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::CRLF)
        .from_writer(Vec::new());

    writer.write_record(header)?;
    for row in rows {
        writer.serialize(row)?;
    }

    writer
        .into_inner()
        .map_err(|e| ExportError::Io(std::io::Error::new(e.error().kind(), e.error().to_string())))
}

/// Write the report to `path`, replacing any existing file.
pub async fn write_report<R: Serialize>(
    path: &Path,
    header: &[&str],
    rows: &[R],
) -> Result<(), ExportError> {
    let bytes = to_csv_bytes(header, rows)?;
    tokio::fs::write(path, bytes).await?;
    tracing::info!(path = %path.display(), rows = rows.len(), "Report written");
    Ok(())
}

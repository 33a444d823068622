//! CSV serialization of submission pages.

use chrono::{DateTime, Utc};

use rsvp_core::{Rsvp, RsvpError};

/// Column header of every export.
pub const CSV_HEADER: [&str; 6] = ["Number", "Name", "Address", "Attend", "Message", "Created Date"];

const CREATED_AT_FORMAT: &str = "%Y-%m-%d %H-%M-%S";
const FILENAME_TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Serialize `rows` as CSV: the header, then one line per row numbered from 1 in page order.
pub fn write_csv(rows: &[Rsvp]) -> Result<Vec<u8>, RsvpError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER).map_err(export_error)?;

    for (i, row) in rows.iter().enumerate() {
        let number = (i + 1).to_string();
        let created = row.created_at.format(CREATED_AT_FORMAT).to_string();
        writer
            .write_record([
                number.as_str(),
                row.name.as_str(),
                row.address.as_str(),
                row.attend.label(),
                row.message.as_str(),
                created.as_str(),
            ])
            .map_err(export_error)?;
    }

    writer
        .into_inner()
        .map_err(|e| RsvpError::Export(e.to_string()))
}

/// `rsvp-<timestamp>.csv` for an export generated at `now`.
pub fn export_filename(now: DateTime<Utc>) -> String {
    format!("rsvp-{}.csv", now.format(FILENAME_TIMESTAMP_FORMAT))
}

fn export_error(err: csv::Error) -> RsvpError {
    RsvpError::Export(err.to_string())
}

//! CSV export of reservations.

use chrono::SecondsFormat;
use domain::models::ReservationStatus;
use persistence::entities::ReservationExportEntity;
use thiserror::Error;

pub const RESERVATION_CSV_HEADERS: [&str; 6] = ["ID", "User", "Space", "Start", "End", "Status"];

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to flush CSV output: {0}")]
    Flush(String),
}

/// One row per reservation; times in RFC 3339 UTC, status as its label.
pub fn reservations_csv(rows: &[ReservationExportEntity]) -> Result<Vec<u8>, ReportError> {
    let mut writer = csv::WriterBuilder::new().from_writer(Vec::new());

    writer.write_record(RESERVATION_CSV_HEADERS)?;

    for row in rows {
        let status: ReservationStatus = row.status.into();
        writer.write_record([
            row.id.to_string(),
            row.user_email.clone(),
            row.space_name.clone(),
            row.start_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            row.end_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            status.label().to_string(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|e| ReportError::Flush(e.error().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use persistence::entities::ReservationStatusDb;

    fn row(id: i64, space: &str, status: ReservationStatusDb) -> ReservationExportEntity {
        ReservationExportEntity {
            id,
            user_email: "ana@example.com".to_string(),
            space_name: space.to_string(),
            start_at: Utc.with_ymd_and_hms(2025, 3, 10, 10, 0, 0).unwrap(),
            end_at: Utc.with_ymd_and_hms(2025, 3, 10, 11, 0, 0).unwrap(),
            status,
        }
    }

    #[test]
    fn test_header_only_when_empty() {
        let bytes = reservations_csv(&[]).unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), "ID,User,Space,Start,End,Status\n");
    }

    #[test]
    fn test_rows_use_rfc3339_and_labels() {
        let bytes = reservations_csv(&[row(7, "Room A", ReservationStatusDb::Approved)]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[1],
            "7,ana@example.com,Room A,2025-03-10T10:00:00Z,2025-03-10T11:00:00Z,Approved"
        );
    }

    #[test]
    fn test_fields_with_commas_are_quoted() {
        let bytes =
            reservations_csv(&[row(1, "Hall, east wing", ReservationStatusDb::Pending)]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains("\"Hall, east wing\""));

        let mut reader = csv::Reader::from_reader(text.as_bytes());
        let record = reader.records().next().unwrap().unwrap();
        assert_eq!(&record[2], "Hall, east wing");
        assert_eq!(&record[5], "Pending");
    }
}

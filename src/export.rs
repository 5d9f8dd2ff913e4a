// CSV export of stored records, for use outside the tracker.

use std::io::Write;

use csv::Writer;

use crate::error::Result;
use crate::sessions::{MonthlyTotal, WorkSession};

/// Write sessions as CSV, one row per session, header first.
pub fn write_sessions<W: Write>(out: W, sessions: &[WorkSession]) -> Result<()> {
    let mut writer = Writer::from_writer(out);

    for session in sessions {
        writer.serialize(session)?;
    }
    writer.flush()?;

    Ok(())
}

/// Write the per-month aggregate rows as CSV.
pub fn write_monthly_totals<W: Write>(out: W, totals: &[MonthlyTotal]) -> Result<()> {
    let mut writer = Writer::from_writer(out);

    for total in totals {
        writer.serialize(total)?;
    }
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::sessions::SessionStore;
    use chrono::{NaiveDate, NaiveTime};

    fn sample_store(conn: &rusqlite::Connection) -> SessionStore<'_> {
        let store = SessionStore::new(conn);
        store
            .create(
                NaiveDate::from_ymd_opt(2026, 8, 3).unwrap(),
                NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
                NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
                9000.0,
            )
            .unwrap();
        store
            .create(
                NaiveDate::from_ymd_opt(2026, 7, 1).unwrap(),
                NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
                NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
                9000.0,
            )
            .unwrap();
        store
    }

    #[test]
    fn sessions_csv_has_header_plus_one_row_each() {
        let conn = db::open_in_memory().unwrap();
        let store = sample_store(&conn);

        let mut buf = Vec::new();
        write_sessions(&mut buf, &store.all().unwrap()).unwrap();

        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("id,date,start,end,salary"));
        assert!(lines[1].contains("2026-08-03"));
        assert!(lines[1].contains("540"));
        assert!(lines[1].contains("450"));
    }

    #[test]
    fn monthly_totals_csv_round_out_the_report() {
        let conn = db::open_in_memory().unwrap();
        let store = sample_store(&conn);

        let mut buf = Vec::new();
        write_monthly_totals(&mut buf, &store.monthly_totals().unwrap()).unwrap();

        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "month,total_minutes,total_pay");
        assert!(lines[1].starts_with("2026-08,"));
        assert!(lines[2].starts_with("2026-07,"));
    }
}

// ⏱️ Session Store - persistent collection of worked intervals
// Each row carries its inputs (date, times, salary) plus the derived
// duration/pay, recomputed through the pay calculator on every write.

use chrono::{NaiveDate, NaiveTime};
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, TrackerError};
use crate::pay;

pub(crate) const DATE_FMT: &str = "%Y-%m-%d";
pub(crate) const TIME_FMT: &str = "%H:%M";

// ============================================================================
// MONTH KEY
// ============================================================================

/// Calendar-month grouping key, canonical text form `YYYY-MM`.
///
/// Derived from a date by truncation; sorts lexicographically in calendar
/// order, which the descending aggregate queries rely on.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MonthKey(String);

impl MonthKey {
    pub fn from_date(date: NaiveDate) -> Self {
        MonthKey(date.format("%Y-%m").to_string())
    }

    /// Accepts caller-supplied keys in `YYYY-MM` form only.
    pub fn parse(raw: &str) -> Option<Self> {
        let bytes = raw.as_bytes();
        if bytes.len() != 7 || bytes[4] != b'-' {
            return None;
        }
        if !bytes[..4].iter().all(|b| b.is_ascii_digit())
            || !bytes[5..].iter().all(|b| b.is_ascii_digit())
        {
            return None;
        }
        match raw[5..].parse::<u8>() {
            Ok(month) if (1..=12).contains(&month) => Some(MonthKey(raw.to_string())),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MonthKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// WORK SESSION
// ============================================================================

/// One recorded work interval with its salary context and derived pay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkSession {
    pub id: i64,
    pub date: NaiveDate,
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub salary: f64,
    pub duration_minutes: i64,
    pub pay: f64,
}

impl WorkSession {
    /// The month this session aggregates into.
    pub fn month(&self) -> MonthKey {
        MonthKey::from_date(self.date)
    }
}

/// Aggregate row of `monthly_totals`: one distinct month of stored sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTotal {
    pub month: MonthKey,
    pub total_minutes: i64,
    pub total_pay: f64,
}

// ============================================================================
// SESSION STORE
// ============================================================================

const SESSION_COLUMNS: &str = "id, date, start_time, end_time, salary, duration_minutes, pay";

/// Repository for work sessions.
///
/// Borrows the open connection; every mutation is a single statement,
/// committed before the call returns, so readers always observe the latest
/// state.
pub struct SessionStore<'c> {
    conn: &'c Connection,
}

impl<'c> SessionStore<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        SessionStore { conn }
    }

    /// Persist a new session. Runs the pay calculator first; nothing is
    /// written when validation fails.
    pub fn create(
        &self,
        date: NaiveDate,
        start: NaiveTime,
        end: NaiveTime,
        salary: f64,
    ) -> Result<i64> {
        let breakdown = pay::compute(salary, start, end)?;

        self.conn.execute(
            "INSERT INTO sessions (date, start_time, end_time, salary, duration_minutes, pay)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                date.format(DATE_FMT).to_string(),
                start.format(TIME_FMT).to_string(),
                end.format(TIME_FMT).to_string(),
                salary,
                breakdown.duration_minutes,
                breakdown.pay,
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        debug!(id, date = %date, minutes = breakdown.duration_minutes, "session created");

        Ok(id)
    }

    /// Replace every field of an existing session, derived fields included.
    pub fn update(
        &self,
        id: i64,
        date: NaiveDate,
        start: NaiveTime,
        end: NaiveTime,
        salary: f64,
    ) -> Result<()> {
        let breakdown = pay::compute(salary, start, end)?;

        let changed = self.conn.execute(
            "UPDATE sessions
             SET date = ?1, start_time = ?2, end_time = ?3,
                 salary = ?4, duration_minutes = ?5, pay = ?6
             WHERE id = ?7",
            params![
                date.format(DATE_FMT).to_string(),
                start.format(TIME_FMT).to_string(),
                end.format(TIME_FMT).to_string(),
                salary,
                breakdown.duration_minutes,
                breakdown.pay,
                id,
            ],
        )?;

        if changed == 0 {
            return Err(TrackerError::NotFound(id));
        }

        debug!(id, "session updated");
        Ok(())
    }

    pub fn delete(&self, id: i64) -> Result<()> {
        let changed = self
            .conn
            .execute("DELETE FROM sessions WHERE id = ?1", [id])?;

        if changed == 0 {
            return Err(TrackerError::NotFound(id));
        }

        debug!(id, "session deleted");
        Ok(())
    }

    /// Read one session back by id.
    pub fn get(&self, id: i64) -> Result<WorkSession> {
        let query = format!("SELECT {SESSION_COLUMNS} FROM sessions WHERE id = ?1");

        self.conn
            .query_row(&query, [id], row_to_session)
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => TrackerError::NotFound(id),
                other => TrackerError::Storage(other),
            })
    }

    /// All sessions of one calendar month, newest date first.
    ///
    /// Serves both the current-period view and the per-month drill-down of
    /// historical reports.
    pub fn sessions_for_month(&self, month: &MonthKey) -> Result<Vec<WorkSession>> {
        let query = format!(
            "SELECT {SESSION_COLUMNS} FROM sessions
             WHERE strftime('%Y-%m', date) = ?1
             ORDER BY date DESC, id DESC"
        );

        let mut stmt = self.conn.prepare(&query)?;
        let sessions = stmt
            .query_map([month.as_str()], row_to_session)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(sessions)
    }

    /// One aggregate row per distinct month present in storage, newest first.
    pub fn monthly_totals(&self) -> Result<Vec<MonthlyTotal>> {
        let mut stmt = self.conn.prepare(
            "SELECT strftime('%Y-%m', date) AS month, SUM(duration_minutes), SUM(pay)
             FROM sessions
             GROUP BY month
             ORDER BY month DESC",
        )?;

        let totals = stmt
            .query_map([], |row| {
                Ok(MonthlyTotal {
                    month: MonthKey(row.get(0)?),
                    total_minutes: row.get(1)?,
                    total_pay: row.get(2)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(totals)
    }

    /// Every stored session, newest date first. Used by the CSV export.
    pub fn all(&self) -> Result<Vec<WorkSession>> {
        let query = format!("SELECT {SESSION_COLUMNS} FROM sessions ORDER BY date DESC, id DESC");

        let mut stmt = self.conn.prepare(&query)?;
        let sessions = stmt
            .query_map([], row_to_session)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(sessions)
    }

    pub fn count(&self) -> Result<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM sessions", [], |row| row.get(0))?;

        Ok(count)
    }

    /// Sum of pay over every stored session; the earned half of the balance.
    pub fn total_pay(&self) -> Result<f64> {
        let total = self
            .conn
            .query_row("SELECT COALESCE(SUM(pay), 0) FROM sessions", [], |row| {
                row.get(0)
            })?;

        Ok(total)
    }
}

// ============================================================================
// ROW MAPPING
// ============================================================================

fn row_to_session(row: &Row<'_>) -> rusqlite::Result<WorkSession> {
    let date: String = row.get(1)?;
    let start: String = row.get(2)?;
    let end: String = row.get(3)?;

    Ok(WorkSession {
        id: row.get(0)?,
        date: parse_date_column(1, &date)?,
        start: parse_time_column(2, &start)?,
        end: parse_time_column(3, &end)?,
        salary: row.get(4)?,
        duration_minutes: row.get(5)?,
        pay: row.get(6)?,
    })
}

fn parse_date_column(idx: usize, raw: &str) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, DATE_FMT).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn parse_time_column(idx: usize, raw: &str) -> rusqlite::Result<NaiveTime> {
    NaiveTime::parse_from_str(raw, TIME_FMT).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

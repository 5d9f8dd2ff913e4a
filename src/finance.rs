// 💰 Finance Ledger - manual contributions and withdrawals
// Amounts are stored positive; sign semantics live in the balance
// derivation only (contribution adds, withdrawal subtracts).

use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, TrackerError};
use crate::sessions::DATE_FMT;

// ============================================================================
// ENTRY KIND
// ============================================================================

/// Discriminator for a manual ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Contribution,
    Withdrawal,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Contribution => "contribution",
            EntryKind::Withdrawal => "withdrawal",
        }
    }
}

// ============================================================================
// FINANCE ENTRY
// ============================================================================

/// One manual ledger transaction. Immutable after recording, apart from
/// deletion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinanceEntry {
    pub id: i64,
    pub kind: EntryKind,
    pub amount: f64,
    pub date: NaiveDate,
}

// ============================================================================
// FINANCE LEDGER
// ============================================================================

/// Repository for finance entries, independent of the session table.
pub struct FinanceLedger<'c> {
    conn: &'c Connection,
}

impl<'c> FinanceLedger<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        FinanceLedger { conn }
    }

    /// Record one entry. Nothing is persisted unless the amount is a
    /// positive finite number.
    pub fn record(&self, kind: EntryKind, amount: f64, date: NaiveDate) -> Result<i64> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(TrackerError::InvalidAmount(amount));
        }

        self.conn.execute(
            "INSERT INTO finance (kind, amount, date) VALUES (?1, ?2, ?3)",
            params![kind.as_str(), amount, date.format(DATE_FMT).to_string()],
        )?;

        let id = self.conn.last_insert_rowid();
        debug!(id, kind = kind.as_str(), amount, "finance entry recorded");

        Ok(id)
    }

    /// Sum of all amounts of one kind; 0 when the ledger has none.
    pub fn sum_by_kind(&self, kind: EntryKind) -> Result<f64> {
        let sum = self.conn.query_row(
            "SELECT COALESCE(SUM(amount), 0) FROM finance WHERE kind = ?1",
            [kind.as_str()],
            |row| row.get(0),
        )?;

        Ok(sum)
    }

    pub fn delete(&self, id: i64) -> Result<()> {
        let changed = self
            .conn
            .execute("DELETE FROM finance WHERE id = ?1", [id])?;

        if changed == 0 {
            return Err(TrackerError::NotFound(id));
        }

        debug!(id, "finance entry deleted");
        Ok(())
    }

    /// Every entry, newest first.
    pub fn entries(&self) -> Result<Vec<FinanceEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, kind, amount, date FROM finance ORDER BY date DESC, id DESC",
        )?;

        let entries = stmt
            .query_map([], row_to_entry)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(entries)
    }
}

fn row_to_entry(row: &Row<'_>) -> rusqlite::Result<FinanceEntry> {
    let kind: String = row.get(1)?;
    let date: String = row.get(3)?;

    Ok(FinanceEntry {
        id: row.get(0)?,
        kind: parse_kind_column(1, &kind)?,
        amount: row.get(2)?,
        date: NaiveDate::parse_from_str(&date, DATE_FMT).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
        })?,
    })
}

fn parse_kind_column(idx: usize, raw: &str) -> rusqlite::Result<EntryKind> {
    match raw {
        "contribution" => Ok(EntryKind::Contribution),
        "withdrawal" => Ok(EntryKind::Withdrawal),
        other => Err(rusqlite::Error::FromSqlConversionFailure(
            idx,
            rusqlite::types::Type::Text,
            format!("unknown entry kind: {other}").into(),
        )),
    }
}

// Typed failures for the overtime ledger core.
// Validation failures are local and non-fatal; storage failures propagate.

use chrono::NaiveTime;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackerError {
    /// Required input absent; surfaced before any persistence is attempted.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// Amount or salary that is not a positive finite number.
    #[error("amount must be a positive number, got {0}")]
    InvalidAmount(f64),

    /// End time not strictly after start time (same-day intervals only).
    #[error("end time {end} is not after start time {start}")]
    InvalidInterval { start: NaiveTime, end: NaiveTime },

    /// Update/delete/read referencing an id that is not in the store.
    #[error("no record with id {0}")]
    NotFound(i64),

    /// Underlying SQLite failure. Propagated to the caller, never swallowed.
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// Filesystem failure while opening the database or exporting.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV serialization failure during export.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, TrackerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_offending_input() {
        let err = TrackerError::MissingField("salary");
        assert_eq!(err.to_string(), "missing required field: salary");

        let err = TrackerError::NotFound(7);
        assert_eq!(err.to_string(), "no record with id 7");

        let err = TrackerError::InvalidAmount(-3.0);
        assert_eq!(err.to_string(), "amount must be a positive number, got -3");
    }
}

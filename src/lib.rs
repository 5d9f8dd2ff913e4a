// Overtime Ledger - Core Library
// Pay calculation, session storage, finance ledger, and on-demand
// aggregation. The CLI binary and the tests are callers of these contracts.

pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod finance;
pub mod pay;
pub mod reports;
pub mod sessions;

// Re-export commonly used types
pub use db::{open_database, open_in_memory, setup_database};
pub use error::{Result, TrackerError};
pub use export::{write_monthly_totals, write_sessions};
pub use finance::{EntryKind, FinanceEntry, FinanceLedger};
pub use pay::{compute, PayBreakdown, OVERTIME_MULTIPLIER};
pub use reports::{
    current_period_summary, grand_total, history, month_summary, MonthHistory, Summary,
};
pub use sessions::{MonthKey, MonthlyTotal, SessionStore, WorkSession};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

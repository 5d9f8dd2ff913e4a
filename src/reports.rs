// 📊 Reports - on-demand aggregation and balance derivation
// Every function recomputes fully from stored state; there is no cached
// total to invalidate after a mutation.

use chrono::Local;
use serde::Serialize;

use crate::error::Result;
use crate::finance::{EntryKind, FinanceLedger};
use crate::sessions::{MonthKey, MonthlyTotal, SessionStore, WorkSession};

/// Aggregated totals for one calendar month of sessions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub total_minutes: i64,
    pub total_pay: f64,
}

/// One month of history: the aggregate row plus its session drill-down.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthHistory {
    pub totals: MonthlyTotal,
    pub sessions: Vec<WorkSession>,
}

/// Totals over all sessions of the given month.
pub fn month_summary(sessions: &SessionStore<'_>, month: &MonthKey) -> Result<Summary> {
    let rows = sessions.sessions_for_month(month)?;

    let total_minutes = rows.iter().map(|s| s.duration_minutes).sum();
    let total_pay = rows.iter().map(|s| s.pay).sum();

    Ok(Summary {
        total_minutes,
        total_pay,
    })
}

/// Totals over the current local calendar month.
pub fn current_period_summary(sessions: &SessionStore<'_>) -> Result<Summary> {
    let today = Local::now().date_naive();
    month_summary(sessions, &MonthKey::from_date(today))
}

/// Net amount currently owed: all session pay, plus contributions, minus
/// withdrawals. A negative result means the balance is overdrawn.
pub fn grand_total(sessions: &SessionStore<'_>, ledger: &FinanceLedger<'_>) -> Result<f64> {
    let earned = sessions.total_pay()?;
    let contributed = ledger.sum_by_kind(EntryKind::Contribution)?;
    let withdrawn = ledger.sum_by_kind(EntryKind::Withdrawal)?;

    Ok(earned + contributed - withdrawn)
}

/// Full per-month history, newest month first, each with its sessions.
pub fn history(sessions: &SessionStore<'_>) -> Result<Vec<MonthHistory>> {
    let mut months = Vec::new();

    for totals in sessions.monthly_totals()? {
        let rows = sessions.sessions_for_month(&totals.month)?;
        months.push(MonthHistory {
            totals,
            sessions: rows,
        });
    }

    Ok(months)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use chrono::{NaiveDate, NaiveTime};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn month_summary_sums_only_that_month() {
        let conn = db::open_in_memory().unwrap();
        let store = SessionStore::new(&conn);

        store
            .create(date(2026, 8, 3), time(9, 0), time(18, 0), 9000.0)
            .unwrap();
        store
            .create(date(2026, 8, 10), time(9, 0), time(11, 0), 9000.0)
            .unwrap();
        store
            .create(date(2026, 7, 1), time(9, 0), time(18, 0), 9000.0)
            .unwrap();

        let summary = month_summary(&store, &MonthKey::parse("2026-08").unwrap()).unwrap();

        assert_eq!(summary.total_minutes, 540 + 120);
        assert_eq!(summary.total_pay, 450.0 + 100.0);
    }

    #[test]
    fn month_summary_of_empty_month_is_zero() {
        let conn = db::open_in_memory().unwrap();
        let store = SessionStore::new(&conn);

        let summary = month_summary(&store, &MonthKey::parse("2026-01").unwrap()).unwrap();

        assert_eq!(summary.total_minutes, 0);
        assert_eq!(summary.total_pay, 0.0);
    }

    #[test]
    fn grand_total_is_zero_on_empty_stores() {
        let conn = db::open_in_memory().unwrap();
        let store = SessionStore::new(&conn);
        let ledger = FinanceLedger::new(&conn);

        assert_eq!(grand_total(&store, &ledger).unwrap(), 0.0);
    }

    #[test]
    fn withdrawal_alone_drives_balance_negative() {
        let conn = db::open_in_memory().unwrap();
        let store = SessionStore::new(&conn);
        let ledger = FinanceLedger::new(&conn);

        ledger
            .record(EntryKind::Withdrawal, 100.0, date(2026, 8, 5))
            .unwrap();

        assert_eq!(grand_total(&store, &ledger).unwrap(), -100.0);
    }

    #[test]
    fn grand_total_tracks_every_mutation() {
        let conn = db::open_in_memory().unwrap();
        let store = SessionStore::new(&conn);
        let ledger = FinanceLedger::new(&conn);

        let id = store
            .create(date(2026, 8, 3), time(9, 0), time(18, 0), 9000.0)
            .unwrap();
        assert_eq!(grand_total(&store, &ledger).unwrap(), 450.0);

        let contribution = ledger
            .record(EntryKind::Contribution, 200.0, date(2026, 8, 4))
            .unwrap();
        assert_eq!(grand_total(&store, &ledger).unwrap(), 650.0);

        ledger
            .record(EntryKind::Withdrawal, 500.0, date(2026, 8, 5))
            .unwrap();
        assert_eq!(grand_total(&store, &ledger).unwrap(), 150.0);

        // Halve the session to 4.5 hours
        store
            .update(id, date(2026, 8, 3), time(9, 0), time(13, 30), 9000.0)
            .unwrap();
        assert_eq!(grand_total(&store, &ledger).unwrap(), 225.0 + 200.0 - 500.0);

        ledger.delete(contribution).unwrap();
        assert_eq!(grand_total(&store, &ledger).unwrap(), 225.0 - 500.0);

        store.delete(id).unwrap();
        assert_eq!(grand_total(&store, &ledger).unwrap(), -500.0);

        println!("✅ Balance consistent after every mutation");
    }

    #[test]
    fn history_matches_totals_and_drilldowns() {
        let conn = db::open_in_memory().unwrap();
        let store = SessionStore::new(&conn);

        store
            .create(date(2026, 8, 3), time(9, 0), time(18, 0), 9000.0)
            .unwrap();
        store
            .create(date(2026, 6, 20), time(9, 0), time(10, 0), 6000.0)
            .unwrap();
        store
            .create(date(2026, 6, 2), time(14, 0), time(16, 0), 6000.0)
            .unwrap();

        let months = history(&store).unwrap();
        let totals = store.monthly_totals().unwrap();

        assert_eq!(months.len(), totals.len());

        for (entry, expected) in months.iter().zip(&totals) {
            assert_eq!(&entry.totals, expected);
            assert_eq!(
                entry.sessions,
                store.sessions_for_month(&expected.month).unwrap()
            );
        }

        // Newest month leads, drill-down is newest date first
        assert_eq!(months[0].totals.month.as_str(), "2026-08");
        assert_eq!(months[1].sessions[0].date, date(2026, 6, 20));
    }
}

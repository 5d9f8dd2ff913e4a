// Thin command-line driver over the overtime ledger library.
// Parses primitive arguments, calls the store contracts, prints results.

use std::env;
use std::fs::File;

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate, NaiveTime};
use tracing_subscriber::EnvFilter;

use overtime_ledger::{
    config, grand_total, history, month_summary, open_database, EntryKind, FinanceLedger,
    MonthKey, SessionStore, TrackerError,
};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();

    let Some(command) = args.get(1).map(String::as_str) else {
        print_usage();
        return Ok(());
    };

    let db_path = config::database_path(None);
    let conn = open_database(&db_path)?;
    let sessions = SessionStore::new(&conn);
    let ledger = FinanceLedger::new(&conn);

    match command {
        "add" => cmd_add(&sessions, &args[2..]),
        "edit" => cmd_edit(&sessions, &args[2..]),
        "remove" => cmd_remove(&sessions, &args[2..]),
        "month" => cmd_month(&sessions, &args[2..]),
        "report" => cmd_report(&sessions, &ledger, &args[2..]),
        "contribute" => cmd_finance(&ledger, EntryKind::Contribution, &args[2..]),
        "withdraw" => cmd_finance(&ledger, EntryKind::Withdrawal, &args[2..]),
        "ledger" => cmd_ledger(&ledger),
        "export" => cmd_export(&sessions, &args[2..]),
        _ => {
            print_usage();
            Ok(())
        }
    }
}

// ============================================================================
// SESSION COMMANDS
// ============================================================================

fn cmd_add(sessions: &SessionStore<'_>, args: &[String]) -> Result<()> {
    let date = parse_date(arg(args, 0, "date")?)?;
    let start = parse_time(arg(args, 1, "start")?)?;
    let end = parse_time(arg(args, 2, "end")?)?;
    let salary = parse_amount(arg(args, 3, "salary")?);

    let id = sessions.create(date, start, end, salary)?;
    let session = sessions.get(id)?;

    println!(
        "✓ Session {} saved: {} {}–{}  {}  {:.2}",
        id,
        session.date,
        session.start.format("%H:%M"),
        session.end.format("%H:%M"),
        format_minutes(session.duration_minutes),
        session.pay,
    );

    Ok(())
}

fn cmd_edit(sessions: &SessionStore<'_>, args: &[String]) -> Result<()> {
    let id = parse_id(arg(args, 0, "id")?)?;
    let date = parse_date(arg(args, 1, "date")?)?;
    let start = parse_time(arg(args, 2, "start")?)?;
    let end = parse_time(arg(args, 3, "end")?)?;
    let salary = parse_amount(arg(args, 4, "salary")?);

    sessions.update(id, date, start, end, salary)?;
    let session = sessions.get(id)?;

    println!(
        "✓ Session {} updated: {} {:.2}",
        id,
        format_minutes(session.duration_minutes),
        session.pay
    );

    Ok(())
}

fn cmd_remove(sessions: &SessionStore<'_>, args: &[String]) -> Result<()> {
    let id = parse_id(arg(args, 0, "id")?)?;
    sessions.delete(id)?;
    println!("✓ Session {id} removed");

    Ok(())
}

fn cmd_month(sessions: &SessionStore<'_>, args: &[String]) -> Result<()> {
    let month = match args.first() {
        Some(raw) => MonthKey::parse(raw)
            .with_context(|| format!("'{raw}' is not a YYYY-MM month"))?,
        None => MonthKey::from_date(Local::now().date_naive()),
    };

    for session in sessions.sessions_for_month(&month)? {
        println!(
            "{:>4}  {}  {}–{}  {:>8}  {:>10.2}",
            session.id,
            session.date,
            session.start.format("%H:%M"),
            session.end.format("%H:%M"),
            format_minutes(session.duration_minutes),
            session.pay,
        );
    }

    let summary = month_summary(sessions, &month)?;
    println!(
        "\n{}: {}  {:.2}",
        month,
        format_minutes(summary.total_minutes),
        summary.total_pay
    );

    Ok(())
}

// ============================================================================
// REPORTS
// ============================================================================

fn cmd_report(
    sessions: &SessionStore<'_>,
    ledger: &FinanceLedger<'_>,
    args: &[String],
) -> Result<()> {
    let total = grand_total(sessions, ledger)?;

    if args.iter().any(|a| a == "--json") {
        let report = serde_json::json!({
            "months": history(sessions)?,
            "grand_total": total,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    for month in sessions.monthly_totals()? {
        println!(
            "{}  {:>9}  {:>12.2}",
            month.month,
            format_minutes(month.total_minutes),
            month.total_pay
        );
    }

    println!("\n💰 Grand total: {total:.2}");

    Ok(())
}

fn cmd_ledger(ledger: &FinanceLedger<'_>) -> Result<()> {
    for entry in ledger.entries()? {
        let sign = match entry.kind {
            EntryKind::Contribution => '+',
            EntryKind::Withdrawal => '-',
        };
        println!(
            "{:>4}  {}  {}{:.2}  ({})",
            entry.id,
            entry.date,
            sign,
            entry.amount,
            entry.kind.as_str()
        );
    }

    println!(
        "\ncontributions {:.2}  withdrawals {:.2}",
        ledger.sum_by_kind(EntryKind::Contribution)?,
        ledger.sum_by_kind(EntryKind::Withdrawal)?
    );

    Ok(())
}

// ============================================================================
// FINANCE & EXPORT
// ============================================================================

fn cmd_finance(ledger: &FinanceLedger<'_>, kind: EntryKind, args: &[String]) -> Result<()> {
    let amount = parse_amount(arg(args, 0, "amount")?);
    let date = match args.get(1) {
        Some(raw) => parse_date(raw)?,
        None => Local::now().date_naive(),
    };

    let id = ledger.record(kind, amount, date)?;
    println!("✓ {} {amount:.2} recorded as entry {id}", kind.as_str());

    Ok(())
}

fn cmd_export(sessions: &SessionStore<'_>, args: &[String]) -> Result<()> {
    let target = arg(args, 0, "target")?;
    let path = arg(args, 1, "path")?;
    let file = File::create(path).with_context(|| format!("cannot create {path}"))?;

    match target {
        "sessions" => {
            let rows = sessions.all()?;
            overtime_ledger::write_sessions(file, &rows)?;
            println!("✓ Exported {} sessions to {path}", rows.len());
        }
        "months" => {
            let rows = sessions.monthly_totals()?;
            overtime_ledger::write_monthly_totals(file, &rows)?;
            println!("✓ Exported {} months to {path}", rows.len());
        }
        other => bail!("unknown export target '{other}' (use sessions or months)"),
    }

    Ok(())
}

// ============================================================================
// ARGUMENT PARSING
// ============================================================================

fn arg<'a>(
    args: &'a [String],
    idx: usize,
    name: &'static str,
) -> std::result::Result<&'a str, TrackerError> {
    args.get(idx)
        .map(String::as_str)
        .ok_or(TrackerError::MissingField(name))
}

fn parse_id(raw: &str) -> Result<i64> {
    raw.parse().with_context(|| format!("'{raw}' is not an id"))
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("'{raw}' is not a YYYY-MM-DD date"))
}

fn parse_time(raw: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(raw, "%H:%M")
        .with_context(|| format!("'{raw}' is not an HH:MM time"))
}

// Non-numeric text becomes NaN here and is rejected by the stores as an
// invalid amount, so the caller always gets the typed failure.
fn parse_amount(raw: &str) -> f64 {
    raw.parse().unwrap_or(f64::NAN)
}

fn format_minutes(minutes: i64) -> String {
    format!("{}h {:02}m", minutes / 60, minutes % 60)
}

fn print_usage() {
    println!("overtime-ledger {}", overtime_ledger::VERSION);
    println!();
    println!("Usage:");
    println!("  overtime-ledger add <date> <start> <end> <salary>");
    println!("  overtime-ledger edit <id> <date> <start> <end> <salary>");
    println!("  overtime-ledger remove <id>");
    println!("  overtime-ledger month [YYYY-MM]");
    println!("  overtime-ledger report [--json]");
    println!("  overtime-ledger contribute <amount> [date]");
    println!("  overtime-ledger withdraw <amount> [date]");
    println!("  overtime-ledger ledger");
    println!("  overtime-ledger export <sessions|months> <path>");
    println!();
    println!("Dates are YYYY-MM-DD, times are HH:MM.");
    println!("Database: {}", config::database_path(None).display());
}

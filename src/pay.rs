// 🕐 Pay Calculator - overtime pay from a monthly salary
// Pure arithmetic, no I/O. The derived fields stored on every session
// (duration_minutes, pay) come from here and only from here.

use chrono::NaiveTime;

use crate::error::{Result, TrackerError};

// ============================================================================
// DOMAIN CONSTANTS
// ============================================================================

/// Fixed overtime multiplier applied to the per-minute rate.
pub const OVERTIME_MULTIPLIER: f64 = 1.5;

/// Nominal days worked per salary month.
pub const MONTH_DAYS: f64 = 30.0;

/// Nominal work hours per day.
pub const WORK_HOURS_PER_DAY: f64 = 9.0;

// ============================================================================
// CALCULATION
// ============================================================================

/// Derived fields of one work session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PayBreakdown {
    pub duration_minutes: i64,
    pub pay: f64,
}

/// Compute duration and overtime pay for one same-day interval.
///
/// The hourly rate is derived from the monthly salary as
/// `salary / 30 / 9`, taken per minute and multiplied by the fixed
/// overtime factor.
pub fn compute(salary: f64, start: NaiveTime, end: NaiveTime) -> Result<PayBreakdown> {
    if end <= start {
        return Err(TrackerError::InvalidInterval { start, end });
    }
    if !salary.is_finite() || salary <= 0.0 {
        return Err(TrackerError::InvalidAmount(salary));
    }

    let duration_minutes = (end - start).num_minutes();
    let per_minute_rate = salary / MONTH_DAYS / WORK_HOURS_PER_DAY / 60.0;
    let pay = per_minute_rate * duration_minutes as f64 * OVERTIME_MULTIPLIER;

    Ok(PayBreakdown {
        duration_minutes,
        pay,
    })
}

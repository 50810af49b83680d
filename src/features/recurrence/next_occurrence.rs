//! Next-occurrence calendar arithmetic
//!
//! Pure civil-time computation of the next fire instant for a recurrence
//! rule. All math is on [`NaiveDateTime`] against a single server clock; no
//! timezone conversion happens anywhere in this module.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.2.0

use chrono::{Datelike, Days, Duration, NaiveDate, NaiveDateTime};

use super::rule::Recurrence;

/// Reminders fire at 09:00 civil time on the target day.
pub const FIRE_HOUR: u32 = 9;
/// Minute component of the fixed fire time.
pub const FIRE_MINUTE: u32 = 0;

/// Hours deferred when no calendar rule applies (`Once`, corrupt rows).
const FALLBACK_HOURS: i64 = 24;

/// Compute the next fire instant for `rule`, strictly later than `now`.
///
/// A candidate equal to `now` is never returned; it rolls to the following
/// period. Month-relative day parameters are re-clamped against each target
/// month's length, so `Monthly(31)` fires on Feb 28/29 and back on day 31 in
/// months that have one.
pub fn next_occurrence(rule: &Recurrence, now: NaiveDateTime) -> NaiveDateTime {
    let computed = match rule {
        Recurrence::Monthly { day } => next_monthly(*day, now),
        Recurrence::Quarterly { week } => next_quarterly(*week, now),
        Recurrence::Annually { month } => next_annually(*month, now),
        Recurrence::Once => None,
    };
    computed.unwrap_or_else(|| fallback_occurrence(now))
}

/// Last-resort schedule: 24 hours from `now`.
///
/// Used for the non-recurring `Once` form and by callers recovering from a
/// malformed stored rule.
pub fn fallback_occurrence(now: NaiveDateTime) -> NaiveDateTime {
    now + Duration::hours(FALLBACK_HOURS)
}

fn next_monthly(day: u32, now: NaiveDateTime) -> Option<NaiveDateTime> {
    let (year, month) = (now.year(), now.month());
    let candidate = at_fire_time(year, month, day.min(days_in_month(year, month)))?;
    if candidate > now {
        return Some(candidate);
    }

    let (year, month) = roll_month(year, month);
    at_fire_time(year, month, day.min(days_in_month(year, month)))
}

fn next_quarterly(week: u32, now: NaiveDateTime) -> Option<NaiveDateTime> {
    // Day-of-quarter: week 1 -> day 1, week 2 -> day 8, ...
    let offset_days = u64::from(week.saturating_sub(1)) * 7;
    let year = now.year();
    let start_month = ((now.month() - 1) / 3) * 3 + 1;

    let candidate = quarter_candidate(year, start_month, offset_days)?;
    if candidate > now {
        return Some(candidate);
    }

    // Q4 wraps to Q1 of the following year.
    let (year, start_month) = if start_month == 10 {
        (year + 1, 1)
    } else {
        (year, start_month + 3)
    };
    quarter_candidate(year, start_month, offset_days)
}

fn next_annually(month: u32, now: NaiveDateTime) -> Option<NaiveDateTime> {
    let candidate = at_fire_time(now.year(), month, 1)?;
    if candidate > now {
        return Some(candidate);
    }
    at_fire_time(now.year() + 1, month, 1)
}

fn quarter_candidate(year: i32, start_month: u32, offset_days: u64) -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(year, start_month, 1)?
        .checked_add_days(Days::new(offset_days))?
        .and_hms_opt(FIRE_HOUR, FIRE_MINUTE, 0)
}

fn at_fire_time(year: i32, month: u32, day: u32) -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(FIRE_HOUR, FIRE_MINUTE, 0)
}

fn roll_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = roll_month(year, month);
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
        .unwrap_or(28)
}

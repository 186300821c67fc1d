//! Finance calendar primitives.
//!
//! The business week runs Thursday through Wednesday, not Sunday through
//! Saturday. Every caller (ingestion, aggregation, allocation) derives week
//! boundaries from this module so the rule lives in exactly one place.

use crate::schema::FinanceWeek;
use chrono::{Datelike, Days, NaiveDate};

/// Returns the most recent Thursday on or before `date`.
///
/// Weekday indexing is Sun=0..Sat=6: Thu/Fri/Sat reach back `weekday - 4`
/// days, Sun..Wed wrap to the previous Thursday via `weekday + 3`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let weekday = date.weekday().num_days_from_sunday();
    let offset = if weekday >= 4 {
        weekday - 4
    } else {
        weekday + 3
    };
    date - Days::new(offset as u64)
}

/// Returns the Wednesday closing the finance week containing `date`
/// (inclusive end).
pub fn week_end(date: NaiveDate) -> NaiveDate {
    week_start(date) + Days::new(6)
}

/// Returns the finance week containing `date`.
pub fn week_of(date: NaiveDate) -> FinanceWeek {
    let start = week_start(date);
    FinanceWeek {
        start,
        end: start + Days::new(6),
    }
}

pub fn days_in_month(date: NaiveDate) -> u32 {
    last_day_of_month(date.year(), date.month()).day()
}

/// Day-of-month of `date`, 1-based (the 15th yields 15).
///
/// Deliberately unclamped: callers must ensure `date` falls inside the
/// month being aggregated. `pacing::pacing_for_month` enforces that.
pub fn days_accounted(date: NaiveDate) -> u32 {
    date.day()
}

pub fn last_day_of_month(year: i32, month: u32) -> NaiveDate {
    let next_month = if month == 12 { 1 } else { month + 1 };
    let next_year = if month == 12 { year + 1 } else { year };

    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .unwrap()
        .checked_sub_days(Days::new(1))
        .unwrap()
}

pub fn first_thursday_on_or_after(date: NaiveDate) -> NaiveDate {
    let weekday = date.weekday().num_days_from_sunday();
    let offset = if weekday <= 4 {
        4 - weekday
    } else {
        11 - weekday
    };
    date + Days::new(offset as u64)
}

/// Generates every finance week whose Thursday start lies in
/// `[first_thursday_on_or_after(start), end]`, stepping 7 days at a time.
///
/// Weeks are contiguous, non-overlapping, and strictly increasing. If
/// `start` is not itself a Thursday, the days before the first generated
/// week belong to no week; flat-fee allocation excludes them.
pub fn finance_weeks_between(start: NaiveDate, end: NaiveDate) -> Vec<FinanceWeek> {
    let mut weeks = Vec::new();
    let mut cursor = first_thursday_on_or_after(start);

    while cursor <= end {
        weeks.push(FinanceWeek {
            start: cursor,
            end: cursor + Days::new(6),
        });
        cursor = cursor + Days::new(7);
    }

    weeks
}

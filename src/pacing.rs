//! Pacing projection for partial-month actuals.
//!
//! There is exactly one pacing formula in this crate: the remaining-
//! trajectory projection in [`pacing_for_month`]. Every surface (ingestion,
//! aggregation, any client-side recomputation) must call it rather than
//! reimplement it, so server and dashboard figures cannot drift.

use crate::calendar;
use crate::error::{PacingError, Result};
use crate::schema::PacingResult;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// The calendar month a batch of actuals belongs to.
///
/// Pacing is only meaningful when the reference date falls inside the month
/// whose records are being summed, so callers must name the month explicitly
/// instead of trusting "today". The fields are private and deserialization
/// goes through [`ReportingMonth::new`], so a month outside 1..=12 cannot be
/// constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawReportingMonth")]
pub struct ReportingMonth {
    year: i32,
    month: u32,
}

#[derive(Deserialize)]
struct RawReportingMonth {
    year: i32,
    month: u32,
}

impl TryFrom<RawReportingMonth> for ReportingMonth {
    type Error = PacingError;

    fn try_from(raw: RawReportingMonth) -> Result<Self> {
        Self::new(raw.year, raw.month)
    }
}

impl ReportingMonth {
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(PacingError::InvalidMonth(month));
        }
        Ok(Self { year, month })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap()
    }

    pub fn last_day(&self) -> NaiveDate {
        calendar::last_day_of_month(self.year, self.month)
    }

    pub fn days(&self) -> u32 {
        self.last_day().day()
    }
}

/// Projects whether a partial-month actual is on track to hit a full-month
/// target.
///
/// The observed daily run-rate (`actual / days_accounted`) is projected over
/// the remaining days and expressed as a percentage of target, so the figure
/// measures whether the *remaining* trajectory will hit the goal. 100 means
/// exactly on pace.
///
/// Fails with [`PacingError::ReferenceOutsideMonth`] when `reference` is not
/// inside `month` — summing one month's records against another month's
/// calendar position produces meaningless numbers, so that combination is
/// rejected rather than computed.
///
/// A missing or zero target is not an error: there is no commitment to pace
/// against, and the result is 0. The arithmetic is fully guarded and never
/// yields NaN or infinity.
pub fn pacing_for_month(
    actual_to_date: f64,
    target: f64,
    month: ReportingMonth,
    reference: NaiveDate,
) -> Result<PacingResult> {
    if !month.contains(reference) {
        return Err(PacingError::ReferenceOutsideMonth {
            reference: reference.format("%Y-%m-%d").to_string(),
            year: month.year,
            month: month.month,
        });
    }

    let days_in_month = month.days();
    let days_accounted = calendar::days_accounted(reference);
    let days_left = days_in_month - days_accounted;

    let pacing_pct = if target > 0.0 && days_accounted > 0 {
        ((actual_to_date / days_accounted as f64) * days_left as f64 / target) * 100.0
    } else {
        0.0
    };

    Ok(PacingResult {
        pacing_pct,
        days_accounted,
        days_in_month,
        days_left,
    })
}

/// Share of the monthly goal already banked, as a percentage.
///
/// Simpler than pacing (no projection) and displayed alongside it; the two
/// must not be conflated.
pub fn pct_to_target(actual_to_date: f64, target: f64) -> f64 {
    if target > 0.0 {
        (actual_to_date / target) * 100.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn month(y: i32, m: u32) -> ReportingMonth {
        ReportingMonth::new(y, m).unwrap()
    }

    #[test]
    fn test_reporting_month_validation() {
        assert!(ReportingMonth::new(2025, 0).is_err());
        assert!(ReportingMonth::new(2025, 13).is_err());
        assert!(ReportingMonth::new(2025, 11).is_ok());
    }

    #[test]
    fn test_deserialized_month_is_validated() {
        let ok: ReportingMonth = serde_json::from_str(r#"{"year":2025,"month":11}"#).unwrap();
        assert_eq!(ok.month(), 11);
        assert_eq!(ok.first_day(), date(2025, 11, 1));

        // Validation cannot be bypassed by deserializing raw JSON.
        let err = serde_json::from_str::<ReportingMonth>(r#"{"year":2025,"month":13}"#);
        assert!(err.is_err());
    }

    #[test]
    fn test_reporting_month_bounds() {
        let m = month(2025, 11);
        assert_eq!(m.first_day(), date(2025, 11, 1));
        assert_eq!(m.last_day(), date(2025, 11, 30));
        assert_eq!(m.days(), 30);
        assert!(m.contains(date(2025, 11, 17)));
        assert!(!m.contains(date(2025, 12, 1)));
    }

    #[test]
    fn test_canonical_pacing_scenario() {
        // 300k banked after 15 of 30 days against a 900k target.
        let result = pacing_for_month(300_000.0, 900_000.0, month(2025, 11), date(2025, 11, 15))
            .unwrap();

        assert_eq!(result.days_accounted, 15);
        assert_eq!(result.days_in_month, 30);
        assert_eq!(result.days_left, 15);
        assert!((result.pacing_pct - 33.333333).abs() < 1e-4);
    }

    #[test]
    fn test_days_accounted_and_left_mid_november() {
        let result =
            pacing_for_month(1.0, 100.0, month(2025, 11), date(2025, 11, 17)).unwrap();
        assert_eq!(result.days_accounted, 17);
        assert_eq!(result.days_left, 13);
        assert_eq!(result.days_in_month, 30);
    }

    #[test]
    fn test_zero_target_yields_zero_pacing() {
        let result =
            pacing_for_month(250_000.0, 0.0, month(2025, 11), date(2025, 11, 17)).unwrap();
        assert_eq!(result.pacing_pct, 0.0);

        let negative =
            pacing_for_month(250_000.0, -50.0, month(2025, 11), date(2025, 11, 17)).unwrap();
        assert_eq!(negative.pacing_pct, 0.0);
    }

    #[test]
    fn test_pacing_finite_and_non_negative() {
        let m = month(2025, 11);
        for day in 1..=30 {
            let result = pacing_for_month(123_456.78, 900_000.0, m, date(2025, 11, day)).unwrap();
            assert!(result.pacing_pct.is_finite());
            assert!(result.pacing_pct >= 0.0);
            assert_eq!(result.days_accounted + result.days_left, 30);
        }
    }

    #[test]
    fn test_last_day_of_month_paces_to_zero_remaining() {
        // No days left to project into.
        let result =
            pacing_for_month(900_000.0, 900_000.0, month(2025, 11), date(2025, 11, 30)).unwrap();
        assert_eq!(result.days_left, 0);
        assert_eq!(result.pacing_pct, 0.0);
    }

    #[test]
    fn test_reference_outside_month_is_rejected() {
        let err = pacing_for_month(100.0, 200.0, month(2025, 10), date(2025, 11, 17));
        assert!(matches!(
            err,
            Err(PacingError::ReferenceOutsideMonth { .. })
        ));
    }

    #[test]
    fn test_pct_to_target() {
        assert!((pct_to_target(300_000.0, 900_000.0) - 33.333333).abs() < 1e-4);
        assert_eq!(pct_to_target(300_000.0, 0.0), 0.0);
        assert_eq!(pct_to_target(300_000.0, -10.0), 0.0);
        assert_eq!(pct_to_target(0.0, 900_000.0), 0.0);
    }

    #[test]
    fn test_february_leap_year() {
        let result =
            pacing_for_month(1000.0, 2000.0, month(2024, 2), date(2024, 2, 29)).unwrap();
        assert_eq!(result.days_in_month, 29);
        assert_eq!(result.days_left, 0);
    }
}

//! Flat-fee contract allocation.
//!
//! A fixed-price contract's value is spread evenly across every finance week
//! it spans. Days before the contract's first Thursday are excluded rather
//! than prorated, which keeps the invariant that the allocations sum exactly
//! to the contract total.

use crate::calendar::finance_weeks_between;
use crate::error::{PacingError, Result};
use crate::schema::{FlatFeeContract, WeeklyAllocation};

/// Splits `contract.total_contract_revenue` evenly across the contract's
/// finance weeks, one allocation per week.
///
/// Allocations carry the contract's stable key, so re-running allocation for
/// a re-uploaded contract is idempotent per `(partner, week)` pair.
///
/// Fails before producing anything when the dates are inverted, the value is
/// negative, or the date range does not cover a single finance week.
pub fn allocate(contract: &FlatFeeContract) -> Result<Vec<WeeklyAllocation>> {
    validate(contract)?;

    let weeks = finance_weeks_between(contract.contract_start, contract.contract_end);
    if weeks.is_empty() {
        return Err(PacingError::EmptyWeekRange {
            partner: contract.partner_name.clone(),
        });
    }

    let weekly_revenue = contract.total_contract_revenue / weeks.len() as f64;
    let contract_key = contract.key();

    Ok(weeks
        .into_iter()
        .map(|week| WeeklyAllocation {
            partner_name: contract.partner_name.clone(),
            week_start: week.start,
            week_end: week.end,
            weekly_revenue,
            contract_key: contract_key.clone(),
        })
        .collect())
}

fn validate(contract: &FlatFeeContract) -> Result<()> {
    if contract.contract_start > contract.contract_end {
        return Err(PacingError::ValidationError {
            partner: contract.partner_name.clone(),
            details: format!(
                "contract_start {} is after contract_end {}",
                contract.contract_start, contract.contract_end
            ),
        });
    }

    if contract.total_contract_revenue < 0.0 {
        return Err(PacingError::ValidationError {
            partner: contract.partner_name.clone(),
            details: format!(
                "total_contract_revenue {} is negative",
                contract.total_contract_revenue
            ),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Days, NaiveDate, Weekday};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn contract(start: NaiveDate, end: NaiveDate, total: f64) -> FlatFeeContract {
        FlatFeeContract {
            partner_name: "Northwind".to_string(),
            contract_start: start,
            contract_end: end,
            total_contract_revenue: total,
        }
    }

    #[test]
    fn test_even_split_over_four_weeks() {
        // Thu 2025-11-13 through Wed 2025-12-10 is exactly four finance weeks.
        let allocations =
            allocate(&contract(date(2025, 11, 13), date(2025, 12, 10), 52_000.0)).unwrap();

        assert_eq!(allocations.len(), 4);
        for allocation in &allocations {
            assert_eq!(allocation.weekly_revenue, 13_000.0);
            assert_eq!(allocation.week_start.weekday(), Weekday::Thu);
            assert_eq!(allocation.week_end, allocation.week_start + Days::new(6));
            assert_eq!(allocation.partner_name, "Northwind");
        }
        assert_eq!(allocations[0].week_start, date(2025, 11, 13));
        assert_eq!(allocations[3].week_end, date(2025, 12, 10));
    }

    #[test]
    fn test_allocations_sum_to_contract_total() {
        let total = 100_000.0;
        let allocations =
            allocate(&contract(date(2025, 1, 3), date(2025, 6, 30), total)).unwrap();

        let sum: f64 = allocations.iter().map(|a| a.weekly_revenue).sum();
        assert!((sum - total).abs() < 0.01, "sum was {}", sum);
    }

    #[test]
    fn test_allocations_share_the_contract_key() {
        let c = contract(date(2025, 11, 13), date(2025, 12, 10), 52_000.0);
        let allocations = allocate(&c).unwrap();
        for allocation in &allocations {
            assert_eq!(allocation.contract_key, c.key());
        }
    }

    #[test]
    fn test_non_thursday_start_excludes_leading_days() {
        // Friday start: the first allocated week begins the following Thursday.
        let allocations =
            allocate(&contract(date(2025, 11, 14), date(2025, 12, 10), 30_000.0)).unwrap();

        assert_eq!(allocations.len(), 3);
        assert_eq!(allocations[0].week_start, date(2025, 11, 20));
        assert_eq!(allocations[0].weekly_revenue, 10_000.0);
    }

    #[test]
    fn test_contract_too_short_for_any_week() {
        let err = allocate(&contract(date(2025, 11, 14), date(2025, 11, 16), 5_000.0));
        assert!(matches!(err, Err(PacingError::EmptyWeekRange { partner }) if partner == "Northwind"));
    }

    #[test]
    fn test_inverted_dates_rejected() {
        let err = allocate(&contract(date(2025, 12, 1), date(2025, 11, 1), 5_000.0));
        assert!(matches!(err, Err(PacingError::ValidationError { .. })));
    }

    #[test]
    fn test_negative_total_rejected() {
        let err = allocate(&contract(date(2025, 11, 13), date(2025, 12, 10), -1.0));
        assert!(matches!(err, Err(PacingError::ValidationError { .. })));
    }

    #[test]
    fn test_zero_value_contract_allocates_zeros() {
        let allocations =
            allocate(&contract(date(2025, 11, 13), date(2025, 12, 10), 0.0)).unwrap();
        assert_eq!(allocations.len(), 4);
        assert!(allocations.iter().all(|a| a.weekly_revenue == 0.0));
    }
}

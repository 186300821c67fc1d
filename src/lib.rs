//! # Revenue Pacing
//!
//! A library for computing finance-week calendars, monthly pacing
//! projections, and flat-fee contract allocations from affiliate/attribution
//! platform exports.
//!
//! ## Core Concepts
//!
//! - **Finance week**: a 7-day reporting period running Thursday through
//!   Wednesday, used instead of the calendar (Sun-Sat) week.
//! - **Pacing**: a projected percentage indicating whether the current
//!   trajectory will meet a monthly target. 100 means exactly on pace.
//! - **Percent-to-target**: how much of the goal is already banked. Simpler
//!   than pacing and displayed alongside it.
//! - **Flat fee**: a fixed-price contract whose value is allocated evenly
//!   across the finance weeks it spans.
//!
//! The engine is purely computational: no I/O of its own, no shared state,
//! and deterministic outputs for a given input and reference date. CSV
//! parsing is the one surface that touches bytes, and it only reads.
//!
//! ## Example
//!
//! ```rust,ignore
//! use revenue_pacing::*;
//! use chrono::NaiveDate;
//!
//! let csv = std::fs::File::open("impact_export.csv")?;
//! let month = ReportingMonth::new(2025, 11)?;
//! let today = NaiveDate::from_ymd_opt(2025, 11, 17).unwrap();
//!
//! let outcome = process_platform_upload("impact", csv, month, today)?;
//! for row in &outcome.summary.rows {
//!     println!("{} {}: pacing {:.1}%", row.platform_key, row.brand, row.pacing.pacing_pct);
//! }
//! ```

pub mod aggregate;
pub mod allocator;
pub mod calendar;
pub mod error;
pub mod ingestion;
pub mod pacing;
pub mod schema;

pub use aggregate::{summarize, BrandPacing, DashboardSummary, TotalsPacing};
pub use allocator::allocate;
pub use error::{PacingError, Result};
pub use ingestion::{parse_contract_csv, parse_money, parse_platform_csv, PlatformImport, SkippedRow};
pub use pacing::{pacing_for_month, pct_to_target, ReportingMonth};
pub use schema::*;

use chrono::NaiveDate;
use log::{debug, info};
use std::io::Read;

/// Result of ingesting one platform export and rebuilding the dashboard.
#[derive(Debug)]
pub struct UploadOutcome {
    pub summary: DashboardSummary,
    /// Rows the import skipped, for the caller to surface or log.
    pub skipped: Vec<SkippedRow>,
}

/// A contract paired with its weekly allocations, ready to be upserted
/// atomically by the storage layer.
#[derive(Debug)]
pub struct ContractAllocation {
    pub contract: FlatFeeContract,
    pub allocations: Vec<WeeklyAllocation>,
}

pub struct PacingProcessor;

impl PacingProcessor {
    /// Ingests a platform CSV export and summarizes it for the dashboard.
    ///
    /// Unparseable rows are skipped and reported in the outcome; a missing
    /// column or a reference date outside the reporting month fails the
    /// whole upload.
    pub fn process_platform_upload<R: Read>(
        platform_key: &str,
        reader: R,
        month: ReportingMonth,
        reference: NaiveDate,
    ) -> Result<UploadOutcome> {
        info!(
            "Processing platform upload '{}' for {:04}-{:02}",
            platform_key,
            month.year(),
            month.month()
        );

        let import = parse_platform_csv(platform_key, reader)?;
        debug!(
            "Imported {} records, skipped {} rows",
            import.records.len(),
            import.skipped.len()
        );

        let summary = summarize(&import.records, month, reference)?;
        debug!("Dashboard has {} brand rows", summary.rows.len());

        Ok(UploadOutcome {
            summary,
            skipped: import.skipped,
        })
    }

    /// Ingests a flat-fee contract CSV export and allocates every contract
    /// across its finance weeks.
    ///
    /// All-or-nothing: one structurally invalid contract rejects the batch
    /// before any allocation is returned.
    pub fn process_contract_upload<R: Read>(reader: R) -> Result<Vec<ContractAllocation>> {
        let contracts = parse_contract_csv(reader)?;
        info!("Allocating {} flat-fee contracts", contracts.len());

        let mut results = Vec::with_capacity(contracts.len());
        for contract in contracts {
            let allocations = allocate(&contract)?;
            debug!(
                "Contract '{}' spans {} finance weeks",
                contract.partner_name,
                allocations.len()
            );
            results.push(ContractAllocation {
                contract,
                allocations,
            });
        }

        Ok(results)
    }
}

pub fn process_platform_upload<R: Read>(
    platform_key: &str,
    reader: R,
    month: ReportingMonth,
    reference: NaiveDate,
) -> Result<UploadOutcome> {
    PacingProcessor::process_platform_upload(platform_key, reader, month, reference)
}

pub fn process_contract_upload<R: Read>(reader: R) -> Result<Vec<ContractAllocation>> {
    PacingProcessor::process_contract_upload(reader)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_upload_end_to_end() {
        let csv = "\
date,brand,weeklyRevenue,mtdRevenue,mtdGmv,targetGmv
2025-11-15,Acme,\"$1,000\",\"$4,000\",\"$300,000\",\"$900,000\"
2025-11-15,Globex,$500,$2_000,\"$100,000\",\"$300,000\"
";
        let month = ReportingMonth::new(2025, 11).unwrap();
        let reference = NaiveDate::from_ymd_opt(2025, 11, 15).unwrap();

        let outcome = process_platform_upload("impact", csv.as_bytes(), month, reference).unwrap();

        assert!(outcome.skipped.is_empty());
        assert_eq!(outcome.summary.rows.len(), 2);
        assert!((outcome.summary.totals.pacing.pacing_pct - 33.333333).abs() < 1e-4);
    }

    #[test]
    fn test_contract_upload_end_to_end() {
        let csv = "\
partnerName,contractStart,contractEnd,totalContractRevenue
Northwind,2025-11-13,2025-12-10,\"$52,000\"
";
        let results = process_contract_upload(csv.as_bytes()).unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].allocations.len(), 4);
        assert!(results[0]
            .allocations
            .iter()
            .all(|a| a.weekly_revenue == 13_000.0));
    }

    #[test]
    fn test_contract_upload_rejects_batch_on_invalid_contract() {
        let csv = "\
partnerName,contractStart,contractEnd,totalContractRevenue
Northwind,2025-11-13,2025-12-10,52000
Initech,2025-12-10,2025-11-13,10000
";
        let err = process_contract_upload(csv.as_bytes());
        assert!(matches!(err, Err(PacingError::ValidationError { .. })));
    }
}

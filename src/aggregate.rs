//! Dashboard aggregation.
//!
//! Groups raw per-brand/platform records, keeps the latest row per group,
//! and computes pacing per group and across the board. This is the read
//! model the web UI renders; nothing here is persisted.

use crate::calendar;
use crate::error::Result;
use crate::pacing::{pacing_for_month, pct_to_target, ReportingMonth};
use crate::schema::{FinanceWeek, MetricRecord, PacingResult};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// Latest actuals and derived pacing for one (platform, brand) pair.
#[derive(Debug, Clone, Serialize)]
pub struct BrandPacing {
    pub platform_key: String,
    pub brand: String,
    pub as_of: NaiveDate,
    pub weekly_revenue: f64,
    pub mtd_revenue: f64,
    pub mtd_gmv: f64,
    pub target_gmv: f64,
    pub pacing: PacingResult,
    pub pct_to_target: f64,
}

/// Sums across every group, with pacing computed over the summed figures.
#[derive(Debug, Clone, Serialize)]
pub struct TotalsPacing {
    pub weekly_revenue: f64,
    pub mtd_revenue: f64,
    pub mtd_gmv: f64,
    pub target_gmv: f64,
    pub pacing: PacingResult,
    pub pct_to_target: f64,
}

/// The full dashboard read model for one reporting month.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    /// Finance week containing the reference date.
    pub week: FinanceWeek,
    pub month: ReportingMonth,
    /// One row per (platform, brand), sorted for stable display.
    pub rows: Vec<BrandPacing>,
    pub totals: TotalsPacing,
}

/// Reduces a record history to the authoritative row per (platform, brand):
/// the one with the latest as-of date. Ties keep the later upload (last
/// record wins).
pub fn latest_records(records: &[MetricRecord]) -> BTreeMap<(String, String), MetricRecord> {
    let mut latest: BTreeMap<(String, String), MetricRecord> = BTreeMap::new();

    for record in records {
        let key = (record.platform_key.clone(), record.brand.clone());
        match latest.get(&key) {
            Some(existing) if existing.date > record.date => {}
            _ => {
                latest.insert(key, record.clone());
            }
        }
    }

    latest
}

/// Builds the dashboard summary for `month` as of `reference`.
///
/// Pacing is computed per group from `mtd_gmv` against `target_gmv`, and
/// once more over the summed totals. Records dated outside the reporting
/// month are ignored; a reference date outside it is an error.
pub fn summarize(
    records: &[MetricRecord],
    month: ReportingMonth,
    reference: NaiveDate,
) -> Result<DashboardSummary> {
    // Fail on a bad reference before touching any records.
    pacing_for_month(0.0, 0.0, month, reference)?;

    let in_month: Vec<MetricRecord> = records
        .iter()
        .filter(|r| month.contains(r.date))
        .cloned()
        .collect();

    let latest = latest_records(&in_month);

    let mut rows = Vec::with_capacity(latest.len());
    let mut total_weekly = 0.0;
    let mut total_mtd_revenue = 0.0;
    let mut total_mtd_gmv = 0.0;
    let mut total_target = 0.0;

    for ((platform_key, brand), record) in latest {
        let pacing = pacing_for_month(record.mtd_gmv, record.target_gmv, month, reference)?;

        total_weekly += record.weekly_revenue;
        total_mtd_revenue += record.mtd_revenue;
        total_mtd_gmv += record.mtd_gmv;
        total_target += record.target_gmv;

        rows.push(BrandPacing {
            platform_key,
            brand,
            as_of: record.date,
            weekly_revenue: record.weekly_revenue,
            mtd_revenue: record.mtd_revenue,
            mtd_gmv: record.mtd_gmv,
            target_gmv: record.target_gmv,
            pct_to_target: pct_to_target(record.mtd_gmv, record.target_gmv),
            pacing,
        });
    }

    let totals = TotalsPacing {
        weekly_revenue: total_weekly,
        mtd_revenue: total_mtd_revenue,
        mtd_gmv: total_mtd_gmv,
        target_gmv: total_target,
        pacing: pacing_for_month(total_mtd_gmv, total_target, month, reference)?,
        pct_to_target: pct_to_target(total_mtd_gmv, total_target),
    };

    Ok(DashboardSummary {
        week: calendar::week_of(reference),
        month,
        rows,
        totals,
    })
}

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One row of actuals for a (platform, brand, date) triple.
///
/// Records are append/upsert by date: for a given (platform, brand) pair the
/// row with the latest `date` is authoritative for current dashboard state,
/// and history rows are never deleted.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MetricRecord {
    #[schemars(description = "Identifier of the revenue source/partner platform this row came from")]
    pub platform_key: String,

    #[schemars(description = "Brand the revenue is attributed to")]
    pub brand: String,

    #[schemars(
        description = "As-of date of the row in YYYY-MM-DD format. This is a snapshot date, not an interval."
    )]
    pub date: NaiveDate,

    #[schemars(description = "Revenue attributed to the finance week containing the as-of date")]
    pub weekly_revenue: f64,

    #[schemars(description = "Cumulative revenue from the start of the calendar month through the as-of date")]
    pub mtd_revenue: f64,

    #[schemars(
        description = "Cumulative gross merchandise value from the start of the calendar month through the as-of date"
    )]
    pub mtd_gmv: f64,

    #[schemars(description = "Static monthly GMV goal for this brand/platform")]
    pub target_gmv: f64,

    #[schemars(description = "Total value of a fixed-term deal, when this row belongs to one")]
    #[serde(default)]
    pub total_contract_revenue: Option<f64>,
}

/// A fixed-revenue partnership whose lump sum is spread evenly across the
/// finance weeks it spans.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FlatFeeContract {
    #[schemars(description = "Name of the partner the contract is with")]
    pub partner_name: String,

    #[schemars(description = "First day of the contract term, YYYY-MM-DD")]
    pub contract_start: NaiveDate,

    #[schemars(description = "Last day of the contract term (inclusive), YYYY-MM-DD")]
    pub contract_end: NaiveDate,

    #[schemars(description = "Total fixed value of the contract, distributed across its finance weeks")]
    pub total_contract_revenue: f64,
}

impl FlatFeeContract {
    /// Stable identity derived from the fields that define the contract.
    ///
    /// Re-uploading the same contract yields the same key, so contracts and
    /// their allocations can be upserted instead of duplicated.
    pub fn key(&self) -> String {
        format!(
            "{}|{}|{}",
            self.partner_name.trim().to_lowercase(),
            self.contract_start.format("%Y-%m-%d"),
            self.contract_end.format("%Y-%m-%d")
        )
    }
}

/// A 7-day reporting span running Thursday through Wednesday, inclusive on
/// both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FinanceWeek {
    #[schemars(description = "First day of the finance week, always a Thursday")]
    pub start: NaiveDate,

    #[schemars(description = "Last day of the finance week (inclusive), always a Wednesday")]
    pub end: NaiveDate,
}

/// Projected pacing for a partial month, computed fresh on every read and
/// never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PacingResult {
    #[schemars(
        description = "Projected remaining contribution as a percentage of target. 100 means exactly on pace; 0 when there is no target or no elapsed days."
    )]
    pub pacing_pct: f64,

    #[schemars(description = "Days of the month already reflected in the actuals (1-based day of month)")]
    pub days_accounted: u32,

    #[schemars(description = "Number of days in the reporting month (28-31)")]
    pub days_in_month: u32,

    #[schemars(description = "Days remaining in the reporting month")]
    pub days_left: u32,
}

/// One week's slice of a flat-fee contract.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct WeeklyAllocation {
    #[schemars(description = "Partner the allocation belongs to")]
    pub partner_name: String,

    #[schemars(description = "Thursday opening the finance week, YYYY-MM-DD")]
    pub week_start: NaiveDate,

    #[schemars(description = "Wednesday closing the finance week, YYYY-MM-DD")]
    pub week_end: NaiveDate,

    #[schemars(description = "Even share of the contract total for this week")]
    pub weekly_revenue: f64,

    #[schemars(description = "Stable key of the contract this allocation was derived from")]
    pub contract_key: String,
}

impl MetricRecord {
    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(MetricRecord)
    }

    pub fn schema_as_json() -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&Self::generate_json_schema())
    }
}

impl FlatFeeContract {
    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(FlatFeeContract)
    }

    pub fn schema_as_json() -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&Self::generate_json_schema())
    }
}

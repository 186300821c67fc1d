//! CSV normalization for the two upload surfaces.
//!
//! Platform metric exports arrive with currency symbols and thousands
//! separators in the numeric columns; rows that fail to parse are skipped
//! and reported instead of aborting the upload. Flat-fee contract exports
//! are stricter: any invalid row rejects the whole batch before a single
//! allocation is written.

use crate::error::{PacingError, Result};
use crate::schema::{FlatFeeContract, MetricRecord};
use chrono::NaiveDate;
use log::warn;
use serde::Deserialize;
use std::io::Read;

const PLATFORM_COLUMNS: &[&str] = &[
    "date",
    "brand",
    "weeklyRevenue",
    "mtdRevenue",
    "mtdGmv",
    "targetGmv",
];

const CONTRACT_COLUMNS: &[&str] = &[
    "partnerName",
    "contractStart",
    "contractEnd",
    "totalContractRevenue",
];

#[derive(Debug, Deserialize)]
struct RawPlatformRow {
    date: String,
    brand: String,
    #[serde(rename = "weeklyRevenue")]
    weekly_revenue: String,
    #[serde(rename = "mtdRevenue")]
    mtd_revenue: String,
    #[serde(rename = "mtdGmv")]
    mtd_gmv: String,
    #[serde(rename = "targetGmv")]
    target_gmv: String,
    #[serde(rename = "totalContractRevenue", default)]
    total_contract_revenue: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawContractRow {
    #[serde(rename = "partnerName")]
    partner_name: String,
    #[serde(rename = "contractStart")]
    contract_start: String,
    #[serde(rename = "contractEnd")]
    contract_end: String,
    #[serde(rename = "totalContractRevenue")]
    total_contract_revenue: String,
}

/// A platform row that could not be normalized, with the 1-based CSV line it
/// came from.
#[derive(Debug, Clone)]
pub struct SkippedRow {
    pub line: u64,
    pub reason: String,
}

/// Result of importing one platform CSV export.
#[derive(Debug)]
pub struct PlatformImport {
    pub records: Vec<MetricRecord>,
    pub skipped: Vec<SkippedRow>,
}

/// Parses a monetary field after stripping currency symbols, thousands
/// separators, and whitespace. Parenthesized values are treated as negative.
pub fn parse_money(raw: &str, context: &str) -> Result<f64> {
    let trimmed = raw.trim();
    let (body, negative) = if trimmed.starts_with('(') && trimmed.ends_with(')') {
        (&trimmed[1..trimmed.len() - 1], true)
    } else {
        (trimmed, false)
    };

    let cleaned: String = body
        .chars()
        .filter(|c| !matches!(c, '$' | '€' | '£' | ',' | '_') && !c.is_whitespace())
        .collect();

    if cleaned.is_empty() {
        return Err(PacingError::InvalidMoney {
            context: context.to_string(),
            value: raw.to_string(),
        });
    }

    let value: f64 = cleaned.parse().map_err(|_| PacingError::InvalidMoney {
        context: context.to_string(),
        value: raw.to_string(),
    })?;
    let value = if negative { -value } else { value };

    // f64::parse accepts "inf"/"NaN"; those are not money.
    if !value.is_finite() {
        return Err(PacingError::InvalidMoney {
            context: context.to_string(),
            value: raw.to_string(),
        });
    }

    Ok(value)
}

fn parse_date(raw: &str, context: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| PacingError::InvalidDate {
        context: context.to_string(),
        value: raw.to_string(),
    })
}

fn check_headers(headers: &csv::StringRecord, required: &[&str]) -> Result<()> {
    for column in required {
        if !headers.iter().any(|h| h.trim() == *column) {
            return Err(PacingError::MissingColumn(column.to_string()));
        }
    }
    Ok(())
}

/// Reads a platform metric export, tagging every record with `platform_key`.
///
/// Rows with unparseable dates or numbers are skipped with a warning and
/// collected in [`PlatformImport::skipped`]; a missing required column is a
/// structural error for the whole file.
pub fn parse_platform_csv<R: Read>(platform_key: &str, reader: R) -> Result<PlatformImport> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    check_headers(&headers, PLATFORM_COLUMNS)?;

    let mut records = Vec::new();
    let mut skipped = Vec::new();

    for result in csv_reader.records() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                let line = e.position().map(|p| p.line()).unwrap_or(0);
                warn!("Skipping malformed row at line {}: {}", line, e);
                skipped.push(SkippedRow {
                    line,
                    reason: e.to_string(),
                });
                continue;
            }
        };

        // Physical line where the record starts; quoted fields may span
        // several lines, so this is not simply the record index.
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        let raw: RawPlatformRow = match record.deserialize(Some(&headers)) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Skipping malformed row at line {}: {}", line, e);
                skipped.push(SkippedRow {
                    line,
                    reason: e.to_string(),
                });
                continue;
            }
        };

        match normalize_platform_row(platform_key, &raw) {
            Ok(metric) => records.push(metric),
            Err(e) => {
                warn!(
                    "Skipping row at line {} for brand '{}': {}",
                    line, raw.brand, e
                );
                skipped.push(SkippedRow {
                    line,
                    reason: e.to_string(),
                });
            }
        }
    }

    Ok(PlatformImport { records, skipped })
}

fn normalize_platform_row(platform_key: &str, raw: &RawPlatformRow) -> Result<MetricRecord> {
    let date = parse_date(&raw.date, "date")?;

    let total_contract_revenue = match &raw.total_contract_revenue {
        Some(s) if !s.trim().is_empty() => Some(parse_money(s, "totalContractRevenue")?),
        _ => None,
    };

    Ok(MetricRecord {
        platform_key: platform_key.to_string(),
        brand: raw.brand.trim().to_string(),
        date,
        weekly_revenue: parse_money(&raw.weekly_revenue, "weeklyRevenue")?,
        mtd_revenue: parse_money(&raw.mtd_revenue, "mtdRevenue")?,
        mtd_gmv: parse_money(&raw.mtd_gmv, "mtdGmv")?,
        target_gmv: parse_money(&raw.target_gmv, "targetGmv")?,
        total_contract_revenue,
    })
}

/// Reads a flat-fee contract export.
///
/// Contract rows are structural input for allocation, so any invalid row
/// rejects the whole batch with an error naming the offending partner and
/// line.
pub fn parse_contract_csv<R: Read>(reader: R) -> Result<Vec<FlatFeeContract>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    check_headers(&headers, CONTRACT_COLUMNS)?;

    let mut contracts = Vec::new();

    for result in csv_reader.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let raw: RawContractRow = record.deserialize(Some(&headers))?;

        let partner = raw.partner_name.trim().to_string();
        if partner.is_empty() {
            return Err(PacingError::ValidationError {
                partner: format!("<line {}>", line),
                details: "partnerName is empty".to_string(),
            });
        }

        let contract = FlatFeeContract {
            contract_start: parse_date(&raw.contract_start, &field_context(&partner, line, "contractStart"))?,
            contract_end: parse_date(&raw.contract_end, &field_context(&partner, line, "contractEnd"))?,
            total_contract_revenue: parse_money(
                &raw.total_contract_revenue,
                &field_context(&partner, line, "totalContractRevenue"),
            )?,
            partner_name: partner,
        };

        contracts.push(contract);
    }

    Ok(contracts)
}

fn field_context(partner: &str, line: u64, field: &str) -> String {
    format!("{} for partner '{}' (line {})", field, partner, line)
}

use crate::model::{Classification, MineralRecord, PriceTable};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of pricing one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevyStatus {
    Success,
    InvalidCommodity,
    InvalidGrade,
    /// Classification resolved but the price table has no such cell.
    RateUnavailable,
    /// Quantity times price does not fit in a `Decimal`.
    AmountOverflow,
}

impl LevyStatus {
    pub fn is_success(self) -> bool {
        self == LevyStatus::Success
    }

    /// Status text as shown in assessment reports.
    pub fn message(self) -> &'static str {
        match self {
            LevyStatus::Success => "Success",
            LevyStatus::InvalidCommodity => "Error: Invalid Ore Type",
            LevyStatus::InvalidGrade => "Error: Invalid Grade",
            LevyStatus::RateUnavailable => "Rate Not Found (NA in Gazette)",
            LevyStatus::AmountOverflow => "Error: Amount Out of Range",
        }
    }
}

impl fmt::Display for LevyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

/// Monetary outcome for one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevyResult {
    /// Reference price applied (zero when the table cell did not resolve).
    pub price: Decimal,
    /// Quantity times price.
    pub base_value: Decimal,
    pub royalty: Decimal,
    pub development_fee: Decimal,
    pub status: LevyStatus,
}

/// One input record with its classification and levy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessedRecord {
    pub record: MineralRecord,
    pub classification: Classification,
    /// Full commodity description, or "Unknown".
    pub commodity_label: String,
    /// Full grade description, or "Unknown".
    pub grade_label: String,
    /// Quantity after clamping unparseable or negative values to zero.
    pub quantity: Decimal,
    pub levy: LevyResult,
}

/// Result of assessing a record set against one gazette.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assessment {
    pub jurisdiction: String,
    /// Name of the price source that supplied the table.
    pub price_source: String,
    pub price_table: PriceTable,
    /// Record-set column headers in source order.
    pub headers: Vec<String>,
    /// One entry per input record, in input order.
    pub records: Vec<AssessedRecord>,
}

impl Assessment {
    /// Saturates at `Decimal::MAX`.
    pub fn total_royalty(&self) -> Decimal {
        self.records
            .iter()
            .fold(Decimal::ZERO, |acc, r| acc.saturating_add(r.levy.royalty))
    }

    pub fn total_development_fee(&self) -> Decimal {
        self.records
            .iter()
            .fold(Decimal::ZERO, |acc, r| acc.saturating_add(r.levy.development_fee))
    }

    /// Records whose status is not Success.
    pub fn flagged(&self) -> impl Iterator<Item = &AssessedRecord> {
        self.records.iter().filter(|r| !r.levy.status.is_success())
    }
}

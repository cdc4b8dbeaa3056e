use crate::assess::outcome::{AssessedRecord, LevyResult, LevyStatus};
use crate::config::schema::LevyConfig;
use crate::model::{Classification, MineralRecord, PriceTable};
use crate::parsing::normalize::classify;
use crate::parsing::values::parse_quantity;
use rayon::prelude::*;
use rust_decimal::Decimal;

/// Statutory rates applied to the base value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevyRates {
    /// Fraction of base value.
    pub royalty: Decimal,
    /// Fraction of royalty.
    pub development_fee: Decimal,
}

impl LevyRates {
    pub fn from_config(config: &LevyConfig) -> Self {
        LevyRates {
            royalty: config.royalty_rate,
            development_fee: config.development_fee_rate,
        }
    }
}

impl Default for LevyRates {
    fn default() -> Self {
        LevyRates {
            royalty: Decimal::new(15, 2),
            development_fee: Decimal::new(30, 2),
        }
    }
}

/// Price one classified quantity.
///
/// Resolution order: unresolved commodity, unresolved grade, missing table
/// cell, success. The base value is always quantity times the resolved
/// price; failed resolutions price at zero and say why in the status. A
/// product outside the `Decimal` range zeroes the amounts and reports
/// `AmountOverflow`.
pub fn assess_record(
    classification: Classification,
    quantity: Decimal,
    table: &PriceTable,
    rates: &LevyRates,
) -> LevyResult {
    let (price, status) = match (classification.commodity, classification.grade) {
        (None, _) => (Decimal::ZERO, LevyStatus::InvalidCommodity),
        (Some(_), None) => (Decimal::ZERO, LevyStatus::InvalidGrade),
        (Some(c), Some(g)) => match table.get(c, g) {
            Some(price) => (price.max(Decimal::ZERO), LevyStatus::Success),
            None => (Decimal::ZERO, LevyStatus::RateUnavailable),
        },
    };

    let quantity = quantity.max(Decimal::ZERO);
    let amounts = quantity.checked_mul(price).and_then(|base| {
        let royalty = base.checked_mul(rates.royalty)?;
        let fee = royalty.checked_mul(rates.development_fee)?;
        Some((base, royalty, fee))
    });
    let Some((base_value, royalty, development_fee)) = amounts else {
        log::warn!("levy on {} x {} is out of range", quantity, price);
        return LevyResult {
            price,
            base_value: Decimal::ZERO,
            royalty: Decimal::ZERO,
            development_fee: Decimal::ZERO,
            status: LevyStatus::AmountOverflow,
        };
    };

    LevyResult {
        price,
        base_value,
        royalty,
        development_fee,
        status,
    }
}

/// Classify and price a single record.
pub fn assess_one(record: &MineralRecord, table: &PriceTable, rates: &LevyRates) -> AssessedRecord {
    let classification = classify(record);
    let quantity = parse_quantity(&record.quantity);
    let levy = assess_record(classification, quantity, table, rates);

    AssessedRecord {
        record: record.clone(),
        classification,
        commodity_label: classification
            .commodity
            .map(|c| c.label().to_string())
            .unwrap_or_else(|| "Unknown".into()),
        grade_label: classification
            .grade
            .map(|g| g.label().to_string())
            .unwrap_or_else(|| "Unknown".into()),
        quantity,
        levy,
    }
}

/// Assess every record. Records are independent and processed in parallel;
/// the output keeps input order.
pub fn assess_records(
    records: &[MineralRecord],
    table: &PriceTable,
    rates: &LevyRates,
) -> Vec<AssessedRecord> {
    let assessed: Vec<AssessedRecord> = records
        .par_iter()
        .map(|r| assess_one(r, table, rates))
        .collect();

    let flagged = assessed
        .iter()
        .filter(|r| !r.levy.status.is_success())
        .count();
    log::info!(
        "assessed {} record(s), {} flagged",
        assessed.len(),
        flagged
    );
    assessed
}

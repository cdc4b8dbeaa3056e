use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Assessment configuration for one jurisdiction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevyConfig {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub version: String,
    /// Jurisdiction whose price block is extracted from the gazette.
    pub jurisdiction: String,
    /// Jurisdiction names in gazette order. Any of them, other than the
    /// target, ends the target's section.
    #[serde(default)]
    pub known_jurisdictions: Vec<String>,
    /// Maximum section length in characters when no bounding jurisdiction follows.
    #[serde(default = "default_window")]
    pub fallback_window_chars: usize,
    /// Royalty as a fraction of base value.
    #[serde(default = "default_royalty_rate")]
    pub royalty_rate: Decimal,
    /// Development fee as a fraction of royalty.
    #[serde(default = "default_development_fee_rate")]
    pub development_fee_rate: Decimal,
    #[serde(default)]
    pub columns: ColumnHints,
}

/// Header fragments used to locate the required record-set columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnHints {
    #[serde(default = "default_quantity_hint")]
    pub quantity: String,
    #[serde(default = "default_commodity_hints")]
    pub commodity: Vec<String>,
    #[serde(default = "default_grade_hints")]
    pub grade: Vec<String>,
}

impl Default for ColumnHints {
    fn default() -> Self {
        Self {
            quantity: default_quantity_hint(),
            commodity: default_commodity_hints(),
            grade: default_grade_hints(),
        }
    }
}

fn default_window() -> usize {
    4000
}

fn default_royalty_rate() -> Decimal {
    Decimal::new(15, 2)
}

fn default_development_fee_rate() -> Decimal {
    Decimal::new(30, 2)
}

fn default_quantity_hint() -> String {
    "quantity".into()
}

fn default_commodity_hints() -> Vec<String> {
    vec![
        "type of ore".into(),
        "commodity".into(),
        "mineral".into(),
        "ore".into(),
    ]
}

fn default_grade_hints() -> Vec<String> {
    vec!["grade".into(), "fe".into()]
}

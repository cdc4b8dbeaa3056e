//! Price-table strategies and the ordered chain that picks between them.
//!
//! The deterministic gazette parser always runs last. Strategies placed ahead
//! of it (for example a table produced by an external extraction service) win
//! whenever they yield a non-empty table.

use std::borrow::Cow;
use std::path::Path;

use rust_decimal::Decimal;
use serde_json::Value;

use crate::config::schema::LevyConfig;
use crate::error::FerroError;
use crate::extraction::PageContent;
use crate::model::{Commodity, Grade, PriceTable};
use crate::parsing::extract_prices;
use crate::parsing::values::{is_not_available, parse_amount};

/// A way of obtaining the reference price table for one gazette.
pub trait PriceSource: Send + Sync {
    fn name(&self) -> &str;

    /// Produce a table for the configured jurisdiction. An empty table means
    /// "nothing found" and lets the chain move on.
    fn price_table(
        &self,
        pages: &[PageContent],
        config: &LevyConfig,
    ) -> Result<PriceTable, FerroError>;

    /// Whether `price_table` reads the pages. When no consulted source does,
    /// the gazette text is never extracted.
    fn needs_pages(&self) -> bool {
        true
    }
}

/// Deterministic extraction from the gazette text.
#[derive(Debug, Default, Clone, Copy)]
pub struct GazetteParser;

impl PriceSource for GazetteParser {
    fn name(&self) -> &str {
        "gazette-parser"
    }

    fn price_table(
        &self,
        pages: &[PageContent],
        config: &LevyConfig,
    ) -> Result<PriceTable, FerroError> {
        Ok(extract_prices(pages, config)?.table)
    }
}

/// A table produced outside this crate and handed in as JSON.
///
/// Shape: `{"L": {"D": 3200, "E": "3,450"}, "F": {"F": "NA"}}`. Keys are the
/// single-letter commodity and grade codes. Cells may be numbers or strings;
/// "NA"-style markers record zero and `null` leaves the cell absent.
#[derive(Debug, Clone)]
pub struct PrecomputedPrices {
    label: String,
    table: PriceTable,
}

impl PrecomputedPrices {
    pub fn from_json(label: impl Into<String>, json: &str) -> Result<Self, FerroError> {
        let label = label.into();
        let value: Value = serde_json::from_str(json).map_err(|e| FerroError::PriceSource {
            source_name: label.clone(),
            reason: e.to_string(),
        })?;
        let table = table_from_value(&value).map_err(|reason| FerroError::PriceSource {
            source_name: label.clone(),
            reason,
        })?;
        Ok(PrecomputedPrices { label, table })
    }

    pub fn from_file(path: &Path) -> Result<Self, FerroError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(format!("precomputed:{}", path.display()), &json)
    }

    pub fn table(&self) -> &PriceTable {
        &self.table
    }
}

impl PriceSource for PrecomputedPrices {
    fn name(&self) -> &str {
        &self.label
    }

    fn price_table(
        &self,
        _pages: &[PageContent],
        _config: &LevyConfig,
    ) -> Result<PriceTable, FerroError> {
        Ok(self.table.clone())
    }

    fn needs_pages(&self) -> bool {
        false
    }
}

fn table_from_value(value: &Value) -> Result<PriceTable, String> {
    let commodities = value
        .as_object()
        .ok_or("expected an object keyed by commodity code")?;

    let mut table = PriceTable::new();
    for (commodity_key, grades) in commodities {
        let commodity = single_char(commodity_key)
            .and_then(Commodity::from_code)
            .ok_or_else(|| format!("unknown commodity code '{commodity_key}'"))?;
        let grades = grades
            .as_object()
            .ok_or_else(|| format!("commodity '{commodity_key}' must map grade codes to prices"))?;

        for (grade_key, cell) in grades {
            let grade = single_char(grade_key)
                .and_then(Grade::from_code)
                .ok_or_else(|| format!("unknown grade code '{grade_key}'"))?;
            if let Some(price) = cell_price(cell)
                .map_err(|e| format!("{commodity_key}/{grade_key}: {e}"))?
            {
                table.insert_if_absent(commodity, grade, price);
            }
        }
    }
    Ok(table)
}

fn single_char(key: &str) -> Option<char> {
    let mut chars = key.trim().chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

fn cell_price(cell: &Value) -> Result<Option<Decimal>, String> {
    let price = match cell {
        Value::Null => return Ok(None),
        Value::Number(n) => parse_amount(&n.to_string()).map_err(|e| e.to_string())?,
        Value::String(s) if is_not_available(s) => Decimal::ZERO,
        Value::String(s) => parse_amount(s).map_err(|e| e.to_string())?,
        other => return Err(format!("unsupported price value {other}")),
    };
    if price.is_sign_negative() && !price.is_zero() {
        return Err(format!("negative price {price}"));
    }
    Ok(Some(price))
}

/// The table a chain settled on.
#[derive(Debug, Clone)]
pub struct ResolvedPrices {
    pub source_name: String,
    pub table: PriceTable,
}

/// Ordered strategies consulted until one yields a non-empty table.
pub struct PriceSourceChain {
    preferred: Vec<Box<dyn PriceSource>>,
    fallback: GazetteParser,
}

impl Default for PriceSourceChain {
    fn default() -> Self {
        Self::deterministic()
    }
}

impl PriceSourceChain {
    /// A chain holding only the gazette parser.
    pub fn deterministic() -> Self {
        PriceSourceChain {
            preferred: Vec::new(),
            fallback: GazetteParser,
        }
    }

    /// Append a strategy. It is consulted after those already added and
    /// before the gazette parser.
    pub fn with_source(mut self, source: Box<dyn PriceSource>) -> Self {
        self.preferred.push(source);
        self
    }

    /// Strategy names in consultation order.
    pub fn source_names(&self) -> Vec<&str> {
        self.preferred
            .iter()
            .map(|s| s.name())
            .chain(std::iter::once(self.fallback.name()))
            .collect()
    }

    /// Consult the strategies in order. A failing or empty preferred strategy
    /// is skipped; errors from the gazette parser itself propagate.
    pub fn resolve(
        &self,
        pages: &[PageContent],
        config: &LevyConfig,
    ) -> Result<ResolvedPrices, FerroError> {
        self.resolve_with(|| Ok(Cow::Borrowed(pages)), config)
    }

    /// Like [`resolve`](Self::resolve), but pages are loaded on first use.
    /// A chain whose winning source ignores pages never calls `load_pages`.
    /// A load failure is returned as is.
    pub fn resolve_with<'a, F>(
        &self,
        load_pages: F,
        config: &LevyConfig,
    ) -> Result<ResolvedPrices, FerroError>
    where
        F: FnOnce() -> Result<Cow<'a, [PageContent]>, FerroError>,
    {
        let mut loader = Some(load_pages);
        let mut pages: Option<Cow<'a, [PageContent]>> = None;

        for source in &self.preferred {
            let source_pages = if source.needs_pages() {
                loaded(&mut pages, &mut loader)?
            } else {
                &[]
            };
            match source.price_table(source_pages, config) {
                Ok(table) if !table.is_empty() => {
                    log::info!(
                        "using price source '{}' ({} cell(s))",
                        source.name(),
                        table.len()
                    );
                    return Ok(ResolvedPrices {
                        source_name: source.name().to_string(),
                        table,
                    });
                }
                Ok(_) => {
                    log::warn!("price source '{}' returned an empty table", source.name())
                }
                Err(e) => log::warn!("price source '{}' failed: {e}", source.name()),
            }
        }

        let pages = loaded(&mut pages, &mut loader)?;
        let table = self.fallback.price_table(pages, config)?;
        log::info!(
            "using price source '{}' ({} cell(s))",
            self.fallback.name(),
            table.len()
        );
        Ok(ResolvedPrices {
            source_name: self.fallback.name().to_string(),
            table,
        })
    }
}

fn loaded<'p, 'a, F>(
    pages: &'p mut Option<Cow<'a, [PageContent]>>,
    loader: &mut Option<F>,
) -> Result<&'p [PageContent], FerroError>
where
    F: FnOnce() -> Result<Cow<'a, [PageContent]>, FerroError>,
{
    if pages.is_none() {
        if let Some(load) = loader.take() {
            *pages = Some(load()?);
        }
    }
    Ok(pages.as_deref().unwrap_or(&[]))
}

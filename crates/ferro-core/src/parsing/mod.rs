pub mod normalize;
pub mod prices;
pub mod section;
pub mod values;

use crate::config::schema::LevyConfig;
use crate::error::FerroError;
use crate::extraction::linearize::linearize;
use crate::extraction::PageContent;
use crate::model::{Commodity, Grade, PriceTable};
use serde::{Deserialize, Serialize};

/// A section line that matched a grade pattern but produced no new cell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedLine {
    pub line_text: String,
    pub reason: String,
}

/// Result of the deterministic gazette parse, with diagnostics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParsedPrices {
    pub table: PriceTable,
    /// Number of lines in the isolated jurisdiction section.
    pub section_lines: usize,
    /// Cells recorded as zero because the gazette printed "NA".
    pub na_cells: Vec<(Commodity, Grade)>,
    pub skipped_lines: Vec<SkippedLine>,
}

impl ParsedPrices {
    pub fn section_found(&self) -> bool {
        self.section_lines > 0
    }
}

/// Run the deterministic extraction: linearize, isolate the configured
/// jurisdiction, parse its price table.
///
/// A missing section or unparseable rows degrade to an empty or partial
/// table. Only a document without any text is an error.
pub fn extract_prices(
    pages: &[PageContent],
    config: &LevyConfig,
) -> Result<ParsedPrices, FerroError> {
    let lines = linearize(pages);
    if lines.is_empty() {
        return Err(FerroError::ParseError(
            "no text content found in gazette".into(),
        ));
    }

    let section = section::locate_section(
        &lines,
        &config.jurisdiction,
        &config.known_jurisdictions,
        config.fallback_window_chars,
    );

    let parsed = prices::parse_price_table(&section);
    if parsed.table.is_empty() {
        log::warn!(
            "no prices parsed for '{}' ({} section line(s))",
            config.jurisdiction,
            parsed.section_lines
        );
    } else {
        log::info!(
            "parsed {} price cell(s) for '{}' ({} marked NA)",
            parsed.table.len(),
            config.jurisdiction,
            parsed.na_cells.len()
        );
    }

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::builtin::load_preset;
    use rust_decimal_macros::dec;

    fn page(lines: &[&str]) -> PageContent {
        PageContent::from_lines(1, lines.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_extract_prices_goa_block() {
        let cfg = load_preset("goa").unwrap();
        let pages = vec![page(&[
            "Karnataka",
            "Lumps",
            "60% to below 62% Fe 5,100",
            "Goa",
            "Lumps",
            "60% to below 62% Fe 3,200",
            "Maharashtra",
        ])];
        let parsed = extract_prices(&pages, &cfg).unwrap();
        assert!(parsed.section_found());
        assert_eq!(parsed.table.get(Commodity::Lumps, Grade::D), Some(dec!(3200)));
        assert_eq!(parsed.table.len(), 1);
    }

    #[test]
    fn test_extract_prices_missing_section() {
        let cfg = load_preset("goa").unwrap();
        let pages = vec![page(&["Odisha", "Lumps", "60-62 4,000"])];
        let parsed = extract_prices(&pages, &cfg).unwrap();
        assert!(!parsed.section_found());
        assert!(parsed.table.is_empty());
    }

    #[test]
    fn test_extract_prices_empty_document() {
        let cfg = load_preset("goa").unwrap();
        let pages = vec![page(&[])];
        assert!(matches!(
            extract_prices(&pages, &cfg),
            Err(FerroError::ParseError(_))
        ));
    }
}

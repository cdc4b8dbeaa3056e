pub mod assess;
pub mod config;
pub mod error;
pub mod extraction;
pub mod model;
pub mod output;
pub mod parsing;
pub mod records;
pub mod source;

use std::borrow::Cow;

use assess::engine::{assess_records, LevyRates};
use assess::outcome::Assessment;
use config::schema::LevyConfig;
use error::FerroError;
use extraction::{PageContent, PdfExtractor};
use parsing::ParsedPrices;
use records::RecordSet;
use source::{PriceSourceChain, ResolvedPrices};

/// Main API entry point: assess a record set against a gazette PDF.
///
/// The price table is resolved once through the chain and shared across all
/// records. The PDF is only extracted when a consulted source reads pages.
/// Record-level problems are reported per record in the assessment; only
/// document and configuration failures are errors.
pub fn assess_gazette(
    pdf_bytes: &[u8],
    extractor: &dyn PdfExtractor,
    records: &RecordSet,
    chain: &PriceSourceChain,
    config: &LevyConfig,
) -> Result<Assessment, FerroError> {
    let resolved = chain.resolve_with(
        || {
            let pages = extractor.extract_pages(pdf_bytes)?;
            log::info!(
                "extracted {} page(s) with {}",
                pages.len(),
                extractor.backend_name()
            );
            Ok(Cow::Owned(pages))
        },
        config,
    )?;
    Ok(build_assessment(resolved, records, config))
}

/// Assess a record set against already-extracted gazette pages.
pub fn assess_pages(
    pages: &[PageContent],
    records: &RecordSet,
    chain: &PriceSourceChain,
    config: &LevyConfig,
) -> Result<Assessment, FerroError> {
    let resolved = chain.resolve(pages, config)?;
    Ok(build_assessment(resolved, records, config))
}

fn build_assessment(
    resolved: ResolvedPrices,
    records: &RecordSet,
    config: &LevyConfig,
) -> Assessment {
    let rates = LevyRates::from_config(config);
    let assessed = assess_records(&records.records, &resolved.table, &rates);

    Assessment {
        jurisdiction: config.jurisdiction.clone(),
        price_source: resolved.source_name,
        price_table: resolved.table,
        headers: records.headers.clone(),
        records: assessed,
    }
}

/// Extract only the deterministic price table, with parse diagnostics.
pub fn extract_gazette_prices(
    pdf_bytes: &[u8],
    extractor: &dyn PdfExtractor,
    config: &LevyConfig,
) -> Result<ParsedPrices, FerroError> {
    let pages = extractor.extract_pages(pdf_bytes)?;
    parsing::extract_prices(&pages, config)
}

use ferro_core::error::FerroError;
use ferro_core::extraction::pdftotext::PdftotextExtractor;
use ferro_core::records::read_records_file;
use ferro_core::source::{PrecomputedPrices, PriceSourceChain};
use std::path::PathBuf;

use crate::output;
use crate::ConfigArgs;

pub fn run(
    gazette: PathBuf,
    records_file: PathBuf,
    config_args: &ConfigArgs,
    prices_file: Option<PathBuf>,
    output_format: &str,
    output_file: Option<PathBuf>,
) -> Result<(), FerroError> {
    let config = super::load_config(config_args)?;
    let records = read_records_file(&records_file, &config.columns)?;

    let mut chain = PriceSourceChain::deterministic();
    if let Some(ref path) = prices_file {
        chain = chain.with_source(Box::new(PrecomputedPrices::from_file(path)?));
    }

    let pdf_bytes = std::fs::read(&gazette)?;
    let extractor = PdftotextExtractor::new();
    let assessment =
        ferro_core::assess_gazette(&pdf_bytes, &extractor, &records, &chain, &config)?;

    match output_file {
        Some(path) => {
            if output_format == "json" {
                std::fs::write(&path, ferro_core::output::to_json(&assessment)?)?;
            } else {
                let file = std::fs::File::create(&path)?;
                ferro_core::output::write_csv(&assessment, file)?;
            }
            eprintln!(
                "Assessed {} record(s), written to {}",
                assessment.records.len(),
                path.display()
            );
            let flagged = assessment.flagged().count();
            if flagged > 0 {
                eprintln!("  {flagged} record(s) need review");
            }
        }
        None => match output_format {
            "json" => output::json::print(&assessment)?,
            "csv" => ferro_core::output::write_csv(&assessment, std::io::stdout().lock())?,
            _ => output::table::print_assessment(&assessment),
        },
    }

    Ok(())
}

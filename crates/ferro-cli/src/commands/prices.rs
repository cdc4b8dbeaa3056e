use ferro_core::error::FerroError;
use ferro_core::extraction::pdftotext::PdftotextExtractor;
use std::path::PathBuf;

use crate::output;
use crate::ConfigArgs;

pub fn run(gazette: PathBuf, config_args: &ConfigArgs, output_format: &str) -> Result<(), FerroError> {
    let config = super::load_config(config_args)?;
    let pdf_bytes = std::fs::read(&gazette)?;
    let extractor = PdftotextExtractor::new();
    let parsed = ferro_core::extract_gazette_prices(&pdf_bytes, &extractor, &config)?;

    match output_format {
        "json" => output::json::print(&parsed)?,
        _ => print!("{}", output::table::format_prices(&parsed, &config.jurisdiction)),
    }

    Ok(())
}

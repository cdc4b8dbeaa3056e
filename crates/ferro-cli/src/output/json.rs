use ferro_core::error::FerroError;
use serde::Serialize;

pub fn print<T: Serialize>(result: &T) -> Result<(), FerroError> {
    let json = serde_json::to_string_pretty(result)?;
    println!("{json}");
    Ok(())
}

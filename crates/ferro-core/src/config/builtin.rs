use crate::config::schema::LevyConfig;
use crate::config::validate_config;
use crate::error::FerroError;

const GOA_JSON: &str = include_str!("../../../../presets/goa.json");

/// Available predefined jurisdiction configs.
pub const PRESETS: &[&str] = &["goa"];

/// Load a predefined config by name.
pub fn load_preset(name: &str) -> Result<LevyConfig, FerroError> {
    match name.to_lowercase().as_str() {
        "goa" => {
            let config: LevyConfig = serde_json::from_str(GOA_JSON)?;
            validate_config(&config)?;
            Ok(config)
        }
        _ => Err(FerroError::ConfigInvalid(format!(
            "unknown preset '{}'. Available: {}",
            name,
            PRESETS.join(", ")
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_load_goa_preset() {
        let cfg = load_preset("goa").unwrap();
        assert_eq!(cfg.jurisdiction, "Goa");
        assert_eq!(cfg.royalty_rate, dec!(0.15));
        assert_eq!(cfg.development_fee_rate, dec!(0.30));
        assert!(cfg.known_jurisdictions.iter().any(|j| j == "Karnataka"));
    }

    #[test]
    fn test_preset_name_is_case_insensitive() {
        assert!(load_preset("GOA").is_ok());
    }

    #[test]
    fn test_unknown_preset() {
        assert!(load_preset("xyz").is_err());
    }
}

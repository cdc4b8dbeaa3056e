pub mod builtin;
pub mod schema;

use crate::error::FerroError;
use rust_decimal::Decimal;
use schema::LevyConfig;
use std::path::Path;

/// Load a config from a JSON file.
pub fn load_config(path: &Path) -> Result<LevyConfig, FerroError> {
    let content = std::fs::read_to_string(path).map_err(|e| FerroError::ConfigLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_config(&content, path)
}

/// Parse a config from a JSON string.
pub fn parse_config(json: &str, source: &Path) -> Result<LevyConfig, FerroError> {
    let config: LevyConfig = serde_json::from_str(json).map_err(|e| FerroError::ConfigLoad {
        path: source.to_path_buf(),
        reason: e.to_string(),
    })?;
    validate_config(&config)?;
    Ok(config)
}

/// Parse a config from a JSON string (no file path context).
pub fn parse_config_str(json: &str) -> Result<LevyConfig, FerroError> {
    let config: LevyConfig = serde_json::from_str(json).map_err(FerroError::Json)?;
    validate_config(&config)?;
    Ok(config)
}

/// Validate that a config is well-formed.
pub fn validate_config(config: &LevyConfig) -> Result<(), FerroError> {
    if config.jurisdiction.trim().is_empty() {
        return Err(FerroError::ConfigInvalid(
            "jurisdiction must not be empty".into(),
        ));
    }

    if config.fallback_window_chars == 0 {
        return Err(FerroError::ConfigInvalid(
            "fallback_window_chars must be greater than zero".into(),
        ));
    }

    for (field, rate) in [
        ("royalty_rate", config.royalty_rate),
        ("development_fee_rate", config.development_fee_rate),
    ] {
        if rate < Decimal::ZERO || rate > Decimal::ONE {
            return Err(FerroError::ConfigInvalid(format!(
                "{field} must be between 0 and 1, got {rate}"
            )));
        }
    }

    if let Some(empty) = config
        .known_jurisdictions
        .iter()
        .find(|j| j.trim().is_empty())
    {
        return Err(FerroError::ConfigInvalid(format!(
            "known_jurisdictions contains an empty name ({empty:?})"
        )));
    }

    let columns = &config.columns;
    if columns.quantity.trim().is_empty() {
        return Err(FerroError::ConfigInvalid(
            "columns.quantity must not be empty".into(),
        ));
    }
    if columns.commodity.is_empty() || columns.commodity.iter().any(|h| h.trim().is_empty()) {
        return Err(FerroError::ConfigInvalid(
            "columns.commodity must list at least one non-empty header hint".into(),
        ));
    }
    if columns.grade.is_empty() || columns.grade.iter().any(|h| h.trim().is_empty()) {
        return Err(FerroError::ConfigInvalid(
            "columns.grade must list at least one non-empty header hint".into(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_minimal_config_uses_defaults() {
        let json = r#"{
            "name": "Test",
            "version": "1.0",
            "jurisdiction": "Goa"
        }"#;
        let cfg = parse_config_str(json).unwrap();
        assert_eq!(cfg.jurisdiction, "Goa");
        assert_eq!(cfg.fallback_window_chars, 4000);
        assert_eq!(cfg.royalty_rate, dec!(0.15));
        assert_eq!(cfg.development_fee_rate, dec!(0.30));
        assert_eq!(cfg.columns.quantity, "quantity");
        assert!(cfg.known_jurisdictions.is_empty());
    }

    #[test]
    fn test_empty_jurisdiction_rejected() {
        let json = r#"{ "name": "Bad", "version": "1.0", "jurisdiction": "  " }"#;
        assert!(parse_config_str(json).is_err());
    }

    #[test]
    fn test_rate_out_of_range_rejected() {
        let json = r#"{
            "name": "Bad",
            "version": "1.0",
            "jurisdiction": "Goa",
            "royalty_rate": "1.5"
        }"#;
        assert!(matches!(
            parse_config_str(json),
            Err(FerroError::ConfigInvalid(_))
        ));
    }

    #[test]
    fn test_zero_window_rejected() {
        let json = r#"{
            "name": "Bad",
            "version": "1.0",
            "jurisdiction": "Goa",
            "fallback_window_chars": 0
        }"#;
        assert!(parse_config_str(json).is_err());
    }

    #[test]
    fn test_empty_grade_hints_rejected() {
        let json = r#"{
            "name": "Bad",
            "version": "1.0",
            "jurisdiction": "Goa",
            "columns": { "grade": [] }
        }"#;
        assert!(parse_config_str(json).is_err());
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("odisha.json");
        std::fs::write(
            &path,
            r#"{ "name": "Odisha", "version": "1.0", "jurisdiction": "Odisha" }"#,
        )
        .unwrap();
        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.jurisdiction, "Odisha");
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = load_config(Path::new("/nonexistent/levy.json")).unwrap_err();
        assert!(matches!(err, FerroError::ConfigLoad { .. }));
    }
}

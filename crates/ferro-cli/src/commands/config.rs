use ferro_core::config::builtin;
use ferro_core::config::schema::LevyConfig;
use ferro_core::error::FerroError;
use ferro_core::model::Grade;
use rust_decimal::Decimal;
use std::path::Path;

pub fn list() -> Result<(), FerroError> {
    println!("Available predefined configurations:\n");
    for name in builtin::PRESETS {
        let cfg = builtin::load_preset(name)?;
        println!(
            "  {:<8} {} (v{}) [{}]",
            name, cfg.name, cfg.version, cfg.jurisdiction
        );
        if let Some(ref desc) = cfg.description {
            println!("           {}", desc);
        }
        println!();
    }
    Ok(())
}

pub fn explain(preset: &str) -> Result<(), FerroError> {
    let cfg = builtin::load_preset(preset)?;

    println!("{} (version {})\n", cfg.name, cfg.version);
    if let Some(ref desc) = cfg.description {
        println!("{}\n", desc);
    }

    println!(
        "Prices are read from the '{}' block of the gazette. The block ends at",
        cfg.jurisdiction
    );
    println!(
        "the next of {} other jurisdiction name(s), or after {} characters.\n",
        cfg.known_jurisdictions
            .iter()
            .filter(|j| !j.eq_ignore_ascii_case(&cfg.jurisdiction))
            .count(),
        cfg.fallback_window_chars
    );

    println!("Grades:\n");
    for grade in Grade::ALL {
        println!("  {}  {}", grade.code(), grade.label());
    }
    println!();

    println!("Levies:\n");
    println!(
        "  Royalty           {}% of base value (quantity x price)",
        percent(cfg.royalty_rate)
    );
    println!(
        "  Development fee   {}% of royalty",
        percent(cfg.development_fee_rate)
    );
    println!();

    println!("Record sheet columns:\n");
    println!("  quantity   header containing '{}'", cfg.columns.quantity);
    println!("  commodity  header containing any of: {}", cfg.columns.commodity.join(", "));
    println!("  grade      header containing any of: {}", cfg.columns.grade.join(", "));
    println!();

    Ok(())
}

pub fn validate(file: &Path) -> Result<(), FerroError> {
    let cfg = ferro_core::config::load_config(file)?;

    println!("Configuration '{}' (v{}) is valid.", cfg.name, cfg.version);
    println!("  Jurisdiction: {}", cfg.jurisdiction);
    println!(
        "  Rates: royalty {}%, development fee {}%",
        percent(cfg.royalty_rate),
        percent(cfg.development_fee_rate)
    );

    let warnings = config_warnings(&cfg);
    if !warnings.is_empty() {
        println!("\nWarnings:");
        for w in &warnings {
            println!("  - {}", w);
        }
    }

    Ok(())
}

fn config_warnings(cfg: &LevyConfig) -> Vec<String> {
    let mut warnings = Vec::new();
    if cfg.known_jurisdictions.is_empty() {
        warnings.push(format!(
            "no known jurisdictions listed; the '{}' block always runs to the {}-character window",
            cfg.jurisdiction, cfg.fallback_window_chars
        ));
    } else if !cfg
        .known_jurisdictions
        .iter()
        .any(|j| j.eq_ignore_ascii_case(&cfg.jurisdiction))
    {
        warnings.push(format!(
            "jurisdiction '{}' is not in the known jurisdiction list",
            cfg.jurisdiction
        ));
    }
    warnings
}

fn percent(rate: Decimal) -> Decimal {
    (rate * Decimal::ONE_HUNDRED).normalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_goa_preset_has_no_warnings() {
        let cfg = builtin::load_preset("goa").unwrap();
        assert!(config_warnings(&cfg).is_empty());
    }

    #[test]
    fn test_unlisted_jurisdiction_warns() {
        let mut cfg = builtin::load_preset("goa").unwrap();
        cfg.jurisdiction = "Atlantis".into();
        assert_eq!(config_warnings(&cfg).len(), 1);
    }

    #[test]
    fn test_percent() {
        assert_eq!(percent(Decimal::new(15, 2)).to_string(), "15");
    }
}

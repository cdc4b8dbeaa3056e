pub mod assess;
pub mod config;
pub mod prices;

use ferro_core::config::builtin;
use ferro_core::config::schema::LevyConfig;
use ferro_core::error::FerroError;

use crate::ConfigArgs;

/// Resolve the configuration selected on the command line.
pub fn load_config(args: &ConfigArgs) -> Result<LevyConfig, FerroError> {
    let mut config = match (&args.config, &args.preset) {
        (Some(path), _) => ferro_core::config::load_config(path)?,
        (None, Some(name)) => builtin::load_preset(name)?,
        (None, None) => builtin::load_preset("goa")?,
    };

    if let Some(ref jurisdiction) = args.jurisdiction {
        config.jurisdiction = jurisdiction.clone();
        ferro_core::config::validate_config(&config)?;
    }

    log::info!(
        "configuration '{}' (v{}), jurisdiction '{}'",
        config.name,
        config.version,
        config.jurisdiction
    );
    Ok(config)
}

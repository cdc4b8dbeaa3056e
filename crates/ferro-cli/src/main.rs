mod commands;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "ferro",
    version,
    about = "Mineral royalty and development-fee assessment from price gazettes"
)]
struct Cli {
    /// Log progress (-v) or parser internals (-vv) to stderr
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Assess a dispatch record sheet (XLSX/XLS/ODS or CSV) against a price gazette PDF
    Assess {
        /// Path to the price gazette PDF
        gazette: PathBuf,

        /// Path to the record sheet
        records: PathBuf,

        #[command(flatten)]
        config: ConfigArgs,

        /// Precomputed price table (JSON) consulted before the gazette parser
        #[arg(long, value_name = "FILE")]
        prices: Option<PathBuf>,

        /// Output format: table (default), json or csv
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Write CSV (or JSON with -o json) to a file instead of stdout
        #[arg(short = 'O', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// Extract the price table from a gazette PDF (without assessing records)
    Prices {
        /// Path to the price gazette PDF
        gazette: PathBuf,

        #[command(flatten)]
        config: ConfigArgs,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Inspect and validate assessment configurations
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Configuration selection shared by the gazette subcommands.
#[derive(clap::Args)]
pub struct ConfigArgs {
    /// Predefined configuration (default: goa)
    #[arg(short, long, value_name = "NAME", conflicts_with = "config")]
    pub preset: Option<String>,

    /// Custom JSON configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Override the configured jurisdiction
    #[arg(short, long, value_name = "NAME")]
    pub jurisdiction: Option<String>,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// List predefined configurations
    List,
    /// Explain a configuration in plain language
    Explain {
        /// Preset name (e.g., "goa")
        preset: String,
    },
    /// Validate a custom configuration file
    Validate {
        /// Path to JSON configuration file
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();

    let result = match cli.command {
        Commands::Assess {
            gazette,
            records,
            config,
            prices,
            output,
            out,
        } => commands::assess::run(gazette, records, &config, prices, &output, out),
        Commands::Prices {
            gazette,
            config,
            output,
        } => commands::prices::run(gazette, &config, &output),
        Commands::Config { action } => match action {
            ConfigAction::List => commands::config::list(),
            ConfigAction::Explain { preset } => commands::config::explain(&preset),
            ConfigAction::Validate { file } => commands::config::validate(&file),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

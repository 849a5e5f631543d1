use clap::{Parser, Subcommand, ValueEnum};

use crate::export::ExportFormat;

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Portfolio transaction export CLI", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the portfolio's wallets and its base currency
    Wallets {
        #[arg(
            short,
            long,
            help = "Path to the configuration file",
            default_value = "config/config.toml"
        )]
        config_file: String,
        #[arg(short, long, help = "Override the API base URL")]
        base_url: Option<String>,
        #[arg(long, help = "API session token (overrides configuration)")]
        auth_token: Option<String>,
        #[arg(long, help = "Portfolio token (overrides configuration)")]
        portfolio_token: Option<String>,
    },
    /// Export transaction history to CSV and/or JSON files
    Export {
        #[arg(
            short,
            long,
            help = "Path to the configuration file",
            default_value = "config/config.toml"
        )]
        config_file: String,
        #[arg(short, long, help = "Override the API base URL")]
        base_url: Option<String>,
        #[arg(long, help = "API session token (overrides configuration)")]
        auth_token: Option<String>,
        #[arg(long, help = "Portfolio token (overrides configuration)")]
        portfolio_token: Option<String>,
        #[arg(
            short,
            long,
            help = "Wallet to export, by numeric id or by name. Can be specified multiple times."
        )]
        wallet: Vec<String>,
        #[arg(short = 'a', long, help = "Export the combined history across all wallets")]
        all_transactions: bool,
        #[arg(short, long, value_enum, default_value = "both", help = "Output format")]
        format: Format,
        #[arg(
            short,
            long,
            help = "Directory to write export files to (overrides configuration)"
        )]
        output_dir: Option<String>,
    },
}

/// Format selection as exposed on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Csv,
    Json,
    Both,
}

impl Format {
    pub fn export_formats(self) -> Vec<ExportFormat> {
        match self {
            Format::Csv => vec![ExportFormat::Csv],
            Format::Json => vec![ExportFormat::Json],
            Format::Both => vec![ExportFormat::Csv, ExportFormat::Json],
        }
    }
}

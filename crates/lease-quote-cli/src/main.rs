mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::path::PathBuf;
use std::process;

use commands::aggregate::AggregateArgs;
use commands::catalog::{CompaniesArgs, ConditionsArgs};
use commands::quote::QuoteArgs;
use commands::rank::RankArgs;
use commands::residual::ResidualArgs;
use commands::tabulated::TabulatedArgs;
use commands::tax::AcquisitionTaxArgs;
use input::DataPaths;

/// Vehicle lease and rental quote comparison
#[derive(Parser)]
#[command(
    name = "lq",
    version,
    about = "Vehicle lease and rental quote comparison",
    long_about = "A CLI for pricing operating leases and long-term rentals with decimal \
                  precision. Replicates one institution's quotation spreadsheet, prices \
                  every company from averaged rate parameters, and ranks the results."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Residual-value tables file
    #[arg(
        long,
        global = true,
        env = "LQ_RESIDUAL_TABLES",
        default_value = "data/residual_tables.json"
    )]
    residual_tables: PathBuf,

    /// Company rate parameters file
    #[arg(
        long,
        global = true,
        env = "LQ_RATE_PARAMS",
        default_value = "data/rate_params.json"
    )]
    rate_params: PathBuf,

    /// Pricing assumptions override (JSON or YAML)
    #[arg(long, global = true, env = "LQ_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Formula-replica lease or rental quote
    Quote(QuoteArgs),
    /// Quote one company from its averaged rate parameters
    TabulatedQuote(TabulatedArgs),
    /// Rank every company for the product, cheapest first
    Rank(RankArgs),
    /// Look up a residual rate, or list a provider's grades
    ResidualRate(ResidualArgs),
    /// Acquisition and registration taxes for a vehicle price
    AcquisitionTax(AcquisitionTaxArgs),
    /// List companies, periods and residual providers
    Companies(CompaniesArgs),
    /// Show a company's stored rate conditions
    Conditions(ConditionsArgs),
    /// Build a rate parameters file from raw quote samples
    Aggregate(AggregateArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let paths = DataPaths {
        residual_tables: cli.residual_tables,
        rate_params: cli.rate_params,
        config: cli.config,
    };

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Quote(args) => commands::quote::run_quote(args, &paths),
        Commands::TabulatedQuote(args) => commands::tabulated::run_tabulated_quote(args, &paths),
        Commands::Rank(args) => commands::rank::run_rank(args, &paths),
        Commands::ResidualRate(args) => commands::residual::run_residual_rate(args, &paths),
        Commands::AcquisitionTax(args) => commands::tax::run_acquisition_tax(args, &paths),
        Commands::Companies(args) => commands::catalog::run_companies(args, &paths),
        Commands::Conditions(args) => commands::catalog::run_conditions(args, &paths),
        Commands::Aggregate(args) => commands::aggregate::run_aggregate(args),
        Commands::Version => {
            println!("lq {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}

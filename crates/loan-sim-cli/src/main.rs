mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing::Level;

use commands::affordability::AffordabilityArgs;
use commands::catalog::LoanTypesArgs;
use commands::simulate::{CompareArgs, SimulateArgs, ValidateArgs};

/// Loan amortization and repayment-schedule simulator
#[derive(Parser)]
#[command(
    name = "loansim",
    version,
    about = "Loan amortization and repayment-schedule simulator",
    long_about = "A CLI for simulating retail loans with decimal precision. Builds \
                  month-by-month schedules under flat, effective and fixed-then-floating \
                  interest, with DTI risk metrics and affordability sizing."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Increase diagnostic logging on stderr (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a repayment schedule and loan summary
    Simulate(SimulateArgs),
    /// Check a loan request without computing a schedule
    Validate(ValidateArgs),
    /// Compare flat and effective interest on the same loan
    Compare(CompareArgs),
    /// Size the largest loan within a DTI ceiling
    Affordability(AffordabilityArgs),
    /// List loan types with tenor ceilings and default rates
    LoanTypes(LoanTypesArgs),
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

fn init_tracing(verbose: u8) -> Result<(), Box<dyn std::error::Error>> {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = tracing_subscriber::fmt()
        .compact()
        .with_level(true)
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(cli.verbose) {
        eprintln!("{}: failed to initialise logging: {}", "warning".yellow().bold(), e);
    }

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Simulate(args) => commands::simulate::run_simulate(args),
        Commands::Validate(args) => commands::simulate::run_validate(args),
        Commands::Compare(args) => commands::simulate::run_compare(args),
        Commands::Affordability(args) => commands::affordability::run_affordability(args),
        Commands::LoanTypes(args) => commands::catalog::run_loan_types(args),
        Commands::Version => {
            println!("loansim {}", env!("CARGO_PKG_VERSION"));
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

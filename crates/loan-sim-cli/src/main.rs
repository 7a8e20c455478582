mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::affordability::AffordabilityArgs;
use commands::consolidation::ConsolidationArgs;
use commands::effort::EffortRateArgs;
use commands::loans::{AutoLoanArgs, PersonalLoanArgs};
use commands::mortgage::MortgageArgs;
use commands::policy::AgeTermArgs;
use output::OutputFormat;

/// Loan payment and affordability simulators
#[derive(Parser)]
#[command(
    name = "simula",
    version,
    about = "Loan payment and affordability simulators",
    long_about = "Estimate monthly payments and totals for auto, personal and mortgage \
                  loans, compare debt consolidation offers, check the effort rate \
                  (debt-to-income) and size the largest affordable loan. All amounts \
                  are computed with decimal precision."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Rate table and policy overrides (JSON, or YAML for .yaml/.yml)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Log diagnostics to stderr (same as RUST_LOG=debug)
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Effort rate (share of income committed to loan payments)
    EffortRate(EffortRateArgs),
    /// Auto loan payment on vehicle value less down payment
    AutoLoan(AutoLoanArgs),
    /// Personal loan payment
    PersonalLoan(PersonalLoanArgs),
    /// Mortgage payment with age-capped term and effort check
    Mortgage(MortgageArgs),
    /// Consolidate several loans into one
    Consolidation(ConsolidationArgs),
    /// Largest loan the income allows under the effort cap
    Affordability(AffordabilityArgs),
    /// Maximum loan term for an applicant age
    AgeTerm(AgeTermArgs),
    /// Show the effective rate table and policies
    Rates,
    /// Print version information
    Version,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match input::config::load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    };

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::EffortRate(args) => commands::effort::run_effort_rate(args, &config),
        Commands::AutoLoan(args) => commands::loans::run_auto_loan(args, &config),
        Commands::PersonalLoan(args) => commands::loans::run_personal_loan(args, &config),
        Commands::Mortgage(args) => commands::mortgage::run_mortgage(args, &config),
        Commands::Consolidation(args) => commands::consolidation::run_consolidation(args, &config),
        Commands::Affordability(args) => commands::affordability::run_affordability(args, &config),
        Commands::AgeTerm(args) => commands::policy::run_age_term(args, &config),
        Commands::Rates => commands::policy::run_rates(&config),
        Commands::Version => {
            println!("simula {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            tracing::debug!("simulation complete");
            cli.output.render(&value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = %e, "simulation rejected");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}

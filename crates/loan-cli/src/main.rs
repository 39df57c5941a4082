mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::compare::CompareArgs;
use commands::loan::{AmortizeArgs, SplitArgs, SummaryArgs};
use commands::Report;

/// Amortizing loan analytics
#[derive(Parser)]
#[command(
    name = "loan",
    version,
    about = "Amortizing loan analytics with decimal precision",
    long_about = "A CLI for analysing amortizing loans with decimal precision. \
                  Computes the fixed periodic payment, the full amortization \
                  schedule, derived metrics (APR, APY, interest ratios, tipping \
                  point), payment splits, and side-by-side loan comparisons."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the full amortization schedule for a loan
    Amortize(AmortizeArgs),
    /// Summarise a loan: payment, APR/APY, totals, tipping point
    Summary(SummaryArgs),
    /// Split an arbitrary payment into interest and principal at a period
    Split(SplitArgs),
    /// Compare several loans side by side
    Compare(CompareArgs),
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
    let cli = Cli::parse();

    let result: Result<Report, Box<dyn std::error::Error>> = match cli.command {
        Commands::Amortize(args) => commands::loan::run_amortize(args),
        Commands::Summary(args) => commands::loan::run_summary(args),
        Commands::Split(args) => commands::loan::run_split(args),
        Commands::Compare(args) => commands::compare::run_compare(args),
        Commands::Version => {
            println!("loan {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(report) => {
            output::render(&cli.output, &report);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}

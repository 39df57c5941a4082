use clap::Args;

use loan_core::comparison;

use crate::commands::Report;
use crate::input;

/// Arguments for the side-by-side loan comparison
#[derive(Args)]
pub struct CompareArgs {
    /// Path to a JSON file holding an array of loan inputs
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_compare(args: CompareArgs) -> Result<Report, Box<dyn std::error::Error>> {
    let inputs = if let Some(ref path) = args.input {
        input::file::read_loan_inputs(path)?
    } else if let Some(piped) = input::stdin::read_loan_inputs()? {
        piped
    } else {
        return Err("--input file with an array of loans is required for comparison".into());
    };

    Ok(Report::Comparison(comparison::compare(&inputs)?))
}

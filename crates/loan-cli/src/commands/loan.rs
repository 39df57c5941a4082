use clap::{Args, ValueEnum};
use rust_decimal::Decimal;

use loan_core::loan::{self, Compounding, LoanInput, TermUnit};
use loan_core::types::Currency;
use loan_core::ComputationOutput;

use crate::commands::Report;
use crate::input;

/// Loan parameters shared by the single-loan subcommands.
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct LoanArgs {
    /// Path to a JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Listed price of the financed asset
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Nominal annual rate as a fraction (0.06 = 6%)
    #[arg(long)]
    pub interest: Option<Decimal>,

    /// Term, interpreted in years for the period count
    #[arg(long)]
    pub term: Option<Decimal>,

    /// Unit the term was quoted in (informational)
    #[arg(long, value_enum)]
    pub term_unit: Option<TermUnitArg>,

    /// Compounding frequency
    #[arg(long, value_enum)]
    pub compounded: Option<CompoundingArg>,

    /// Display currency code (USD, GBP, ...)
    #[arg(long)]
    pub currency: Option<String>,

    /// Downpayment, subtracted from the principal
    #[arg(long)]
    pub downpayment: Option<Decimal>,
}

#[derive(Args)]
pub struct AmortizeArgs {
    #[command(flatten)]
    pub loan: LoanArgs,
}

#[derive(Args)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub loan: LoanArgs,
}

#[derive(Args)]
pub struct SplitArgs {
    #[command(flatten)]
    pub loan: LoanArgs,

    /// Period the payment is applied at (1-indexed)
    #[arg(long)]
    pub period: u32,

    /// Payment amount to split
    #[arg(long)]
    pub amount: Decimal,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum TermUnitArg {
    Days,
    Months,
    Years,
}

impl From<TermUnitArg> for TermUnit {
    fn from(arg: TermUnitArg) -> Self {
        match arg {
            TermUnitArg::Days => TermUnit::Days,
            TermUnitArg::Months => TermUnit::Months,
            TermUnitArg::Years => TermUnit::Years,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CompoundingArg {
    Daily,
    Monthly,
    Annually,
}

impl From<CompoundingArg> for Compounding {
    fn from(arg: CompoundingArg) -> Self {
        match arg {
            CompoundingArg::Daily => Compounding::Daily,
            CompoundingArg::Monthly => Compounding::Monthly,
            CompoundingArg::Annually => Compounding::Annually,
        }
    }
}

/// Resolve the loan input from file, piped stdin, or individual flags.
pub fn resolve_loan_input(args: &LoanArgs) -> Result<LoanInput, Box<dyn std::error::Error>> {
    if let Some(ref path) = args.input {
        return input::file::read_loan_input(path);
    }
    if let Some(piped) = input::stdin::read_loan_input()? {
        return Ok(piped);
    }

    Ok(LoanInput {
        principal: args
            .principal
            .ok_or("--principal is required (or provide --input)")?,
        interest: args
            .interest
            .ok_or("--interest is required (or provide --input)")?,
        term: args.term.ok_or("--term is required (or provide --input)")?,
        term_unit: args.term_unit.map(Into::into).unwrap_or_default(),
        compounded: args.compounded.map(Into::into).unwrap_or_default(),
        currency: args
            .currency
            .as_deref()
            .map(Currency::from_code)
            .unwrap_or_default(),
        downpayment: args.downpayment.unwrap_or(Decimal::ZERO),
    })
}

pub fn run_amortize(args: AmortizeArgs) -> Result<Report, Box<dyn std::error::Error>> {
    let loan_input = resolve_loan_input(&args.loan)?;
    Ok(Report::Analysis(loan::analyze(&loan_input)?))
}

pub fn run_summary(args: SummaryArgs) -> Result<Report, Box<dyn std::error::Error>> {
    let loan_input = resolve_loan_input(&args.loan)?;
    let out = loan::analyze(&loan_input)?;

    // Same computation as `amortize`, reported without the schedule.
    let ComputationOutput {
        result,
        methodology,
        assumptions,
        warnings,
        metadata,
    } = out;
    Ok(Report::Summary(ComputationOutput {
        result: result.summary,
        methodology,
        assumptions,
        warnings,
        metadata,
    }))
}

pub fn run_split(args: SplitArgs) -> Result<Report, Box<dyn std::error::Error>> {
    let loan_input = resolve_loan_input(&args.loan)?;
    Ok(Report::Split(loan::split(
        &loan_input,
        args.period,
        args.amount,
    )?))
}

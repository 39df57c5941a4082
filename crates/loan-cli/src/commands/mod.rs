pub mod compare;
pub mod loan;

use loan_core::comparison::ComparisonOutput;
use loan_core::loan::{LoanAnalysis, LoanSummary, PaymentSplit};
use loan_core::ComputationOutput;

/// Typed reports the output formatters render.
pub enum Report {
    Analysis(ComputationOutput<LoanAnalysis>),
    Summary(ComputationOutput<LoanSummary>),
    Split(ComputationOutput<PaymentSplit>),
    Comparison(ComputationOutput<ComparisonOutput>),
}

impl Report {
    pub fn to_value(&self) -> serde_json::Value {
        match self {
            Report::Analysis(out) => serde_json::to_value(out).unwrap_or_default(),
            Report::Summary(out) => serde_json::to_value(out).unwrap_or_default(),
            Report::Split(out) => serde_json::to_value(out).unwrap_or_default(),
            Report::Comparison(out) => serde_json::to_value(out).unwrap_or_default(),
        }
    }

    pub fn warnings(&self) -> &[String] {
        match self {
            Report::Analysis(out) => &out.warnings,
            Report::Summary(out) => &out.warnings,
            Report::Split(out) => &out.warnings,
            Report::Comparison(out) => &out.warnings,
        }
    }

    pub fn methodology(&self) -> &str {
        match self {
            Report::Analysis(out) => &out.methodology,
            Report::Summary(out) => &out.methodology,
            Report::Split(out) => &out.methodology,
            Report::Comparison(out) => &out.methodology,
        }
    }
}

pub mod metrics;
pub mod schedule;

pub use metrics::{analyze, split, LoanAnalysis, LoanSummary, PaymentSplit};
pub use schedule::{AmortizationPeriod, Compounding, Loan, LoanInput, TermUnit};

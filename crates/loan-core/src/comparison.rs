use std::collections::BTreeMap;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::loan::{Loan, LoanInput, LoanSummary};
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::LoanResult;

/// Read-only view over an ordered set of finished loans.
///
/// Loans are keyed by their 1-based position in the input order; the
/// comparison holds no state of its own beyond the collection.
#[derive(Debug, Clone)]
pub struct LoanComparison {
    loans: Vec<Loan>,
}

impl LoanComparison {
    pub fn new(loans: Vec<Loan>) -> Self {
        LoanComparison { loans }
    }

    pub fn loans(&self) -> &[Loan] {
        &self.loans
    }

    pub fn len(&self) -> usize {
        self.loans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loans.is_empty()
    }

    pub fn compare_monthly_payments(&self) -> BTreeMap<usize, Money> {
        self.metric_by_index(Loan::monthly_payment)
    }

    pub fn compare_total_interest(&self) -> BTreeMap<usize, Money> {
        self.metric_by_index(Loan::total_interest)
    }

    pub fn compare_total_payments(&self) -> BTreeMap<usize, Money> {
        self.metric_by_index(Loan::total_paid)
    }

    /// M×M matrix of `total_paid(i) - total_paid(j)`: zero on the diagonal
    /// and antisymmetric by construction.
    pub fn compare_total_payments_diff(&self) -> Vec<Vec<Money>> {
        let totals: Vec<Money> = self.loans.iter().map(Loan::total_paid).collect();
        totals
            .iter()
            .map(|&row| totals.iter().map(|&col| row - col).collect())
            .collect()
    }

    fn metric_by_index(&self, metric: fn(&Loan) -> Money) -> BTreeMap<usize, Money> {
        self.loans
            .iter()
            .enumerate()
            .map(|(i, loan)| (i + 1, metric(loan)))
            .collect()
    }
}

/// Cross-loan comparison bundle for presentation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonOutput {
    pub loans: Vec<LoanSummary>,
    pub monthly_payments: BTreeMap<usize, Money>,
    pub total_interest: BTreeMap<usize, Money>,
    pub total_payments: BTreeMap<usize, Money>,
    pub total_payments_diff: Vec<Vec<Money>>,
}

/// Construct every loan, then tabulate their metrics side by side.
/// Any validation failure aborts the whole comparison.
pub fn compare(inputs: &[LoanInput]) -> LoanResult<ComputationOutput<ComparisonOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if inputs.len() < 2 {
        warnings.push(format!(
            "Comparison of {} loan(s); tables are trivial below two",
            inputs.len()
        ));
    }

    let loans = inputs.iter().map(Loan::new).collect::<LoanResult<Vec<_>>>()?;
    let comparison = LoanComparison::new(loans);

    let output = ComparisonOutput {
        loans: comparison.loans().iter().map(Loan::summary).collect(),
        monthly_payments: comparison.compare_monthly_payments(),
        total_interest: comparison.compare_total_interest(),
        total_payments: comparison.compare_total_payments(),
        total_payments_diff: comparison.compare_total_payments_diff(),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Side-by-side loan comparison",
        &serde_json::json!({ "loans": inputs.len() }),
        warnings,
        elapsed,
        output,
    ))
}

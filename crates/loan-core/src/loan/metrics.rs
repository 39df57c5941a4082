use std::time::Instant;

use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::LoanError;
use crate::loan::schedule::{
    AmortizationPeriod, Compounding, Loan, LoanInput, TermUnit, RESIDUAL_TOLERANCE,
};
use crate::types::{with_metadata, ComputationOutput, Currency, Money, Rate, Years};
use crate::LoanResult;

/// Interest/principal split of an arbitrary payment amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentSplit {
    pub interest: Money,
    pub principal: Money,
}

/// Every figure a presentation collaborator needs to render a loan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanSummary {
    pub principal: Money,
    pub interest: Rate,
    pub term: Years,
    pub term_unit: TermUnit,
    pub compounded: Compounding,
    pub currency: Currency,
    pub downpayment: Money,
    pub periods: u32,
    pub monthly_payment: Money,
    pub apr: Rate,
    pub apy: Rate,
    pub total_principal: Money,
    pub total_interest: Money,
    pub total_paid: Money,
    pub interest_to_principal: Rate,
    pub interest_to_paid: Rate,
    pub years_to_pay: Years,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tipping_point: Option<u32>,
}

/// Summary plus the full period-by-period schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanAnalysis {
    pub summary: LoanSummary,
    pub schedule: Vec<AmortizationPeriod>,
}

impl Loan {
    /// The fixed periodic payment. Named after the most common compounding
    /// frequency; for daily or annual compounding it is the per-period
    /// payment.
    pub fn monthly_payment(&self) -> Money {
        self.stored_payment()
    }

    /// The financed principal.
    pub fn total_principal(&self) -> Money {
        self.principal()
    }

    /// Sum of the interest portion across all periods.
    pub fn total_interest(&self) -> Money {
        self.schedule().iter().map(|p| p.interest).sum()
    }

    pub fn total_paid(&self) -> Money {
        self.total_principal() + self.total_interest()
    }

    /// Interest as a percentage of principal, 1 decimal place.
    pub fn interest_to_principal(&self) -> Rate {
        (self.total_interest() / self.total_principal() * dec!(100)).round_dp(1)
    }

    /// Interest as a percentage of everything paid, 1 decimal place.
    pub fn interest_to_paid(&self) -> Rate {
        (self.total_interest() / self.total_paid() * dec!(100)).round_dp(1)
    }

    pub fn years_to_pay(&self) -> Years {
        self.term().round_dp(1)
    }

    /// Nominal annual rate as a percentage.
    pub fn apr(&self) -> Rate {
        (self.interest() * dec!(100)).round_dp(2)
    }

    /// Effective annual rate from intra-year compounding, as a percentage.
    pub fn apy(&self) -> Rate {
        let n = Decimal::from(self.n_periods());
        let compounded = (Decimal::ONE + self.interest() / n).powd(n);
        ((compounded - Decimal::ONE) * dec!(100)).round_dp(2)
    }

    /// First period whose principal portion exceeds its interest portion.
    ///
    /// Returns `None` when no period qualifies, e.g. when rounding pins the
    /// principal portion at zero for the whole schedule.
    pub fn tipping_point(&self) -> Option<u32> {
        self.schedule()
            .iter()
            .find(|p| p.principal > p.interest)
            .map(|p| p.number)
    }

    /// Split an arbitrary payment `amount` applied at `period` into its
    /// interest and principal portions, using the stored pre-payment balance
    /// and the loan's per-period rate. The schedule itself is not touched.
    pub fn split_payment(&self, period: u32, amount: Money) -> LoanResult<PaymentSplit> {
        if period == 0 || period > self.periods() {
            return Err(LoanError::PeriodOutOfRange {
                period,
                periods: self.periods(),
            });
        }

        let balance_before = if period == 1 {
            self.principal()
        } else {
            self.schedule()[(period - 2) as usize].balance
        };

        let interest = (balance_before * self.rate_per_period()).round_dp(2);
        let principal = (amount - interest).round_dp(2);

        Ok(PaymentSplit {
            interest,
            principal,
        })
    }

    pub fn summary(&self) -> LoanSummary {
        LoanSummary {
            principal: self.principal(),
            interest: self.interest(),
            term: self.term(),
            term_unit: self.term_unit(),
            compounded: self.compounded(),
            currency: self.currency().clone(),
            downpayment: self.downpayment(),
            periods: self.periods(),
            monthly_payment: self.monthly_payment(),
            apr: self.apr(),
            apy: self.apy(),
            total_principal: self.total_principal(),
            total_interest: self.total_interest(),
            total_paid: self.total_paid(),
            interest_to_principal: self.interest_to_principal(),
            interest_to_paid: self.interest_to_paid(),
            years_to_pay: self.years_to_pay(),
            tipping_point: self.tipping_point(),
        }
    }
}

/// Build a loan and bundle its summary and schedule for presentation.
pub fn analyze(input: &LoanInput) -> LoanResult<ComputationOutput<LoanAnalysis>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let loan = Loan::new(input)?;

    if loan.term_unit() != TermUnit::Years {
        warnings.push(format!(
            "term_unit is informational: the period count treats the term of {} as years",
            loan.term()
        ));
    }
    if loan.tipping_point().is_none() {
        warnings.push(
            "No tipping point: the principal portion never exceeds the interest portion".into(),
        );
    }
    if let Some(last) = loan.schedule().last() {
        if last.balance.abs() > RESIDUAL_TOLERANCE {
            warnings.push(format!(
                "Final balance carries a rounding residual of {}",
                last.balance
            ));
        }
    }

    let output = LoanAnalysis {
        summary: loan.summary(),
        schedule: loan.schedule().to_vec(),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Fixed-payment amortization",
        &serde_json::json!({
            "principal": loan.total_principal().to_string(),
            "rate": loan.interest().to_string(),
            "periods": loan.periods(),
            "payment": loan.monthly_payment().to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

/// Split an arbitrary payment at a given period, as an envelope operation.
pub fn split(
    input: &LoanInput,
    period: u32,
    amount: Money,
) -> LoanResult<ComputationOutput<PaymentSplit>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let loan = Loan::new(input)?;
    let result = loan.split_payment(period, amount)?;

    if result.principal < Decimal::ZERO {
        warnings.push(format!(
            "Payment of {} does not cover the {} interest due; the principal portion is negative",
            amount, result.interest
        ));
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Payment split at stored balance",
        &serde_json::json!({
            "period": period,
            "amount": amount.to_string(),
        }),
        warnings,
        elapsed,
        result,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn standard_input() -> LoanInput {
        LoanInput {
            principal: dec!(200000),
            interest: dec!(0.06),
            term: dec!(30),
            term_unit: TermUnit::Years,
            compounded: Compounding::Monthly,
            currency: Currency::USD,
            downpayment: Decimal::ZERO,
        }
    }

    fn standard_loan() -> Loan {
        Loan::new(&standard_input()).unwrap()
    }

    #[test]
    fn test_monthly_payment() {
        assert_eq!(standard_loan().monthly_payment(), dec!(1199.10));
    }

    #[test]
    fn test_totals() {
        let loan = standard_loan();
        assert_eq!(loan.total_principal(), dec!(200000));
        // Interest compounds on rounded balances, so the total drifts a
        // little above the unrounded 231676.00
        assert!((loan.total_interest() - dec!(231677.04)).abs() < dec!(1.00));
        assert_eq!(loan.total_paid(), loan.total_principal() + loan.total_interest());
    }

    #[test]
    fn test_total_interest_matches_last_running_total() {
        let loan = standard_loan();
        let last = loan.schedule().last().unwrap();
        assert_eq!(loan.total_interest(), last.total_interest);
    }

    #[test]
    fn test_ratio_identities() {
        let loan = standard_loan();
        assert_eq!(
            loan.interest_to_principal(),
            (loan.total_interest() / loan.total_principal() * dec!(100)).round_dp(1)
        );
        assert_eq!(loan.interest_to_principal(), dec!(115.8));
        assert_eq!(
            loan.interest_to_paid(),
            (loan.total_interest() / loan.total_paid() * dec!(100)).round_dp(1)
        );
    }

    #[test]
    fn test_apr_apy() {
        let loan = standard_loan();
        assert_eq!(loan.apr(), dec!(6.00));
        assert_eq!(loan.apy(), dec!(6.17));
    }

    #[test]
    fn test_apy_equals_apr_for_annual_compounding() {
        let mut input = standard_input();
        input.compounded = Compounding::Annually;
        let loan = Loan::new(&input).unwrap();
        assert_eq!(loan.apy(), loan.apr());
    }

    #[test]
    fn test_years_to_pay() {
        let mut input = standard_input();
        input.term = dec!(29.75);
        let loan = Loan::new(&input).unwrap();
        assert_eq!(loan.years_to_pay(), dec!(29.8));
    }

    #[test]
    fn test_tipping_point_is_first_crossing() {
        let loan = standard_loan();
        let tp = loan.tipping_point().unwrap();
        let record = &loan.schedule()[(tp - 1) as usize];
        assert!(record.principal > record.interest);
        if tp > 1 {
            let before = &loan.schedule()[(tp - 2) as usize];
            assert!(before.principal <= before.interest);
        }
    }

    #[test]
    fn test_tipping_point_zero_rate_is_first_period() {
        let mut input = standard_input();
        input.interest = Decimal::ZERO;
        input.term = dec!(10);
        let loan = Loan::new(&input).unwrap();
        assert_eq!(loan.tipping_point(), Some(1));
    }

    #[test]
    fn test_tipping_point_absent() {
        // 100% annual interest on a small principal: the payment rounds to
        // exactly the interest due, the principal portion stays at zero and
        // the balance never moves.
        let input = LoanInput {
            principal: dec!(100),
            interest: dec!(1.0),
            term: dec!(30),
            term_unit: TermUnit::Years,
            compounded: Compounding::Annually,
            currency: Currency::USD,
            downpayment: Decimal::ZERO,
        };
        let loan = Loan::new(&input).unwrap();
        assert_eq!(loan.tipping_point(), None);
    }

    #[test]
    fn test_split_payment_first_period() {
        let loan = standard_loan();
        let split = loan.split_payment(1, dec!(1500)).unwrap();
        assert_eq!(split.interest, dec!(1000.00));
        assert_eq!(split.principal, dec!(500.00));
    }

    #[test]
    fn test_split_payment_uses_stored_balance() {
        let loan = standard_loan();
        // Splitting the scheduled payment must reproduce the schedule row.
        let split = loan.split_payment(2, dec!(1199.10)).unwrap();
        let row = &loan.schedule()[1];
        assert_eq!(split.interest, row.interest);
        assert_eq!(split.principal, row.principal);
    }

    #[test]
    fn test_split_payment_out_of_range() {
        let loan = standard_loan();
        assert!(matches!(
            loan.split_payment(0, dec!(100)),
            Err(LoanError::PeriodOutOfRange { period: 0, .. })
        ));
        assert!(matches!(
            loan.split_payment(361, dec!(100)),
            Err(LoanError::PeriodOutOfRange { period: 361, .. })
        ));
    }

    #[test]
    fn test_summary_mirrors_metrics() {
        let loan = standard_loan();
        let summary = loan.summary();
        assert_eq!(summary.monthly_payment, loan.monthly_payment());
        assert_eq!(summary.total_interest, loan.total_interest());
        assert_eq!(summary.apy, loan.apy());
        assert_eq!(summary.periods, 360);
        assert_eq!(summary.tipping_point, loan.tipping_point());
    }

    #[test]
    fn test_analyze_bundles_schedule() {
        let out = analyze(&standard_input()).unwrap();
        assert_eq!(out.result.schedule.len(), 360);
        assert_eq!(out.result.summary.monthly_payment, dec!(1199.10));
        assert!(out.warnings.iter().all(|w| !w.contains("term_unit")));
    }

    #[test]
    fn test_analyze_warns_on_non_year_term_unit() {
        let mut input = standard_input();
        input.term_unit = TermUnit::Months;
        let out = analyze(&input).unwrap();
        assert!(out.warnings.iter().any(|w| w.contains("term_unit")));
    }

    #[test]
    fn test_analyze_warns_on_missing_tipping_point() {
        let input = LoanInput {
            principal: dec!(100),
            interest: dec!(1.0),
            term: dec!(30),
            term_unit: TermUnit::Years,
            compounded: Compounding::Annually,
            currency: Currency::USD,
            downpayment: Decimal::ZERO,
        };
        let out = analyze(&input).unwrap();
        assert!(out.warnings.iter().any(|w| w.contains("tipping point")));
    }

    #[test]
    fn test_split_envelope_warns_on_uncovered_interest() {
        let out = split(&standard_input(), 1, dec!(500)).unwrap();
        assert_eq!(out.result.principal, dec!(-500.00));
        assert!(!out.warnings.is_empty());
    }

    #[test]
    fn test_split_envelope_propagates_validation() {
        let mut input = standard_input();
        input.principal = dec!(-1);
        assert!(split(&input, 1, dec!(100)).is_err());
    }
}

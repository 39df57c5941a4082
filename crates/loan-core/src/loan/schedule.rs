use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::LoanError;
use crate::types::{Currency, Money, Rate, Years};
use crate::LoanResult;

/// Residual balance after the final payment beyond this is worth flagging.
pub(crate) const RESIDUAL_TOLERANCE: Decimal = dec!(0.01);

/// Unit the term was quoted in. Informational only: the period count always
/// treats `term` as years (see `Loan::new`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TermUnit {
    Days,
    Months,
    #[default]
    Years,
}

/// Compounding frequency, mapping to periods per year.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compounding {
    Daily,
    #[default]
    Monthly,
    Annually,
}

impl Compounding {
    pub fn periods_per_year(&self) -> u32 {
        match self {
            Compounding::Daily => 365,
            Compounding::Monthly => 12,
            Compounding::Annually => 1,
        }
    }
}

impl std::fmt::Display for TermUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TermUnit::Days => "days",
            TermUnit::Months => "months",
            TermUnit::Years => "years",
        };
        write!(f, "{s}")
    }
}

impl std::fmt::Display for Compounding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Compounding::Daily => "daily",
            Compounding::Monthly => "monthly",
            Compounding::Annually => "annually",
        };
        write!(f, "{s}")
    }
}

/// Parameters for a single amortizing loan.
///
/// `principal` is the listed price; the financed amount is
/// `principal - downpayment`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanInput {
    pub principal: Money,
    pub interest: Rate,
    pub term: Years,
    #[serde(default)]
    pub term_unit: TermUnit,
    #[serde(default)]
    pub compounded: Compounding,
    #[serde(default)]
    pub currency: Currency,
    #[serde(default)]
    pub downpayment: Money,
}

/// One row of the amortization schedule, 1-indexed.
///
/// Every field is rounded to 2 decimal places at the point of computation;
/// the balance carried into the next period consumes these rounded values,
/// so the rounding compounds period-over-period by contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationPeriod {
    pub number: u32,
    pub payment: Money,
    pub interest: Money,
    pub principal: Money,
    pub total_interest: Money,
    pub total_principal: Money,
    pub balance: Money,
}

/// A validated amortizing loan with its precomputed schedule.
///
/// Fully computed at construction; immutable afterwards.
#[derive(Debug, Clone)]
pub struct Loan {
    principal: Money,
    interest: Rate,
    term: Years,
    term_unit: TermUnit,
    compounded: Compounding,
    currency: Currency,
    downpayment: Money,
    n_periods: u32,
    periods: u32,
    payment: Money,
    schedule: Vec<AmortizationPeriod>,
}

impl Loan {
    pub fn new(input: &LoanInput) -> LoanResult<Self> {
        if input.principal <= Decimal::ZERO {
            return Err(LoanError::InvalidInput {
                field: "principal".into(),
                reason: "Principal must be positive".into(),
            });
        }
        if input.interest < Decimal::ZERO || input.interest > Decimal::ONE {
            return Err(LoanError::InvalidInput {
                field: "interest".into(),
                reason: "Interest must be a fraction between 0 and 1, not a percentage".into(),
            });
        }
        if input.term <= Decimal::ZERO {
            return Err(LoanError::InvalidInput {
                field: "term".into(),
                reason: "Term must be positive".into(),
            });
        }
        if input.downpayment < Decimal::ZERO {
            return Err(LoanError::InvalidInput {
                field: "downpayment".into(),
                reason: "Downpayment cannot be negative".into(),
            });
        }
        if input.downpayment >= input.principal {
            return Err(LoanError::InvalidInput {
                field: "downpayment".into(),
                reason: "Downpayment must leave a positive financed amount".into(),
            });
        }

        let n_periods = input.compounded.periods_per_year();
        let periods = (input.term * Decimal::from(n_periods))
            .round()
            .to_u32()
            .ok_or_else(|| LoanError::InvalidInput {
                field: "term".into(),
                reason: "Term produces an unrepresentable period count".into(),
            })?;
        if periods == 0 {
            return Err(LoanError::InvalidInput {
                field: "term".into(),
                reason: "Term is too short to contain a single compounding period".into(),
            });
        }

        let principal = input.principal - input.downpayment;
        let interest = input.interest.round_dp(4);
        let payment = periodic_payment(principal, interest, n_periods, input.term)?;
        let schedule = amortize(principal, interest, n_periods, periods, payment);

        Ok(Loan {
            principal,
            interest,
            term: input.term,
            term_unit: input.term_unit,
            compounded: input.compounded,
            currency: input.currency.clone(),
            downpayment: input.downpayment,
            n_periods,
            periods,
            payment,
            schedule,
        })
    }

    /// Financed amount (listed price less downpayment).
    pub fn principal(&self) -> Money {
        self.principal
    }

    /// Nominal annual rate, stored rounded to 4 decimal places.
    pub fn interest(&self) -> Rate {
        self.interest
    }

    pub fn term(&self) -> Years {
        self.term
    }

    pub fn term_unit(&self) -> TermUnit {
        self.term_unit
    }

    pub fn compounded(&self) -> Compounding {
        self.compounded
    }

    pub fn currency(&self) -> &Currency {
        &self.currency
    }

    pub fn downpayment(&self) -> Money {
        self.downpayment
    }

    /// Listed price before the downpayment was subtracted.
    pub fn listed_price(&self) -> Money {
        self.principal + self.downpayment
    }

    /// Compounding periods per year (365, 12 or 1).
    pub fn n_periods(&self) -> u32 {
        self.n_periods
    }

    /// Schedule length: `round(term * periods_per_year)`.
    pub fn periods(&self) -> u32 {
        self.periods
    }

    /// Interest rate per compounding period.
    pub fn rate_per_period(&self) -> Rate {
        self.interest / Decimal::from(self.n_periods)
    }

    pub fn schedule(&self) -> &[AmortizationPeriod] {
        &self.schedule
    }

    pub(crate) fn stored_payment(&self) -> Money {
        self.payment
    }
}

/// Closed-form fixed payment for an amortizing loan:
///
/// ```text
/// rate    = interest / periods_per_year
/// factor  = (1 + rate)^(periods_per_year * term)
/// payment = principal * rate * factor / (factor - 1)
/// ```
///
/// The zero-rate branch takes the formula's limit, `principal / total
/// periods`, where the denominator above would vanish.
fn periodic_payment(
    principal: Money,
    interest: Rate,
    n_periods: u32,
    term: Years,
) -> LoanResult<Money> {
    let total_periods = term * Decimal::from(n_periods);

    if interest.is_zero() {
        return Ok((principal / total_periods).round_dp(2));
    }

    let rate = interest / Decimal::from(n_periods);
    let factor = (Decimal::ONE + rate).powd(total_periods);
    let denominator = factor - Decimal::ONE;
    if denominator.is_zero() {
        return Err(LoanError::DivisionByZero {
            context: "payment annuity factor".into(),
        });
    }

    Ok((principal * rate * factor / denominator).round_dp(2))
}

/// Walk periods 1..=N carrying the balance forward on the rounded payment
/// split. No final-period correction is applied: whatever rounding drift
/// accumulates shows up in the last balance.
fn amortize(
    principal: Money,
    interest: Rate,
    n_periods: u32,
    periods: u32,
    payment: Money,
) -> Vec<AmortizationPeriod> {
    let rate = interest / Decimal::from(n_periods);

    let mut schedule = Vec::with_capacity(periods as usize);
    let mut balance = principal;
    let mut total_interest = Decimal::ZERO;
    let mut total_principal = Decimal::ZERO;

    for number in 1..=periods {
        let interest_payment = (balance * rate).round_dp(2);
        let principal_payment = (payment - interest_payment).round_dp(2);

        total_interest += interest_payment;
        total_principal += principal_payment;
        balance -= principal_payment;

        schedule.push(AmortizationPeriod {
            number,
            payment,
            interest: interest_payment,
            principal: principal_payment,
            total_interest,
            total_principal,
            balance,
        });
    }

    schedule
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

    #[test]
    fn test_standard_payment() {
        let loan = Loan::new(&standard_input()).unwrap();
        assert_eq!(loan.stored_payment(), dec!(1199.10));
    }

    #[test]
    fn test_schedule_length() {
        let loan = Loan::new(&standard_input()).unwrap();
        assert_eq!(loan.periods(), 360);
        assert_eq!(loan.schedule().len(), 360);
    }

    #[test]
    fn test_first_period_split() {
        let loan = Loan::new(&standard_input()).unwrap();
        let first = &loan.schedule()[0];
        assert_eq!(first.number, 1);
        assert_eq!(first.interest, dec!(1000.00));
        assert_eq!(first.principal, dec!(199.10));
        assert_eq!(first.balance, dec!(199800.90));
    }

    #[test]
    fn test_second_period_compounds_on_rounded_balance() {
        let loan = Loan::new(&standard_input()).unwrap();
        let second = &loan.schedule()[1];
        // 199800.90 * 0.005 = 999.0045, rounded to 999.00
        assert_eq!(second.interest, dec!(999.00));
        assert_eq!(second.principal, dec!(200.10));
        assert_eq!(second.balance, dec!(199600.80));
    }

    #[test]
    fn test_payment_splits_sum() {
        let loan = Loan::new(&standard_input()).unwrap();
        for p in loan.schedule() {
            assert!((p.payment - (p.interest + p.principal)).abs() <= dec!(0.01));
        }
    }

    #[test]
    fn test_balance_non_increasing_and_terminates() {
        let loan = Loan::new(&standard_input()).unwrap();
        let mut prev = loan.principal();
        for p in loan.schedule() {
            assert!(p.balance <= prev);
            prev = p.balance;
        }
        // Residual rounding drift is allowed but small
        assert!(loan.schedule().last().unwrap().balance.abs() < dec!(5.00));
    }

    #[test]
    fn test_running_totals_non_decreasing() {
        let loan = Loan::new(&standard_input()).unwrap();
        let mut prev_interest = Decimal::ZERO;
        let mut prev_principal = Decimal::ZERO;
        for p in loan.schedule() {
            assert!(p.total_interest >= prev_interest);
            assert!(p.total_principal >= prev_principal);
            prev_interest = p.total_interest;
            prev_principal = p.total_principal;
        }
    }

    #[test]
    fn test_downpayment_reduces_principal() {
        let mut input = standard_input();
        input.downpayment = dec!(50000);
        let loan = Loan::new(&input).unwrap();
        assert_eq!(loan.principal(), dec!(150000));
        assert_eq!(loan.listed_price(), dec!(200000));
    }

    #[test]
    fn test_interest_stored_at_four_decimals() {
        let mut input = standard_input();
        input.interest = dec!(0.0649999);
        let loan = Loan::new(&input).unwrap();
        assert_eq!(loan.interest(), dec!(0.0650));
    }

    #[test]
    fn test_zero_interest_payment() {
        let mut input = standard_input();
        input.interest = Decimal::ZERO;
        input.term = dec!(10);
        let loan = Loan::new(&input).unwrap();
        // 200000 / 120 = 1666.666..., rounded
        assert_eq!(loan.stored_payment(), dec!(1666.67));
        for p in loan.schedule() {
            assert_eq!(p.interest, Decimal::ZERO);
        }
    }

    #[test]
    fn test_daily_compounding_period_count() {
        let mut input = standard_input();
        input.compounded = Compounding::Daily;
        input.term = dec!(2);
        let loan = Loan::new(&input).unwrap();
        assert_eq!(loan.periods(), 730);
    }

    #[test]
    fn test_annual_compounding_period_count() {
        let mut input = standard_input();
        input.compounded = Compounding::Annually;
        let loan = Loan::new(&input).unwrap();
        assert_eq!(loan.periods(), 30);
        assert_eq!(loan.rate_per_period(), dec!(0.06));
    }

    #[test]
    fn test_fractional_term_rounds_period_count() {
        let mut input = standard_input();
        input.term = dec!(2.5);
        let loan = Loan::new(&input).unwrap();
        assert_eq!(loan.periods(), 30);
    }

    #[test]
    fn test_term_unit_does_not_scale_period_count() {
        // The period count treats term as years regardless of unit.
        let mut input = standard_input();
        input.term_unit = TermUnit::Months;
        let loan = Loan::new(&input).unwrap();
        assert_eq!(loan.periods(), 360);
    }

    #[test]
    fn test_negative_principal_rejected() {
        let mut input = standard_input();
        input.principal = dec!(-1);
        assert!(matches!(
            Loan::new(&input),
            Err(LoanError::InvalidInput { field, .. }) if field == "principal"
        ));
    }

    #[test]
    fn test_interest_above_one_rejected() {
        let mut input = standard_input();
        input.interest = dec!(1.5);
        assert!(Loan::new(&input).is_err());
    }

    #[test]
    fn test_zero_term_rejected() {
        let mut input = standard_input();
        input.term = Decimal::ZERO;
        assert!(Loan::new(&input).is_err());
    }

    #[test]
    fn test_negative_downpayment_rejected() {
        let mut input = standard_input();
        input.downpayment = dec!(-100);
        assert!(Loan::new(&input).is_err());
    }

    #[test]
    fn test_downpayment_consuming_principal_rejected() {
        let mut input = standard_input();
        input.downpayment = dec!(200000);
        assert!(Loan::new(&input).is_err());
    }

    #[test]
    fn test_term_below_one_period_rejected() {
        let mut input = standard_input();
        input.compounded = Compounding::Annually;
        input.term = dec!(0.2); // rounds to zero periods
        assert!(Loan::new(&input).is_err());
    }
}

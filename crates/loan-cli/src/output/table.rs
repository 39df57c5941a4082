use rust_decimal::Decimal;
use tabled::{builder::Builder, Table};

use loan_core::comparison::ComparisonOutput;
use loan_core::loan::{AmortizationPeriod, LoanSummary, PaymentSplit};
use loan_core::types::Currency;

use crate::commands::Report;

/// Render a report as tables using the tabled crate.
pub fn print_table(report: &Report) {
    match report {
        Report::Analysis(out) => {
            print_summary(&out.result.summary);
            println!();
            print_schedule(&out.result.summary.currency, &out.result.schedule);
        }
        Report::Summary(out) => print_summary(&out.result),
        Report::Split(out) => print_split(&out.result),
        Report::Comparison(out) => print_comparison(&out.result),
    }

    print_footer(report);
}

fn print_summary(summary: &LoanSummary) {
    let c = &summary.currency;
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    builder.push_record(["principal", &money(c, summary.principal)]);
    builder.push_record(["downpayment", &money(c, summary.downpayment)]);
    builder.push_record(["interest", &summary.interest.to_string()]);
    builder.push_record(["term", &format!("{} {}", summary.term, summary.term_unit)]);
    builder.push_record(["compounded", &summary.compounded.to_string()]);
    builder.push_record(["periods", &summary.periods.to_string()]);
    builder.push_record(["monthly_payment", &money(c, summary.monthly_payment)]);
    builder.push_record(["apr", &format!("{}%", summary.apr)]);
    builder.push_record(["apy", &format!("{}%", summary.apy)]);
    builder.push_record(["total_principal", &money(c, summary.total_principal)]);
    builder.push_record(["total_interest", &money(c, summary.total_interest)]);
    builder.push_record(["total_paid", &money(c, summary.total_paid)]);
    builder.push_record([
        "interest_to_principal",
        &format!("{}%", summary.interest_to_principal),
    ]);
    builder.push_record([
        "interest_to_paid",
        &format!("{}%", summary.interest_to_paid),
    ]);
    builder.push_record(["years_to_pay", &summary.years_to_pay.to_string()]);
    builder.push_record([
        "tipping_point",
        &summary
            .tipping_point
            .map(|p| p.to_string())
            .unwrap_or_else(|| "none".to_string()),
    ]);
    println!("{}", Table::from(builder));
}

fn print_schedule(currency: &Currency, schedule: &[AmortizationPeriod]) {
    let mut builder = Builder::default();
    builder.push_record([
        "#",
        "Payment",
        "Interest",
        "Principal",
        "Total interest",
        "Total principal",
        "Balance",
    ]);
    for p in schedule {
        builder.push_record([
            p.number.to_string(),
            money(currency, p.payment),
            money(currency, p.interest),
            money(currency, p.principal),
            money(currency, p.total_interest),
            money(currency, p.total_principal),
            money(currency, p.balance),
        ]);
    }
    println!("{}", Table::from(builder));
}

fn print_split(split: &PaymentSplit) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    builder.push_record(["interest", &split.interest.to_string()]);
    builder.push_record(["principal", &split.principal.to_string()]);
    println!("{}", Table::from(builder));
}

fn print_comparison(output: &ComparisonOutput) {
    let mut builder = Builder::default();
    builder.push_record([
        "#",
        "Principal",
        "Rate",
        "Term",
        "Payment",
        "Total interest",
        "Total paid",
    ]);
    for (i, loan) in output.loans.iter().enumerate() {
        builder.push_record([
            (i + 1).to_string(),
            money(&loan.currency, loan.principal),
            format!("{}%", loan.apr),
            format!("{} {}", loan.term, loan.term_unit),
            money(&loan.currency, loan.monthly_payment),
            money(&loan.currency, loan.total_interest),
            money(&loan.currency, loan.total_paid),
        ]);
    }
    println!("{}", Table::from(builder));

    if output.total_payments_diff.is_empty() {
        return;
    }

    println!("\nTotal payment differences (row minus column):");
    let mut builder = Builder::default();
    let mut header = vec![String::new()];
    header.extend((1..=output.loans.len()).map(|i| format!("Loan {i}")));
    builder.push_record(header);
    for (i, row) in output.total_payments_diff.iter().enumerate() {
        let mut record = vec![format!("Loan {}", i + 1)];
        record.extend(row.iter().map(|d| d.to_string()));
        builder.push_record(record);
    }
    println!("{}", Table::from(builder));
}

fn print_footer(report: &Report) {
    let warnings = report.warnings();
    if !warnings.is_empty() {
        println!("\nWarnings:");
        for w in warnings {
            println!("  - {}", w);
        }
    }

    println!("\nMethodology: {}", report.methodology());
}

fn money(currency: &Currency, amount: Decimal) -> String {
    if amount < Decimal::ZERO {
        format!("-{}{}", currency.symbol(), -amount)
    } else {
        format!("{}{}", currency.symbol(), amount)
    }
}

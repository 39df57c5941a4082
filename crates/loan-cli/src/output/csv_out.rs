use std::io;

use loan_core::comparison::ComparisonOutput;
use loan_core::loan::{AmortizationPeriod, LoanSummary, PaymentSplit};

use crate::commands::Report;

/// Write a report as CSV to stdout: the schedule for an analysis, field/value
/// rows for a summary or split, and per-loan metric rows (with difference
/// columns) for a comparison.
pub fn print_csv(report: &Report) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    match report {
        Report::Analysis(out) => write_schedule(&mut wtr, &out.result.schedule),
        Report::Summary(out) => write_summary(&mut wtr, &out.result),
        Report::Split(out) => write_split(&mut wtr, &out.result),
        Report::Comparison(out) => write_comparison(&mut wtr, &out.result),
    }

    let _ = wtr.flush();
}

fn write_schedule(wtr: &mut csv::Writer<io::StdoutLock<'_>>, schedule: &[AmortizationPeriod]) {
    let _ = wtr.write_record([
        "number",
        "payment",
        "interest",
        "principal",
        "total_interest",
        "total_principal",
        "balance",
    ]);
    for p in schedule {
        let _ = wtr.write_record([
            p.number.to_string(),
            p.payment.to_string(),
            p.interest.to_string(),
            p.principal.to_string(),
            p.total_interest.to_string(),
            p.total_principal.to_string(),
            p.balance.to_string(),
        ]);
    }
}

fn write_summary(wtr: &mut csv::Writer<io::StdoutLock<'_>>, summary: &LoanSummary) {
    let _ = wtr.write_record(["field", "value"]);
    let _ = wtr.write_record(["principal", &summary.principal.to_string()]);
    let _ = wtr.write_record(["downpayment", &summary.downpayment.to_string()]);
    let _ = wtr.write_record(["interest", &summary.interest.to_string()]);
    let _ = wtr.write_record(["term", &summary.term.to_string()]);
    let _ = wtr.write_record(["term_unit", &summary.term_unit.to_string()]);
    let _ = wtr.write_record(["compounded", &summary.compounded.to_string()]);
    let _ = wtr.write_record(["periods", &summary.periods.to_string()]);
    let _ = wtr.write_record(["monthly_payment", &summary.monthly_payment.to_string()]);
    let _ = wtr.write_record(["apr", &summary.apr.to_string()]);
    let _ = wtr.write_record(["apy", &summary.apy.to_string()]);
    let _ = wtr.write_record(["total_principal", &summary.total_principal.to_string()]);
    let _ = wtr.write_record(["total_interest", &summary.total_interest.to_string()]);
    let _ = wtr.write_record(["total_paid", &summary.total_paid.to_string()]);
    let _ = wtr.write_record([
        "interest_to_principal",
        &summary.interest_to_principal.to_string(),
    ]);
    let _ = wtr.write_record(["interest_to_paid", &summary.interest_to_paid.to_string()]);
    let _ = wtr.write_record(["years_to_pay", &summary.years_to_pay.to_string()]);
    let _ = wtr.write_record([
        "tipping_point",
        &summary
            .tipping_point
            .map(|p| p.to_string())
            .unwrap_or_default(),
    ]);
}

fn write_split(wtr: &mut csv::Writer<io::StdoutLock<'_>>, split: &PaymentSplit) {
    let _ = wtr.write_record(["interest", "principal"]);
    let _ = wtr.write_record([split.interest.to_string(), split.principal.to_string()]);
}

fn write_comparison(wtr: &mut csv::Writer<io::StdoutLock<'_>>, output: &ComparisonOutput) {
    let count = output.loans.len();

    let mut header = vec![
        "index".to_string(),
        "monthly_payment".to_string(),
        "total_interest".to_string(),
        "total_paid".to_string(),
    ];
    header.extend((1..=count).map(|j| format!("diff_vs_{j}")));
    let _ = wtr.write_record(&header);

    for i in 1..=count {
        let mut row = vec![
            i.to_string(),
            output.monthly_payments[&i].to_string(),
            output.total_interest[&i].to_string(),
            output.total_payments[&i].to_string(),
        ];
        row.extend(
            output.total_payments_diff[i - 1]
                .iter()
                .map(|d| d.to_string()),
        );
        let _ = wtr.write_record(&row);
    }
}

use crate::commands::Report;

/// Print just the headline figure: the periodic payment for a single loan,
/// the interest/principal split, or total paid per loan for a comparison.
pub fn print_minimal(report: &Report) {
    match report {
        Report::Analysis(out) => println!("{}", out.result.summary.monthly_payment),
        Report::Summary(out) => println!("{}", out.result.monthly_payment),
        Report::Split(out) => println!(
            "interest={} principal={}",
            out.result.interest, out.result.principal
        ),
        Report::Comparison(out) => {
            for (index, total) in &out.result.total_payments {
                println!("{}: {}", index, total);
            }
        }
    }
}

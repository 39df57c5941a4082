use crate::commands::Report;

/// Print the full computation envelope as pretty JSON.
pub fn print_json(report: &Report) {
    println!(
        "{}",
        serde_json::to_string_pretty(&report.to_value()).unwrap_or_default()
    );
}

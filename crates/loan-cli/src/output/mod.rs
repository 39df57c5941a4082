pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::commands::Report;
use crate::OutputFormat;

/// Dispatch a report to the appropriate formatter.
pub fn render(format: &OutputFormat, report: &Report) {
    match format {
        OutputFormat::Json => json::print_json(report),
        OutputFormat::Table => table::print_table(report),
        OutputFormat::Csv => csv_out::print_csv(report),
        OutputFormat::Minimal => minimal::print_minimal(report),
    }
}

pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use clap::ValueEnum;
use serde_json::Value;

/// Rendering selected with `--output`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Full result envelope, pretty-printed
    Json,
    /// Fields, schedule and warnings as tables
    Table,
    /// Schedule rows or field/value pairs
    Csv,
    /// Headline figure only
    Minimal,
}

impl OutputFormat {
    pub fn render(self, value: &Value) {
        match self {
            OutputFormat::Json => json::print_json(value),
            OutputFormat::Table => table::print_table(value),
            OutputFormat::Csv => csv_out::print_csv(result_body(value)),
            OutputFormat::Minimal => minimal::print_minimal(result_body(value)),
        }
    }
}

/// The `result` member of a simulation envelope, or the value itself for
/// commands that print bare objects.
pub fn result_body(value: &Value) -> &Value {
    value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value)
}

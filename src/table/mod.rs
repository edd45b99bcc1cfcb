//! Append-only CSV tables holding extracted run metrics
//!
//! Every table starts with its run number column. Rows are only ever appended;
//! the header is written by whichever invocation first finds the file missing or
//! empty.

mod records;
mod run_number;
mod writer;

pub use records::{
    ComparisonRow, DeltaRow, MaxQRecord, MaxQRow, TableLayout, read_comparison_table,
    read_max_q_table,
};
pub use run_number::{max_recorded_run, next_run_number};
pub use writer::{AppendOutcome, TableRow, TableWriter};

/// Decimal places used for every floating-point field.
pub const FLOAT_PRECISION: usize = 6;

/// Format an optional float with fixed precision, empty when absent.
pub fn format_float(value: Option<f64>) -> String {
    value
        .map(|v| format!("{v:.prec$}", prec = FLOAT_PRECISION))
        .unwrap_or_default()
}

/// Format an optional integer, empty when absent.
pub fn format_optional<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Format a boolean flag as `1` or `0`.
pub fn format_flag(value: bool) -> String {
    if value { "1" } else { "0" }.to_string()
}

use lduclosure_stats::significance::TestError;

use crate::partition::ClosureStatus;

/// Error raised while partitioning a dataset or computing a report.
///
/// Every variant is surfaced to the caller as soon as it is detected; no
/// report is produced from partial statistics.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum AnalysisError {
    #[display("column '{column}' not found in dataset")]
    MissingColumn { column: String },
    #[display("{status} group has no values for measure '{measure}'")]
    EmptyGroup {
        status: ClosureStatus,
        measure: String,
    },
    #[display("closure flag column '{column}' has invalid value '{value}' at row {row}")]
    InvalidFlagValue {
        column: String,
        row: usize,
        value: String,
    },
    #[display("cannot compare measure '{measure}': {source}")]
    DegenerateSample { measure: String, source: TestError },
    #[display("column '{column}' has non-numeric value '{value}' at row {row}")]
    NonNumericValue {
        column: String,
        row: usize,
        value: String,
    },
    #[display("total of '{measure}' is zero, group shares are undefined")]
    ZeroTotal { measure: String },
    #[display("column '{column}' has {actual} rows, expected {expected}")]
    ColumnLengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },
    #[display("duplicate column '{column}'")]
    DuplicateColumn { column: String },
    #[display("record {row} is not a JSON object")]
    InvalidRecord { row: usize },
}

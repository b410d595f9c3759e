use lduclosure_stats::significance::MannWhitneyMethod;

use crate::measure::ProportionScale;

/// Default name of the binary closure flag column.
pub const DEFAULT_FLAG_COLUMN: &str = "Closed 2012-2016";

/// Significance tests run by a comparison.
#[derive(
    Default, Debug, Clone, Copy, PartialEq, Eq, derive_more::FromStr, serde::Serialize,
)]
pub enum TestSelection {
    #[default]
    MannWhitney,
    TTest,
    Both,
}

impl TestSelection {
    #[must_use]
    pub fn includes_mann_whitney(self) -> bool {
        matches!(self, Self::MannWhitney | Self::Both)
    }

    #[must_use]
    pub fn includes_t_test(self) -> bool {
        matches!(self, Self::TTest | Self::Both)
    }
}

/// Aggregation of a column for basic statistics.
#[derive(
    Default, Debug, Clone, Copy, PartialEq, Eq, derive_more::FromStr, serde::Serialize,
)]
pub enum Aggregation {
    /// Sum of the present values.
    #[default]
    Sum,
    /// Number of present values.
    Count,
}

/// Options shared by every report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportConfig {
    /// Name of the binary closure flag column.
    pub flag_column: String,
    pub tests: TestSelection,
    pub proportion_scale: ProportionScale,
    /// Decimal places of reported values.
    pub precision: usize,
    /// Decimal places of reported p-values.
    pub p_value_precision: usize,
    /// Width of the line label column (`Total:`, `Open:`, ...).
    pub label_width: usize,
    /// Width of each `mean=` / `median=` value field.
    pub value_width: usize,
    /// Use Student's pooled-variance t-test instead of Welch's.
    pub equal_var: bool,
    pub mann_whitney_method: MannWhitneyMethod,
    pub aggregation: Aggregation,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            flag_column: DEFAULT_FLAG_COLUMN.to_owned(),
            tests: TestSelection::default(),
            proportion_scale: ProportionScale::default(),
            precision: 3,
            p_value_precision: 9,
            label_width: 12,
            value_width: 12,
            equal_var: false,
            mann_whitney_method: MannWhitneyMethod::default(),
            aggregation: Aggregation::default(),
        }
    }
}

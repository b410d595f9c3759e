//! Measures and their per-group values
//!
//! A [`Measure`] is either a single numeric column (a Count measure) or a
//! numerator/denominator pair (a Proportion measure). Extraction yields one
//! optional value per group member; `None` marks a missing value that is
//! excluded from statistics without removing the record from its group.

use std::fmt;

use crate::{AnalysisError, dataset::Dataset, partition::Group};

/// Scaling applied to Proportion measures.
#[derive(
    Default, Debug, Clone, Copy, PartialEq, Eq, derive_more::FromStr, serde::Serialize,
)]
pub enum ProportionScale {
    /// `numerator / denominator * 100`, reported with a `%` suffix.
    #[default]
    Percent,
    /// `numerator / denominator`.
    Raw,
}

impl ProportionScale {
    #[must_use]
    pub fn factor(self) -> f64 {
        match self {
            Self::Percent => 100.0,
            Self::Raw => 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Measure {
    Count {
        column: String,
    },
    Proportion {
        numerator: String,
        denominator: String,
    },
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Measure::Count { column } => f.pad(column),
            Measure::Proportion { numerator, .. } => f.pad(&format!("% {numerator}")),
        }
    }
}

impl Measure {
    pub fn count<S>(column: S) -> Self
    where
        S: Into<String>,
    {
        Self::Count {
            column: column.into(),
        }
    }

    pub fn proportion<N, D>(numerator: N, denominator: D) -> Self
    where
        N: Into<String>,
        D: Into<String>,
    {
        Self::Proportion {
            numerator: numerator.into(),
            denominator: denominator.into(),
        }
    }

    /// The column whose dataset-wide sum is reported as the total: the
    /// measure column itself, or the numerator of a proportion.
    #[must_use]
    pub fn total_column(&self) -> &str {
        match self {
            Measure::Count { column } => column,
            Measure::Proportion { numerator, .. } => numerator,
        }
    }

    /// Returns `true` if values of this measure carry a `%` suffix under the
    /// given scale.
    #[must_use]
    pub fn is_percent(&self, scale: ProportionScale) -> bool {
        matches!(self, Measure::Proportion { .. }) && scale == ProportionScale::Percent
    }

    /// Checks that every column the measure reads exists.
    pub fn validate(&self, dataset: &Dataset) -> Result<(), AnalysisError> {
        match self {
            Measure::Count { column } => {
                dataset.column(column)?;
            }
            Measure::Proportion {
                numerator,
                denominator,
            } => {
                dataset.column(numerator)?;
                dataset.column(denominator)?;
            }
        }
        Ok(())
    }

    /// Value of the measure for one record.
    ///
    /// A proportion is missing when either side is missing or the
    /// denominator is zero.
    pub fn value_at(
        &self,
        dataset: &Dataset,
        row: usize,
        scale: ProportionScale,
    ) -> Result<Option<f64>, AnalysisError> {
        match self {
            Measure::Count { column } => dataset.column(column)?.numeric(row),
            Measure::Proportion {
                numerator,
                denominator,
            } => {
                let num = dataset.column(numerator)?.numeric(row)?;
                let den = dataset.column(denominator)?.numeric(row)?;
                let (Some(num), Some(den)) = (num, den) else {
                    return Ok(None);
                };
                if den == 0.0 {
                    tracing::debug!(
                        row,
                        numerator = %numerator,
                        denominator = %denominator,
                        "zero denominator, ratio treated as missing"
                    );
                    return Ok(None);
                }
                Ok(Some(num / den * scale.factor()))
            }
        }
    }

    /// Values of the measure for every member of `group`, in row order.
    pub fn extract(
        &self,
        dataset: &Dataset,
        group: &Group,
        scale: ProportionScale,
    ) -> Result<Vec<Option<f64>>, AnalysisError> {
        self.validate(dataset)?;
        group
            .rows()
            .iter()
            .map(|&row| self.value_at(dataset, row, scale))
            .collect()
    }

    /// Dataset-wide sum of [`Self::total_column`], missing values skipped.
    pub fn total(&self, dataset: &Dataset) -> Result<f64, AnalysisError> {
        dataset
            .column(self.total_column())?
            .sum_rows(0..dataset.len())
    }
}

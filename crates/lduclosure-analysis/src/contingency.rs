//! Marginal sums of a 2x2 contingency table
//!
//! Two indicator columns are summed over each closure group. The four sums
//! feed an external odds-ratio / Fisher exact calculator.

use std::fmt;

use crate::{
    AnalysisError,
    dataset::Dataset,
    format::grouped,
    partition::{ClosureStatus, GroupPartition},
};

const CLOSED_SUFFIX: &str = ", Closed:";
const OPEN_SUFFIX: &str = ", Open:";

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct TwoByTwo {
    pub first: String,
    pub second: String,
    pub closed_first: f64,
    pub closed_second: f64,
    pub open_first: f64,
    pub open_second: f64,
}

impl TwoByTwo {
    pub fn compute(
        dataset: &Dataset,
        flag_column: &str,
        first: &str,
        second: &str,
    ) -> Result<Self, AnalysisError> {
        let partition = GroupPartition::new(dataset, flag_column)?;
        Self::from_partition(&partition, first, second)
    }

    /// Sums `first` and `second` over each group, missing values skipped.
    pub fn from_partition(
        partition: &GroupPartition<'_>,
        first: &str,
        second: &str,
    ) -> Result<Self, AnalysisError> {
        let dataset = partition.dataset();
        let first_col = dataset.column(first)?;
        let second_col = dataset.column(second)?;

        for status in ClosureStatus::ALL {
            if partition.group(status).is_empty() {
                return Err(AnalysisError::EmptyGroup {
                    status,
                    measure: format!("{first} x {second}"),
                });
            }
        }

        let rows = move |status: ClosureStatus| partition.group(status).rows().iter().copied();
        Ok(Self {
            first: first.to_owned(),
            second: second.to_owned(),
            closed_first: first_col.sum_rows(rows(ClosureStatus::Closed))?,
            closed_second: second_col.sum_rows(rows(ClosureStatus::Closed))?,
            open_first: first_col.sum_rows(rows(ClosureStatus::Open))?,
            open_second: second_col.sum_rows(rows(ClosureStatus::Open))?,
        })
    }

    /// Width the row labels are padded to.
    #[must_use]
    pub fn label_width(&self) -> usize {
        self.first
            .chars()
            .count()
            .max(self.second.chars().count())
            + CLOSED_SUFFIX.len()
            + 2
    }
}

impl fmt::Display for TwoByTwo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.label_width();
        let rows = [
            (&self.first, CLOSED_SUFFIX, self.closed_first),
            (&self.second, CLOSED_SUFFIX, self.closed_second),
            (&self.first, OPEN_SUFFIX, self.open_first),
            (&self.second, OPEN_SUFFIX, self.open_second),
        ];
        for (i, (name, suffix, sum)) in rows.into_iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{:<width$}{}", format!("{name}{suffix}"), grouped(sum, 2))?;
        }
        Ok(())
    }
}

//! Partitioning of a dataset by closure status
//!
//! Every record belongs to exactly one of two groups, decided solely by the
//! binary closure flag: `0` means the LDU remained open, `1` means it closed.

use crate::{AnalysisError, dataset::Dataset};

/// Closure status of an LDU, the partition key of every comparison.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    derive_more::Display,
    derive_more::IsVariant,
    serde::Serialize,
)]
pub enum ClosureStatus {
    /// Flag `0`: remained open.
    Open,
    /// Flag `1`: closed within the observation window.
    Closed,
}

impl ClosureStatus {
    pub const ALL: [Self; 2] = [Self::Open, Self::Closed];

    /// Maps a flag value to a status; any value other than `0` or `1` is
    /// rejected.
    #[must_use]
    pub fn from_flag(flag: f64) -> Option<Self> {
        if flag == 0.0 {
            Some(Self::Open)
        } else if flag == 1.0 {
            Some(Self::Closed)
        } else {
            None
        }
    }
}

/// The records sharing one closure status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    status: ClosureStatus,
    rows: Vec<usize>,
}

impl Group {
    #[must_use]
    pub fn status(&self) -> ClosureStatus {
        self.status
    }

    /// Row indices of the group members, in dataset order.
    #[must_use]
    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A read-only split of a dataset into its Open and Closed groups.
#[derive(Debug, Clone)]
pub struct GroupPartition<'a> {
    dataset: &'a Dataset,
    open: Group,
    closed: Group,
}

impl<'a> GroupPartition<'a> {
    /// Partitions `dataset` by the binary flag in `flag_column`.
    ///
    /// Fails with [`AnalysisError::MissingColumn`] if the flag column is
    /// absent and with [`AnalysisError::InvalidFlagValue`] on the first
    /// record whose flag is neither `0` nor `1` (missing flags included).
    pub fn new(dataset: &'a Dataset, flag_column: &str) -> Result<Self, AnalysisError> {
        let column = dataset.column(flag_column)?;
        let mut open = Group {
            status: ClosureStatus::Open,
            rows: vec![],
        };
        let mut closed = Group {
            status: ClosureStatus::Closed,
            rows: vec![],
        };

        for (row, cell) in column.cells().iter().enumerate() {
            let status = cell.as_number().and_then(ClosureStatus::from_flag).ok_or_else(|| {
                AnalysisError::InvalidFlagValue {
                    column: flag_column.to_owned(),
                    row,
                    value: cell.to_string(),
                }
            })?;
            match status {
                ClosureStatus::Open => open.rows.push(row),
                ClosureStatus::Closed => closed.rows.push(row),
            }
        }

        tracing::debug!(
            flag_column,
            open = open.len(),
            closed = closed.len(),
            "partitioned dataset by closure status"
        );

        Ok(Self {
            dataset,
            open,
            closed,
        })
    }

    #[must_use]
    pub fn dataset(&self) -> &'a Dataset {
        self.dataset
    }

    #[must_use]
    pub fn group(&self, status: ClosureStatus) -> &Group {
        match status {
            ClosureStatus::Open => &self.open,
            ClosureStatus::Closed => &self.closed,
        }
    }

    #[must_use]
    pub fn open(&self) -> &Group {
        &self.open
    }

    #[must_use]
    pub fn closed(&self) -> &Group {
        &self.closed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Cell;

    #[test]
    fn test_partition_by_flag() {
        let dataset = Dataset::new()
            .with_column("closed", [0.0, 1.0, 1.0, 0.0, 0.0])
            .unwrap();
        let partition = GroupPartition::new(&dataset, "closed").unwrap();
        assert_eq!(partition.open().rows(), [0, 3, 4]);
        assert_eq!(partition.closed().rows(), [1, 2]);
        assert_eq!(partition.group(ClosureStatus::Closed).len(), 2);
        assert_eq!(partition.open().len() + partition.closed().len(), dataset.len());
    }

    #[test]
    fn test_missing_flag_column() {
        let dataset = Dataset::new().with_column("x", [0.0]).unwrap();
        let err = GroupPartition::new(&dataset, "closed").unwrap_err();
        assert!(matches!(err, AnalysisError::MissingColumn { .. }));
    }

    #[test]
    fn test_invalid_flag_values() {
        for bad in [Cell::Number(2.0), Cell::Number(0.5), Cell::Missing, Cell::from("yes")] {
            let dataset = Dataset::new()
                .with_column("closed", [Cell::Number(0.0), bad])
                .unwrap();
            let err = GroupPartition::new(&dataset, "closed").unwrap_err();
            assert!(matches!(err, AnalysisError::InvalidFlagValue { row: 1, .. }));
        }
    }

    #[test]
    fn test_one_sided_partition_is_allowed() {
        let dataset = Dataset::new().with_column("closed", [1.0, 1.0]).unwrap();
        let partition = GroupPartition::new(&dataset, "closed").unwrap();
        assert!(partition.open().is_empty());
        assert_eq!(partition.closed().len(), 2);
    }
}

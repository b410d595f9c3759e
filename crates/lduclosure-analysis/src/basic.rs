//! Basic (sum or count) statistics of one column by closure status
//!
//! Each group's aggregate is also reported as a share of the grand total
//! across both groups.

use std::fmt;

use crate::{
    AnalysisError,
    config::{Aggregation, ReportConfig},
    dataset::{Column, Dataset},
    format::grouped,
    partition::{ClosureStatus, Group, GroupPartition},
};

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct BasicStats {
    pub column: String,
    pub aggregation: Aggregation,
    /// Grand total across both groups.
    pub total: f64,
    pub open: f64,
    pub closed: f64,
}

impl BasicStats {
    pub fn compute(
        dataset: &Dataset,
        column: &str,
        config: &ReportConfig,
    ) -> Result<Self, AnalysisError> {
        let partition = GroupPartition::new(dataset, &config.flag_column)?;
        Self::from_partition(&partition, column, config.aggregation)
    }

    /// Aggregates `column` over each group of `partition`.
    ///
    /// Fails with [`AnalysisError::ZeroTotal`] when the grand total is zero,
    /// since the group shares would be undefined.
    pub fn from_partition(
        partition: &GroupPartition<'_>,
        column: &str,
        aggregation: Aggregation,
    ) -> Result<Self, AnalysisError> {
        let col = partition.dataset().column(column)?;
        let open = aggregate(col, partition.open(), aggregation)?;
        let closed = aggregate(col, partition.closed(), aggregation)?;
        let total = open + closed;
        if total == 0.0 {
            return Err(AnalysisError::ZeroTotal {
                measure: column.to_owned(),
            });
        }

        Ok(Self {
            column: column.to_owned(),
            aggregation,
            total,
            open,
            closed,
        })
    }

    #[must_use]
    pub fn value(&self, status: ClosureStatus) -> f64 {
        match status {
            ClosureStatus::Open => self.open,
            ClosureStatus::Closed => self.closed,
        }
    }

    /// Share of the grand total held by `status`, in percent.
    #[must_use]
    pub fn share(&self, status: ClosureStatus) -> f64 {
        self.value(status) / self.total * 100.0
    }

    #[must_use]
    pub fn display<'a>(&'a self, config: &'a ReportConfig) -> BasicStatsDisplay<'a> {
        BasicStatsDisplay {
            stats: self,
            config,
        }
    }
}

#[expect(clippy::cast_precision_loss)]
fn aggregate(column: &Column, group: &Group, aggregation: Aggregation) -> Result<f64, AnalysisError> {
    match aggregation {
        Aggregation::Sum => column.sum_rows(group.rows().iter().copied()),
        Aggregation::Count => Ok(group
            .rows()
            .iter()
            .filter(|&&row| column.get(row).is_some_and(|cell| !cell.is_missing()))
            .count() as f64),
    }
}

/// Text block of a [`BasicStats`].
#[derive(Debug, Clone, Copy)]
pub struct BasicStatsDisplay<'a> {
    stats: &'a BasicStats,
    config: &'a ReportConfig,
}

impl fmt::Display for BasicStatsDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { stats, config } = self;
        let label_width = config.label_width;
        let value_width = config.value_width;
        let precision = match stats.aggregation {
            Aggregation::Sum => config.precision,
            Aggregation::Count => 0,
        };

        write!(f, "{}", stats.column)?;
        write!(f, "\n{}", "-".repeat(stats.column.chars().count()))?;
        write!(
            f,
            "\n{:<label_width$}{}",
            "Total:",
            grouped(stats.total, precision)
        )?;
        for status in ClosureStatus::ALL {
            write!(
                f,
                "\n{:<label_width$}{:<value_width$}({:.share_precision$}%)",
                format!("{status}:"),
                grouped(stats.value(status), precision),
                stats.share(status),
                share_precision = config.precision,
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FLAG: &str = "Closed 2012-2016";

    fn ten_rows() -> Dataset {
        Dataset::new()
            .with_column(FLAG, [0.0, 1.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 1.0, 0.0])
            .unwrap()
            .with_column(
                "Population",
                [10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0, 100.0],
            )
            .unwrap()
    }

    #[test]
    fn test_count_aggregation() {
        let config = ReportConfig {
            aggregation: Aggregation::Count,
            ..ReportConfig::default()
        };
        let stats = BasicStats::compute(&ten_rows(), "Population", &config).unwrap();
        assert_eq!(stats.total, 10.0);
        assert_eq!(stats.open, 6.0);
        assert_eq!(stats.closed, 4.0);
        assert_eq!(stats.share(ClosureStatus::Open), 60.0);
        assert_eq!(stats.share(ClosureStatus::Closed), 40.0);

        let text = stats.display(&config).to_string();
        let lines = text.lines().collect::<Vec<_>>();
        assert_eq!(
            lines,
            [
                "Population",
                "----------",
                "Total:      10",
                "Open:       6           (60.000%)",
                "Closed:     4           (40.000%)",
            ]
        );
    }

    #[test]
    fn test_sum_aggregation_uses_grand_total() {
        let stats =
            BasicStats::compute(&ten_rows(), "Population", &ReportConfig::default()).unwrap();
        assert_eq!(stats.open, 330.0);
        assert_eq!(stats.closed, 220.0);
        assert_eq!(stats.total, 550.0);
        assert_eq!(stats.share(ClosureStatus::Open), 60.0);
    }

    #[test]
    fn test_count_skips_missing() {
        let dataset = Dataset::new()
            .with_column(FLAG, [0.0, 0.0, 1.0])
            .unwrap()
            .with_column("x", [Some(1.0), None, Some(2.0)])
            .unwrap();
        let stats = BasicStats::from_partition(
            &GroupPartition::new(&dataset, FLAG).unwrap(),
            "x",
            Aggregation::Count,
        )
        .unwrap();
        assert_eq!((stats.open, stats.closed, stats.total), (1.0, 1.0, 2.0));
    }

    #[test]
    fn test_zero_total() {
        let dataset = Dataset::new()
            .with_column(FLAG, [0.0, 1.0])
            .unwrap()
            .with_column("x", [0.0, 0.0])
            .unwrap();
        let err = BasicStats::compute(&dataset, "x", &ReportConfig::default()).unwrap_err();
        assert!(matches!(err, AnalysisError::ZeroTotal { .. }));
    }
}

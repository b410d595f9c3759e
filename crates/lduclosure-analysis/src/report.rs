//! Open vs. Closed comparison of a single measure
//!
//! [`Comparison::compute`] runs the whole pipeline for one measure:
//!
//! ```text
//! Dataset
//!     ↓
//! Partition by closure flag (GroupPartition)
//!     ↓
//! Extract measure values per group (Measure)
//!     ↓
//! Summary statistics per group (SummaryStats)
//!     ↓
//! Significance tests between groups (Mann-Whitney U / t-test)
//! ```
//!
//! The result renders as a fixed text block through [`Comparison::display`]:
//!
//! ```text
//! Population
//! ----------
//! Total:      21.000
//! Open:       mean=2.000       median=2.000       (1.000 - 3.000)
//! Closed:     mean=5.000       median=5.000       (4.000 - 6.000)
//! Mann-Whit:  pval=0.100000000
//! ```

use std::fmt;

use lduclosure_stats::{
    descriptive::SummaryStats,
    significance::{
        MannWhitneyMethod, MannWhitneyResult, TTestResult, mann_whitney_u, student_t_test,
        welch_t_test,
    },
};

use crate::{
    AnalysisError,
    config::ReportConfig,
    dataset::Dataset,
    format::{grouped, grouped_value},
    measure::Measure,
    partition::{ClosureStatus, GroupPartition},
};

/// Statistics and test results of one measure, Open vs. Closed.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Comparison {
    pub measure: Measure,
    /// Report header, e.g. `Population` or `% Served`.
    pub label: String,
    /// Whether group values are percentages.
    pub percent: bool,
    /// Dataset-wide sum of the measure column (the numerator for proportions).
    pub total: f64,
    pub open: SummaryStats,
    pub closed: SummaryStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mann_whitney: Option<MannWhitneyResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub t_test: Option<TTestResult>,
}

impl Comparison {
    /// Partitions `dataset` and compares `measure` between the groups.
    pub fn compute(
        dataset: &Dataset,
        measure: &Measure,
        config: &ReportConfig,
    ) -> Result<Self, AnalysisError> {
        let partition = GroupPartition::new(dataset, &config.flag_column)?;
        Self::from_partition(&partition, measure, config)
    }

    /// Compares `measure` between the groups of an existing partition.
    ///
    /// Fails with [`AnalysisError::EmptyGroup`] if either group has no
    /// present values, and with [`AnalysisError::DegenerateSample`] if a
    /// selected test cannot run on the samples.
    pub fn from_partition(
        partition: &GroupPartition<'_>,
        measure: &Measure,
        config: &ReportConfig,
    ) -> Result<Self, AnalysisError> {
        let dataset = partition.dataset();
        measure.validate(dataset)?;

        let (open_values, open) = group_sample(partition, measure, ClosureStatus::Open, config)?;
        let (closed_values, closed) =
            group_sample(partition, measure, ClosureStatus::Closed, config)?;

        let degenerate = |source| AnalysisError::DegenerateSample {
            measure: measure.to_string(),
            source,
        };

        let mann_whitney = if config.tests.includes_mann_whitney() {
            let result = mann_whitney_u(&open_values, &closed_values, config.mann_whitney_method)
                .map_err(degenerate)?;
            if config.mann_whitney_method == MannWhitneyMethod::Auto
                && result.method == MannWhitneyMethod::Asymptotic
            {
                tracing::warn!(
                    measure = %measure,
                    open = open_values.len(),
                    closed = closed_values.len(),
                    "exact Mann-Whitney U infeasible, using normal approximation"
                );
            }
            Some(result)
        } else {
            None
        };

        let t_test = if config.tests.includes_t_test() {
            let result = if config.equal_var {
                student_t_test(&open_values, &closed_values)
            } else {
                welch_t_test(&open_values, &closed_values)
            };
            Some(result.map_err(degenerate)?)
        } else {
            None
        };

        Ok(Self {
            measure: measure.clone(),
            label: measure.to_string(),
            percent: measure.is_percent(config.proportion_scale),
            total: measure.total(dataset)?,
            open,
            closed,
            mann_whitney,
            t_test,
        })
    }

    #[must_use]
    pub fn summary(&self, status: ClosureStatus) -> &SummaryStats {
        match status {
            ClosureStatus::Open => &self.open,
            ClosureStatus::Closed => &self.closed,
        }
    }

    /// Text rendering of the comparison under the given formatting options.
    #[must_use]
    pub fn display<'a>(&'a self, config: &'a ReportConfig) -> ComparisonDisplay<'a> {
        ComparisonDisplay {
            comparison: self,
            config,
        }
    }
}

fn group_sample(
    partition: &GroupPartition<'_>,
    measure: &Measure,
    status: ClosureStatus,
    config: &ReportConfig,
) -> Result<(Vec<f64>, SummaryStats), AnalysisError> {
    let values = measure
        .extract(
            partition.dataset(),
            partition.group(status),
            config.proportion_scale,
        )?
        .into_iter()
        .flatten()
        .collect::<Vec<_>>();
    let stats =
        SummaryStats::new(values.iter().copied()).ok_or_else(|| AnalysisError::EmptyGroup {
            status,
            measure: measure.to_string(),
        })?;
    Ok((values, stats))
}

/// Text block of a [`Comparison`].
#[derive(Debug, Clone, Copy)]
pub struct ComparisonDisplay<'a> {
    comparison: &'a Comparison,
    config: &'a ReportConfig,
}

impl fmt::Display for ComparisonDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { comparison, config } = self;
        let label_width = config.label_width;
        let value_width = config.value_width;
        let value = |v: f64| grouped_value(v, config.precision, comparison.percent);

        write!(f, "{}", comparison.label)?;
        write!(f, "\n{}", "-".repeat(comparison.label.chars().count()))?;
        write!(
            f,
            "\n{:<label_width$}{}",
            "Total:",
            grouped(comparison.total, config.precision)
        )?;

        for status in ClosureStatus::ALL {
            let stats = comparison.summary(status);
            write!(
                f,
                "\n{:<label_width$}mean={:<value_width$}median={:<value_width$}({} - {})",
                format!("{status}:"),
                value(stats.mean),
                value(stats.median),
                value(stats.min),
                value(stats.max),
            )?;
        }

        let precision = config.p_value_precision;
        if let Some(result) = &comparison.mann_whitney {
            write!(
                f,
                "\n{:<label_width$}pval={:.precision$}",
                "Mann-Whit:", result.p_value
            )?;
        }
        if let Some(result) = &comparison.t_test {
            write!(
                f,
                "\n{:<label_width$}pval={:.precision$}",
                "T-test:", result.p_value
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use lduclosure_stats::significance::TestError;
    use rand::Rng as _;
    use rand_pcg::Pcg64Mcg;

    use super::*;
    use crate::config::TestSelection;

    const FLAG: &str = "Closed 2012-2016";

    fn small_dataset() -> Dataset {
        Dataset::new()
            .with_column(FLAG, [0.0, 0.0, 0.0, 1.0, 1.0, 1.0])
            .unwrap()
            .with_column("Population", [1.0, 2.0, 3.0, 4.0, 5.0, 6.0])
            .unwrap()
    }

    #[test]
    fn test_separated_groups() {
        let config = ReportConfig {
            tests: TestSelection::Both,
            ..ReportConfig::default()
        };
        let comparison =
            Comparison::compute(&small_dataset(), &Measure::count("Population"), &config)
                .unwrap();

        assert_eq!(comparison.open.mean, 2.0);
        assert_eq!(comparison.closed.mean, 5.0);
        assert_eq!(comparison.open.median, 2.0);
        assert_eq!(comparison.closed.median, 5.0);
        assert_eq!(comparison.total, 21.0);

        let mwu = comparison.mann_whitney.unwrap();
        assert!((mwu.p_value - 0.1).abs() < 1e-12);
        assert_eq!(mwu.method, MannWhitneyMethod::Exact);
        let t = comparison.t_test.unwrap();
        assert!(t.p_value < 0.05);
    }

    #[test]
    fn test_render_count_report() {
        let config = ReportConfig {
            tests: TestSelection::Both,
            ..ReportConfig::default()
        };
        let comparison =
            Comparison::compute(&small_dataset(), &Measure::count("Population"), &config)
                .unwrap();
        let text = comparison.display(&config).to_string();
        let lines = text.lines().collect::<Vec<_>>();
        assert_eq!(
            lines,
            [
                "Population",
                "----------",
                "Total:      21.000",
                "Open:       mean=2.000       median=2.000       (1.000 - 3.000)",
                "Closed:     mean=5.000       median=5.000       (4.000 - 6.000)",
                "Mann-Whit:  pval=0.100000000",
                "T-test:     pval=0.021311641",
            ]
        );
    }

    #[test]
    fn test_render_percent_proportion() {
        let dataset = Dataset::new()
            .with_column(FLAG, [0.0, 1.0])
            .unwrap()
            .with_column("Served", [50.0, 1500.0])
            .unwrap()
            .with_column("Population", [100.0, 2000.0])
            .unwrap();
        let config = ReportConfig {
            precision: 1,
            p_value_precision: 3,
            ..ReportConfig::default()
        };
        let comparison =
            Comparison::compute(&dataset, &Measure::proportion("Served", "Population"), &config)
                .unwrap();
        let text = comparison.display(&config).to_string();
        let lines = text.lines().collect::<Vec<_>>();
        assert_eq!(lines[0], "% Served");
        assert_eq!(lines[1], "--------");
        assert_eq!(lines[2], "Total:      1,550.0");
        assert_eq!(
            lines[3],
            "Open:       mean=50.0%       median=50.0%       (50.0% - 50.0%)"
        );
        assert_eq!(
            lines[4],
            "Closed:     mean=75.0%       median=75.0%       (75.0% - 75.0%)"
        );
        assert_eq!(lines[5], "Mann-Whit:  pval=1.000");
    }

    #[test]
    fn test_empty_group() {
        let dataset = Dataset::new()
            .with_column(FLAG, [0.0, 1.0, 1.0, 1.0])
            .unwrap()
            .with_column("Population", [None, Some(1.0), Some(2.0), Some(3.0)])
            .unwrap();
        let err = Comparison::compute(
            &dataset,
            &Measure::count("Population"),
            &ReportConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::EmptyGroup {
                status: ClosureStatus::Open,
                ..
            }
        ));
    }

    #[test]
    fn test_degenerate_t_test() {
        let dataset = Dataset::new()
            .with_column(FLAG, [0.0, 1.0, 1.0])
            .unwrap()
            .with_column("Population", [1.0, 2.0, 3.0])
            .unwrap();
        let config = ReportConfig {
            tests: TestSelection::TTest,
            ..ReportConfig::default()
        };
        let err =
            Comparison::compute(&dataset, &Measure::count("Population"), &config).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::DegenerateSample {
                source: TestError::TooFewSamples { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_group_sums_add_up_to_total() {
        let mut rng = Pcg64Mcg::new(7);
        for _ in 0..50 {
            let rows = rng.random_range(4..40);
            let mut flags = (0..rows)
                .map(|_| f64::from(u8::from(rng.random_bool(0.4))))
                .collect::<Vec<_>>();
            flags[0] = 0.0;
            flags[1] = 1.0;
            let values = (0..rows)
                .map(|_| f64::from(rng.random_range(0..1000_u16)))
                .collect::<Vec<_>>();
            let dataset = Dataset::new()
                .with_column(FLAG, flags)
                .unwrap()
                .with_column("x", values)
                .unwrap();
            let comparison =
                Comparison::compute(&dataset, &Measure::count("x"), &ReportConfig::default())
                    .unwrap();
            assert_eq!(
                comparison.open.sum + comparison.closed.sum,
                comparison.total
            );
            assert_eq!(comparison.open.count + comparison.closed.count, rows);
        }
    }
}

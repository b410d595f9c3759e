//! Report entry points that compute and emit in one call
//!
//! A [`Reporter`] owns a [`ReportConfig`] and an [`OutputSink`]. Each method
//! computes its result, writes the rendered block to the sink, and returns
//! the result so callers can reuse it (for charts or JSON export).

use std::io;

use crate::{
    AnalysisError,
    basic::BasicStats,
    config::ReportConfig,
    contingency::TwoByTwo,
    dataset::Dataset,
    measure::Measure,
    report::Comparison,
    sink::OutputSink,
};

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum ReportError {
    #[display("{_0}")]
    Analysis(AnalysisError),
    #[display("failed to write report: {_0}")]
    Output(io::Error),
}

#[derive(Debug)]
pub struct Reporter<S> {
    sink: S,
    config: ReportConfig,
}

impl<S> Reporter<S>
where
    S: OutputSink,
{
    pub fn new(sink: S, config: ReportConfig) -> Self {
        Self { sink, config }
    }

    #[must_use]
    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Compares a Count measure (a single numeric column).
    pub fn count_stats(
        &mut self,
        dataset: &Dataset,
        column: &str,
    ) -> Result<Comparison, ReportError> {
        self.compare(dataset, &Measure::count(column))
    }

    /// Compares the Proportion measure `numerator / denominator`.
    pub fn proportion_stats(
        &mut self,
        dataset: &Dataset,
        numerator: &str,
        denominator: &str,
    ) -> Result<Comparison, ReportError> {
        self.compare(dataset, &Measure::proportion(numerator, denominator))
    }

    pub fn compare(
        &mut self,
        dataset: &Dataset,
        measure: &Measure,
    ) -> Result<Comparison, ReportError> {
        let comparison = Comparison::compute(dataset, measure, &self.config)?;
        self.sink.display(&comparison.display(&self.config).to_string())?;
        Ok(comparison)
    }

    pub fn basic_stats(
        &mut self,
        dataset: &Dataset,
        column: &str,
    ) -> Result<BasicStats, ReportError> {
        let stats = BasicStats::compute(dataset, column, &self.config)?;
        self.sink.display(&stats.display(&self.config).to_string())?;
        Ok(stats)
    }

    pub fn two_by_two(
        &mut self,
        dataset: &Dataset,
        first: &str,
        second: &str,
    ) -> Result<TwoByTwo, ReportError> {
        let table = TwoByTwo::compute(dataset, &self.config.flag_column, first, second)?;
        self.sink.display(&table.to_string())?;
        Ok(table)
    }

    /// Emits a preview of the first `rows` records, only when `show` is set.
    pub fn show_dataset(&mut self, dataset: &Dataset, rows: usize, show: bool) -> io::Result<()> {
        if !show {
            return Ok(());
        }
        self.sink.display(&dataset.preview(rows).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{partition::ClosureStatus, sink::MemorySink};

    const FLAG: &str = "Closed 2012-2016";

    fn dataset() -> Dataset {
        Dataset::new()
            .with_column(FLAG, [0.0, 0.0, 0.0, 1.0, 1.0, 1.0])
            .unwrap()
            .with_column("Population", [1.0, 2.0, 3.0, 4.0, 5.0, 6.0])
            .unwrap()
            .with_column("Served", [1.0, 1.0, 3.0, 2.0, 4.0, 3.0])
            .unwrap()
    }

    #[test]
    fn test_blocks_emitted_in_call_order() {
        let dataset = dataset();
        let mut reporter = Reporter::new(MemorySink::new(), ReportConfig::default());
        let count = reporter.count_stats(&dataset, "Population").unwrap();
        let proportion = reporter
            .proportion_stats(&dataset, "Served", "Population")
            .unwrap();
        reporter.basic_stats(&dataset, "Served").unwrap();
        reporter.two_by_two(&dataset, "Served", "Population").unwrap();

        assert_eq!(count.open.median, 2.0);
        assert!(proportion.percent);
        assert_eq!(proportion.summary(ClosureStatus::Open).max, 100.0);

        let blocks = reporter.into_sink().into_blocks();
        assert_eq!(blocks.len(), 4);
        assert!(blocks[0].starts_with("Population\n----------\n"));
        assert!(blocks[1].starts_with("% Served\n--------\n"));
        assert!(blocks[2].starts_with("Served\n------\nTotal:      14.000"));
        assert!(blocks[3].starts_with("Served, Closed:"));
    }

    #[test]
    fn test_show_dataset_respects_flag() {
        let dataset = dataset();
        let mut reporter = Reporter::new(MemorySink::new(), ReportConfig::default());
        reporter.show_dataset(&dataset, 2, false).unwrap();
        assert!(reporter.into_sink().blocks().is_empty());

        let mut reporter = Reporter::new(MemorySink::new(), ReportConfig::default());
        reporter.show_dataset(&dataset, 2, true).unwrap();
        let blocks = reporter.into_sink().into_blocks();
        assert_eq!(blocks.len(), 1);
        assert!(blocks[0].ends_with("[6 rows x 3 columns]"));
    }

    #[test]
    fn test_errors_emit_nothing() {
        let dataset = dataset();
        let mut reporter = Reporter::new(MemorySink::new(), ReportConfig::default());
        let err = reporter.count_stats(&dataset, "Area").unwrap_err();
        assert!(matches!(
            err,
            ReportError::Analysis(AnalysisError::MissingColumn { .. })
        ));
        assert!(reporter.into_sink().blocks().is_empty());
    }
}

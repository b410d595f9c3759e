//! Open vs. Closed comparisons of LDU (Local Distribution Unit) measures
//!
//! This crate partitions a tabular dataset of LDUs by their binary closure
//! flag, derives per-group measure values, computes summary statistics and
//! significance tests, and renders the results as fixed text reports and a
//! grouped median bar chart.
//!
//! # Overview
//!
//! ## Comparison Workflow
//!
//! 1. **Load Data** ([`dataset::Dataset`]): Build a dataset from columns or JSON records
//! 2. **Partition** ([`partition::GroupPartition`]): Split records into Open and Closed groups
//! 3. **Extract** ([`measure::Measure`]): Derive Count or Proportion values per group
//! 4. **Compare** ([`report::Comparison`]): Summaries plus Mann-Whitney U / t-test p-values
//! 5. **Emit** ([`reporter::Reporter`]): Render each report block to an [`sink::OutputSink`]
//!
//! ## Other Reports
//!
//! - [`basic::BasicStats`]: Sum or count of a column per group, with shares of the total
//! - [`contingency::TwoByTwo`]: Marginal sums of two indicator columns per group
//! - [`chart::MedianChart`]: Grouped median bars with p-value annotations, as SVG
//!
//! # Examples
//!
//! ```
//! use lduclosure_analysis::{
//!     config::ReportConfig, dataset::Dataset, reporter::Reporter, sink::MemorySink,
//! };
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//!
//! let dataset = Dataset::new()
//!     .with_column("Closed 2012-2016", [0.0, 0.0, 0.0, 1.0, 1.0, 1.0])?
//!     .with_column("Population", [1.0, 2.0, 3.0, 4.0, 5.0, 6.0])?;
//!
//! let mut reporter = Reporter::new(MemorySink::new(), ReportConfig::default());
//! let comparison = reporter.count_stats(&dataset, "Population")?;
//! assert_eq!(comparison.closed.median, 5.0);
//!
//! let blocks = reporter.into_sink().into_blocks();
//! assert!(blocks[0].ends_with("Mann-Whit:  pval=0.100000000"));
//! # Ok(())
//! # }
//! ```

pub use self::error::AnalysisError;

pub mod basic;
pub mod chart;
pub mod config;
pub mod contingency;
pub mod dataset;
mod error;
pub mod format;
pub mod measure;
pub mod partition;
pub mod report;
pub mod reporter;
pub mod sink;

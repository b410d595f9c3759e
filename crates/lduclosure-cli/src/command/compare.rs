//! Count and Proportion comparison commands

use std::path::PathBuf;

use anyhow::Context;
use lduclosure_analysis::measure::ProportionScale;

use super::ReportArgs;
use crate::util;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct CountArg {
    /// Path to the dataset JSON file (an array of records)
    data: PathBuf,

    /// Numeric columns to compare (comma-separated or repeated)
    #[arg(long = "measure", required = true, value_delimiter = ',')]
    measures: Vec<String>,

    #[clap(flatten)]
    report: ReportArgs,
}

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ProportionArg {
    /// Path to the dataset JSON file (an array of records)
    data: PathBuf,

    /// Column used as the numerator of the proportion
    #[arg(long)]
    numerator: String,

    /// Column used as the denominator of the proportion
    #[arg(long)]
    denominator: String,

    /// Report the raw ratio instead of a percentage
    #[arg(long)]
    raw: bool,

    #[clap(flatten)]
    report: ReportArgs,
}

pub(crate) fn run_count(arg: &CountArg) -> anyhow::Result<()> {
    let dataset = util::read_dataset(&arg.data)?;
    let mut reporter = super::stdout_reporter(arg.report.config());

    let mut comparisons = Vec::with_capacity(arg.measures.len());
    for measure in &arg.measures {
        let comparison = reporter
            .count_stats(&dataset, measure)
            .with_context(|| format!("Failed to compare measure '{measure}'"))?;
        comparisons.push(comparison);
    }

    super::save_json(&comparisons, arg.report.json.as_ref())
}

pub(crate) fn run_proportion(arg: &ProportionArg) -> anyhow::Result<()> {
    let dataset = util::read_dataset(&arg.data)?;
    let mut config = arg.report.config();
    if arg.raw {
        config.proportion_scale = ProportionScale::Raw;
    }
    let mut reporter = super::stdout_reporter(config);

    let comparison = reporter
        .proportion_stats(&dataset, &arg.numerator, &arg.denominator)
        .with_context(|| {
            format!(
                "Failed to compare proportion '{} / {}'",
                arg.numerator, arg.denominator
            )
        })?;

    super::save_json(&comparison, arg.report.json.as_ref())
}

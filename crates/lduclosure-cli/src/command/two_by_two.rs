use std::path::PathBuf;

use anyhow::Context;
use lduclosure_analysis::config::{DEFAULT_FLAG_COLUMN, ReportConfig};

use crate::util;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct TwoByTwoArg {
    /// Path to the dataset JSON file (an array of records)
    data: PathBuf,

    /// First indicator column
    #[arg(long)]
    ind1: String,

    /// Second indicator column
    #[arg(long)]
    ind2: String,

    /// Name of the binary closure flag column
    #[arg(long, default_value = DEFAULT_FLAG_COLUMN)]
    flag_column: String,

    /// Also write the computed sums as JSON to this path
    #[arg(long)]
    json: Option<PathBuf>,
}

pub(crate) fn run(arg: &TwoByTwoArg) -> anyhow::Result<()> {
    let dataset = util::read_dataset(&arg.data)?;
    let config = ReportConfig {
        flag_column: arg.flag_column.clone(),
        ..ReportConfig::default()
    };
    let mut reporter = super::stdout_reporter(config);
    let table = reporter
        .two_by_two(&dataset, &arg.ind1, &arg.ind2)
        .with_context(|| format!("Failed to tabulate '{}' and '{}'", arg.ind1, arg.ind2))?;
    super::save_json(&table, arg.json.as_ref())
}

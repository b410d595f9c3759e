use std::path::PathBuf;

use anyhow::Context;
use lduclosure_analysis::config::{Aggregation, DEFAULT_FLAG_COLUMN, ReportConfig};

use crate::util;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct BasicArg {
    /// Path to the dataset JSON file (an array of records)
    data: PathBuf,

    /// Column to aggregate
    #[arg(long)]
    measure: String,

    /// Aggregation applied per group (sum, count)
    #[arg(long, default_value = "sum")]
    agg: Aggregation,

    /// Name of the binary closure flag column
    #[arg(long, default_value = DEFAULT_FLAG_COLUMN)]
    flag_column: String,

    /// Decimal places of reported values
    #[arg(long, default_value_t = 3)]
    precision: usize,

    /// Also write the computed results as JSON to this path
    #[arg(long)]
    json: Option<PathBuf>,
}

pub(crate) fn run(arg: &BasicArg) -> anyhow::Result<()> {
    let dataset = util::read_dataset(&arg.data)?;
    let config = ReportConfig {
        flag_column: arg.flag_column.clone(),
        precision: arg.precision,
        aggregation: arg.agg,
        ..ReportConfig::default()
    };
    let mut reporter = super::stdout_reporter(config);
    let stats = reporter
        .basic_stats(&dataset, &arg.measure)
        .with_context(|| format!("Failed to aggregate column '{}'", arg.measure))?;
    super::save_json(&stats, arg.json.as_ref())
}

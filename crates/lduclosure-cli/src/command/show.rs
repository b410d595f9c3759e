use std::path::PathBuf;

use lduclosure_analysis::config::ReportConfig;

use crate::util;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ShowArg {
    /// Path to the dataset JSON file (an array of records)
    data: PathBuf,

    /// Number of leading records to show
    #[arg(long, default_value_t = 5)]
    rows: usize,
}

pub(crate) fn run(arg: &ShowArg) -> anyhow::Result<()> {
    let dataset = util::read_dataset(&arg.data)?;
    let mut reporter = super::stdout_reporter(ReportConfig::default());
    reporter.show_dataset(&dataset, arg.rows, true)?;
    Ok(())
}

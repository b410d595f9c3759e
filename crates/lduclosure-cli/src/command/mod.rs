use std::path::PathBuf;

use clap::{Parser, Subcommand};
use lduclosure_analysis::{
    config::{DEFAULT_FLAG_COLUMN, ReportConfig, TestSelection},
    reporter::Reporter,
    sink::WriterSink,
};
use lduclosure_stats::significance::MannWhitneyMethod;
use tracing_subscriber::EnvFilter;

use self::{
    basic::BasicArg, compare::CountArg, compare::ProportionArg, plot_medians::PlotMediansArg,
    show::ShowArg, two_by_two::TwoByTwoArg,
};
use crate::util::Output;

mod basic;
mod compare;
mod plot_medians;
mod show;
mod two_by_two;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Enable debug logging to stderr
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Preview the leading records of a dataset
    Show(#[clap(flatten)] ShowArg),
    /// Compare Count measures between open and closed LDUs
    Count(#[clap(flatten)] CountArg),
    /// Compare a Proportion measure between open and closed LDUs
    Proportion(#[clap(flatten)] ProportionArg),
    /// Sum or count a column by closure status
    Basic(#[clap(flatten)] BasicArg),
    /// Report the marginal sums of a 2x2 contingency table
    TwoByTwo(#[clap(flatten)] TwoByTwoArg),
    /// Plot group medians with Mann-Whitney p-values as SVG
    PlotMedians(#[clap(flatten)] PlotMediansArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    init_tracing(args.debug);
    match &args.mode {
        Mode::Show(arg) => show::run(arg)?,
        Mode::Count(arg) => compare::run_count(arg)?,
        Mode::Proportion(arg) => compare::run_proportion(arg)?,
        Mode::Basic(arg) => basic::run(arg)?,
        Mode::TwoByTwo(arg) => two_by_two::run(arg)?,
        Mode::PlotMedians(arg) => plot_medians::run(arg)?,
    }
    Ok(())
}

fn init_tracing(debug: bool) {
    let level = if debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();
}

/// Options shared by the comparison reports
#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ReportArgs {
    /// Name of the binary closure flag column
    #[arg(long, default_value = DEFAULT_FLAG_COLUMN)]
    flag_column: String,

    /// Significance tests to run (mannwhitney, ttest, both)
    #[arg(long, default_value = "mannwhitney")]
    tests: TestSelection,

    /// Decimal places of reported values
    #[arg(long, default_value_t = 3)]
    precision: usize,

    /// Decimal places of reported p-values
    #[arg(long, default_value_t = 9)]
    p_value_precision: usize,

    /// Width of the line label column
    #[arg(long, default_value_t = 12)]
    label_width: usize,

    /// Width of each mean/median value field
    #[arg(long, default_value_t = 12)]
    value_width: usize,

    /// Use Student's pooled-variance t-test instead of Welch's
    #[arg(long)]
    equal_var: bool,

    /// Mann-Whitney U method (auto, exact, asymptotic)
    #[arg(long, default_value = "auto")]
    method: MannWhitneyMethod,

    /// Also write the computed results as JSON to this path
    #[arg(long)]
    json: Option<PathBuf>,
}

impl ReportArgs {
    fn config(&self) -> ReportConfig {
        ReportConfig {
            flag_column: self.flag_column.clone(),
            tests: self.tests,
            precision: self.precision,
            p_value_precision: self.p_value_precision,
            label_width: self.label_width,
            value_width: self.value_width,
            equal_var: self.equal_var,
            mann_whitney_method: self.method,
            ..ReportConfig::default()
        }
    }
}

fn stdout_reporter(config: ReportConfig) -> Reporter<WriterSink<Output>> {
    Reporter::new(WriterSink::new(Output::stdout()), config)
}

fn save_json<T>(value: &T, path: Option<&PathBuf>) -> anyhow::Result<()>
where
    T: serde::Serialize,
{
    if let Some(path) = path {
        Output::save_json(value, path)?;
        tracing::debug!(path = %path.display(), "wrote JSON results");
    }
    Ok(())
}

//! Median bar chart command
//!
//! Compares every requested measure, prints the report blocks, and writes
//! the grouped median chart as `<output-dir>/medians<anno>.svg`.

use std::{path::PathBuf, str::FromStr};

use anyhow::{Context, bail};
use lduclosure_analysis::{
    chart::{ChartConfig, MedianChart},
    config::{DEFAULT_FLAG_COLUMN, ReportConfig, TestSelection},
    measure::Measure,
};
use lduclosure_stats::significance::MannWhitneyMethod;

use crate::util;

/// A `NUMERATOR/DENOMINATOR` column pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ProportionSpec {
    numerator: String,
    denominator: String,
}

impl FromStr for ProportionSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((numerator, denominator)) = s.rsplit_once('/') else {
            return Err(format!("expected NUMERATOR/DENOMINATOR, got '{s}'"));
        };
        if numerator.is_empty() || denominator.is_empty() {
            return Err(format!("expected NUMERATOR/DENOMINATOR, got '{s}'"));
        }
        Ok(Self {
            numerator: numerator.to_owned(),
            denominator: denominator.to_owned(),
        })
    }
}

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PlotMediansArg {
    /// Path to the dataset JSON file (an array of records)
    data: PathBuf,

    /// Count measure columns to plot (comma-separated or repeated)
    #[arg(long = "measure", value_delimiter = ',')]
    measures: Vec<String>,

    /// Proportion measures to plot, as NUMERATOR/DENOMINATOR
    #[arg(long = "proportion")]
    proportions: Vec<ProportionSpec>,

    /// Width of each bar; must be in (0, 0.5)
    #[arg(long, default_value_t = 0.25)]
    bar_width: f64,

    /// Annotation appended to the chart file name
    #[arg(long, default_value = "")]
    anno: String,

    /// Directory the chart is written to
    #[arg(long, default_value = "figs")]
    output_dir: PathBuf,

    /// Decimal places of the bar value labels
    #[arg(long, default_value_t = 3)]
    precision: usize,

    /// Name of the binary closure flag column
    #[arg(long, default_value = DEFAULT_FLAG_COLUMN)]
    flag_column: String,

    /// Mann-Whitney U method (auto, exact, asymptotic)
    #[arg(long, default_value = "auto")]
    method: MannWhitneyMethod,
}

pub(crate) fn run(arg: &PlotMediansArg) -> anyhow::Result<()> {
    if arg.measures.is_empty() && arg.proportions.is_empty() {
        bail!("At least one --measure or --proportion is required");
    }

    let dataset = util::read_dataset(&arg.data)?;
    let config = ReportConfig {
        flag_column: arg.flag_column.clone(),
        tests: TestSelection::MannWhitney,
        mann_whitney_method: arg.method,
        ..ReportConfig::default()
    };

    let measures = arg
        .measures
        .iter()
        .map(Measure::count)
        .chain(
            arg.proportions
                .iter()
                .map(|p| Measure::proportion(&p.numerator, &p.denominator)),
        );

    let mut reporter = super::stdout_reporter(config);
    let mut comparisons = Vec::new();
    for measure in measures {
        let comparison = reporter
            .compare(&dataset, &measure)
            .with_context(|| format!("Failed to compare measure '{measure}'"))?;
        comparisons.push(comparison);
    }

    let chart = MedianChart::from_comparisons(&comparisons).context("Failed to build chart")?;
    let chart_config = ChartConfig {
        bar_width: arg.bar_width,
        precision: arg.precision,
        annotation: arg.anno.clone(),
        output_dir: arg.output_dir.clone(),
    };
    let path = util::save_chart(&chart, &chart_config)?;
    eprintln!("Saved median chart to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_proportion_spec() {
        assert_eq!(
            "Births/Population".parse::<ProportionSpec>().unwrap(),
            ProportionSpec {
                numerator: "Births".to_owned(),
                denominator: "Population".to_owned(),
            }
        );
        assert!("Births".parse::<ProportionSpec>().is_err());
        assert!("Births/".parse::<ProportionSpec>().is_err());
    }
}

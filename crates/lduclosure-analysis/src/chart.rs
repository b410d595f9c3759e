//! Grouped bar chart of Open vs. Closed medians
//!
//! Each measure gets a pair of bars: Open (hatched) on the left and Closed
//! (firebrick) on the right, each labeled with its value (suffixed with `%`
//! for percentage measures). The Mann-Whitney
//! p-value is written above the pair, bold and starred when significant.
//! The chart renders to standalone SVG text.

use std::{fmt, path::PathBuf};

use crate::{format::grouped_value, report::Comparison};

/// p-values below this are drawn bold with a trailing `*`.
pub const SIGNIFICANCE_LEVEL: f64 = 0.05;

const WIDTH: f64 = 800.0;
const HEIGHT: f64 = 600.0;
const MARGIN_LEFT: f64 = 40.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 20.0;
const MARGIN_BOTTOM: f64 = 50.0;
const FONT_SIZE: f64 = 14.0;
const OPEN_COLOR: &str = "#1f77b4";
const CLOSED_COLOR: &str = "firebrick";
const OPEN_LEGEND: &str = "LDU Remained Open";
const CLOSED_LEGEND: &str = "LDU Closed";

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ChartError {
    #[display("chart has no measures")]
    Empty,
    #[display(
        "chart series lengths differ: {labels} labels, {open} open, {closed} closed, {p_values} p-values"
    )]
    MismatchedSeries {
        labels: usize,
        open: usize,
        closed: usize,
        p_values: usize,
    },
    #[display("chart has {labels} labels but {percent} percent flags")]
    MismatchedPercent { labels: usize, percent: usize },
    #[display("bar width must be in (0, 0.5), got {width}")]
    InvalidBarWidth { width: f64 },
    #[display("measure '{label}' has a non-finite value")]
    NonFiniteValue { label: String },
    #[display("measure '{label}' has no Mann-Whitney p-value")]
    MissingPValue { label: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartConfig {
    /// Width of each bar, in units of the distance between measures.
    pub bar_width: f64,
    /// Decimal places of the bar value labels.
    pub precision: usize,
    /// Appended to the file name: `medians<annotation>.svg`.
    pub annotation: String,
    pub output_dir: PathBuf,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            bar_width: 0.25,
            precision: 3,
            annotation: String::new(),
            output_dir: PathBuf::from("figs"),
        }
    }
}

impl ChartConfig {
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("medians{}.svg", self.annotation)
    }

    #[must_use]
    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(self.file_name())
    }

    fn validate(&self) -> Result<(), ChartError> {
        if self.bar_width > 0.0 && self.bar_width < 0.5 {
            Ok(())
        } else {
            Err(ChartError::InvalidBarWidth {
                width: self.bar_width,
            })
        }
    }
}

/// Medians and p-values of a set of measures, ready to plot.
#[derive(Debug, Clone, PartialEq)]
pub struct MedianChart {
    labels: Vec<String>,
    open: Vec<f64>,
    closed: Vec<f64>,
    p_values: Vec<f64>,
    percent: Vec<bool>,
}

impl MedianChart {
    pub fn new(
        labels: Vec<String>,
        open: Vec<f64>,
        closed: Vec<f64>,
        p_values: Vec<f64>,
    ) -> Result<Self, ChartError> {
        if labels.is_empty() {
            return Err(ChartError::Empty);
        }
        let n = labels.len();
        if open.len() != n || closed.len() != n || p_values.len() != n {
            return Err(ChartError::MismatchedSeries {
                labels: n,
                open: open.len(),
                closed: closed.len(),
                p_values: p_values.len(),
            });
        }
        for (i, label) in labels.iter().enumerate() {
            if !(open[i].is_finite() && closed[i].is_finite() && p_values[i].is_finite()) {
                return Err(ChartError::NonFiniteValue {
                    label: label.clone(),
                });
            }
        }

        let percent = vec![false; n];
        Ok(Self {
            labels,
            open,
            closed,
            p_values,
            percent,
        })
    }

    /// Marks which measures are percentages; their bar labels get a `%`
    /// suffix.
    pub fn with_percent(mut self, percent: Vec<bool>) -> Result<Self, ChartError> {
        if percent.len() != self.labels.len() {
            return Err(ChartError::MismatchedPercent {
                labels: self.labels.len(),
                percent: percent.len(),
            });
        }
        self.percent = percent;
        Ok(self)
    }

    /// Builds a chart from the group medians and Mann-Whitney p-values of
    /// each comparison.
    pub fn from_comparisons(comparisons: &[Comparison]) -> Result<Self, ChartError> {
        let mut labels = Vec::with_capacity(comparisons.len());
        let mut open = Vec::with_capacity(comparisons.len());
        let mut closed = Vec::with_capacity(comparisons.len());
        let mut p_values = Vec::with_capacity(comparisons.len());
        let mut percent = Vec::with_capacity(comparisons.len());
        for comparison in comparisons {
            let Some(mann_whitney) = &comparison.mann_whitney else {
                return Err(ChartError::MissingPValue {
                    label: comparison.label.clone(),
                });
            };
            labels.push(comparison.label.clone());
            open.push(comparison.open.median);
            closed.push(comparison.closed.median);
            p_values.push(mann_whitney.p_value);
            percent.push(comparison.percent);
        }
        Self::new(labels, open, closed, p_values)?.with_percent(percent)
    }

    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Validates `config` and returns a displayable SVG document.
    pub fn svg<'a>(&'a self, config: &'a ChartConfig) -> Result<SvgChart<'a>, ChartError> {
        config.validate()?;
        Ok(SvgChart {
            chart: self,
            config,
        })
    }

    pub fn render_svg(&self, config: &ChartConfig) -> Result<String, ChartError> {
        Ok(self.svg(config)?.to_string())
    }
}

/// Formats a p-value annotation, returning the text and whether it is
/// significant.
#[must_use]
pub fn p_value_label(p_value: f64) -> (String, bool) {
    if p_value < SIGNIFICANCE_LEVEL {
        (format!("p = {p_value:.3}*"), true)
    } else {
        (format!("p = {p_value:.3}"), false)
    }
}

/// SVG rendering of a [`MedianChart`].
#[derive(Debug, Clone, Copy)]
pub struct SvgChart<'a> {
    chart: &'a MedianChart,
    config: &'a ChartConfig,
}

/// Maps data coordinates to pixels.
#[derive(Debug, Clone, Copy)]
struct Frame {
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
}

impl Frame {
    fn x(&self, x: f64) -> f64 {
        let width = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
        MARGIN_LEFT + (x - self.x_min) / (self.x_max - self.x_min) * width
    }

    fn y(&self, y: f64) -> f64 {
        let height = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
        HEIGHT - MARGIN_BOTTOM - (y - self.y_min) / (self.y_max - self.y_min) * height
    }

    fn x_scale(&self) -> f64 {
        (WIDTH - MARGIN_LEFT - MARGIN_RIGHT) / (self.x_max - self.x_min)
    }
}

impl SvgChart<'_> {
    #[expect(clippy::cast_precision_loss)]
    fn frame(&self) -> Frame {
        let chart = self.chart;
        let low = chart
            .open
            .iter()
            .chain(&chart.closed)
            .copied()
            .fold(0.0, f64::min);
        let mut high = 1.3 * self.peak();
        if high <= low {
            high = low + 1.0;
        }
        Frame {
            x_min: -0.5,
            x_max: chart.len() as f64 - 0.5,
            y_min: low,
            y_max: high,
        }
    }

    fn peak(&self) -> f64 {
        self.chart
            .open
            .iter()
            .chain(&self.chart.closed)
            .copied()
            .fold(0.0, f64::max)
    }

    fn write_bar(
        &self,
        f: &mut fmt::Formatter<'_>,
        frame: &Frame,
        center: f64,
        value: f64,
        percent: bool,
        fill: &str,
    ) -> fmt::Result {
        let half = self.config.bar_width / 2.0;
        let left = frame.x(center - half);
        let width = self.config.bar_width * frame.x_scale();
        let (top, bottom) = if value >= 0.0 {
            (frame.y(value), frame.y(0.0))
        } else {
            (frame.y(0.0), frame.y(value))
        };
        writeln!(
            f,
            r#"  <rect x="{left:.2}" y="{top:.2}" width="{width:.2}" height="{:.2}" fill="{fill}" stroke="white"/>"#,
            bottom - top
        )?;
        let label_y = if value >= 0.0 { top - 5.0 } else { bottom + FONT_SIZE + 5.0 };
        writeln!(
            f,
            r#"  <text x="{:.2}" y="{label_y:.2}" text-anchor="middle">{}</text>"#,
            frame.x(center),
            grouped_value(value, self.config.precision, percent)
        )
    }

    fn write_legend(f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let x = WIDTH - MARGIN_RIGHT - 170.0;
        let y = MARGIN_TOP + 10.0;
        writeln!(
            f,
            r##"  <rect x="{:.2}" y="{:.2}" width="160" height="48" fill="white" stroke="#cccccc"/>"##,
            x - 6.0,
            y - 6.0
        )?;
        for (i, (fill, label)) in [("url(#open-hatch)", OPEN_LEGEND), (CLOSED_COLOR, CLOSED_LEGEND)]
            .into_iter()
            .enumerate()
        {
            #[expect(clippy::cast_precision_loss)]
            let row_y = y + 20.0 * i as f64;
            writeln!(
                f,
                r#"  <rect x="{x:.2}" y="{row_y:.2}" width="24" height="14" fill="{fill}"/>"#
            )?;
            writeln!(
                f,
                r#"  <text x="{:.2}" y="{:.2}">{label}</text>"#,
                x + 32.0,
                row_y + 12.0
            )?;
        }
        Ok(())
    }
}

impl fmt::Display for SvgChart<'_> {
    #[expect(clippy::cast_precision_loss)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let chart = self.chart;
        let frame = self.frame();
        let offset = 5.0 * self.config.bar_width / 8.0;

        writeln!(
            f,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{HEIGHT}" viewBox="0 0 {WIDTH} {HEIGHT}" font-family="serif" font-size="{FONT_SIZE}">"#
        )?;
        writeln!(f, "  <defs>")?;
        writeln!(
            f,
            r#"    <pattern id="open-hatch" patternUnits="userSpaceOnUse" width="6" height="6">"#
        )?;
        writeln!(
            f,
            r#"      <rect width="6" height="6" fill="{OPEN_COLOR}"/>"#
        )?;
        writeln!(
            f,
            r#"      <path d="M0,0 L6,6 M-3,3 L3,9 M3,-3 L9,3" stroke="white" stroke-width="1"/>"#
        )?;
        writeln!(f, "    </pattern>")?;
        writeln!(f, "  </defs>")?;
        writeln!(
            f,
            r#"  <rect width="{WIDTH}" height="{HEIGHT}" fill="white"/>"#
        )?;

        // x axis
        writeln!(
            f,
            r#"  <line x1="{MARGIN_LEFT}" y1="{y:.2}" x2="{:.2}" y2="{y:.2}" stroke="black"/>"#,
            WIDTH - MARGIN_RIGHT,
            y = frame.y(0.0)
        )?;

        let p_value_y = frame.y(1.1 * self.peak());
        for (i, label) in chart.labels.iter().enumerate() {
            let center = i as f64;
            let percent = chart.percent[i];
            self.write_bar(
                f,
                &frame,
                center - offset,
                chart.open[i],
                percent,
                "url(#open-hatch)",
            )?;
            self.write_bar(
                f,
                &frame,
                center + offset,
                chart.closed[i],
                percent,
                CLOSED_COLOR,
            )?;

            let (text, significant) = p_value_label(chart.p_values[i]);
            let weight = if significant { "bold" } else { "normal" };
            writeln!(
                f,
                r#"  <text x="{:.2}" y="{p_value_y:.2}" text-anchor="middle" font-weight="{weight}">{text}</text>"#,
                frame.x(center)
            )?;
            writeln!(
                f,
                r#"  <text x="{:.2}" y="{:.2}" text-anchor="middle">{}</text>"#,
                frame.x(center),
                HEIGHT - MARGIN_BOTTOM + FONT_SIZE + 10.0,
                XmlEscaped(label)
            )?;
        }

        Self::write_legend(f)?;
        write!(f, "</svg>")
    }
}

struct XmlEscaped<'a>(&'a str);

impl fmt::Display for XmlEscaped<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for ch in self.0.chars() {
            match ch {
                '&' => f.write_str("&amp;")?,
                '<' => f.write_str("&lt;")?,
                '>' => f.write_str("&gt;")?,
                '"' => f.write_str("&quot;")?,
                '\'' => f.write_str("&apos;")?,
                _ => write!(f, "{ch}")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::{config::ReportConfig, dataset::Dataset, measure::Measure};

    fn chart() -> MedianChart {
        MedianChart::new(
            vec!["Population".to_owned(), "% Served <&>".to_owned()],
            vec![120.0, 45.5],
            vec![80.0, 60.25],
            vec![0.2, 0.012],
        )
        .unwrap()
    }

    #[test]
    fn test_validation() {
        assert_eq!(
            MedianChart::new(vec![], vec![], vec![], vec![]),
            Err(ChartError::Empty)
        );
        assert!(matches!(
            MedianChart::new(vec!["a".to_owned()], vec![1.0, 2.0], vec![1.0], vec![0.5]),
            Err(ChartError::MismatchedSeries { open: 2, .. })
        ));
        assert!(matches!(
            MedianChart::new(vec!["a".to_owned()], vec![f64::NAN], vec![1.0], vec![0.5]),
            Err(ChartError::NonFiniteValue { .. })
        ));

        let config = ChartConfig {
            bar_width: 0.5,
            ..ChartConfig::default()
        };
        assert_eq!(
            chart().render_svg(&config),
            Err(ChartError::InvalidBarWidth { width: 0.5 })
        );
    }

    #[test]
    fn test_p_value_label() {
        assert_eq!(p_value_label(0.012), ("p = 0.012*".to_owned(), true));
        assert_eq!(p_value_label(0.05), ("p = 0.050".to_owned(), false));
    }

    #[test]
    fn test_svg_content() {
        let svg = chart().render_svg(&ChartConfig::default()).unwrap();
        assert!(svg.starts_with("<svg "));
        assert!(svg.ends_with("</svg>"));
        assert_eq!(svg.matches(r#"fill="url(#open-hatch)""#).count(), 3);
        assert_eq!(svg.matches(r#"fill="firebrick""#).count(), 3);
        assert!(svg.contains(r#"font-weight="bold">p = 0.012*</text>"#));
        assert!(svg.contains(r#"font-weight="normal">p = 0.200</text>"#));
        assert!(svg.contains(">120.000</text>"));
        assert!(svg.contains(">60.250</text>"));
        assert!(!svg.contains("%</text>"));
        assert!(svg.contains("% Served &lt;&amp;&gt;"));
        assert!(svg.contains(OPEN_LEGEND));
        assert!(svg.contains(CLOSED_LEGEND));
    }

    #[test]
    fn test_percent_bar_labels() {
        let chart = chart().with_percent(vec![false, true]).unwrap();
        let svg = chart.render_svg(&ChartConfig::default()).unwrap();
        assert!(svg.contains(">120.000</text>"));
        assert!(svg.contains(">80.000</text>"));
        assert!(svg.contains(">45.500%</text>"));
        assert!(svg.contains(">60.250%</text>"));

        assert_eq!(
            chart.with_percent(vec![true]),
            Err(ChartError::MismatchedPercent {
                labels: 2,
                percent: 1
            })
        );
    }

    #[test]
    fn test_output_path() {
        let config = ChartConfig {
            annotation: "_2016".to_owned(),
            ..ChartConfig::default()
        };
        assert_eq!(config.file_name(), "medians_2016.svg");
        assert_eq!(config.output_path(), Path::new("figs").join("medians_2016.svg"));
    }

    #[test]
    fn test_from_comparisons() {
        let dataset = Dataset::new()
            .with_column("Closed 2012-2016", [0.0, 0.0, 0.0, 1.0, 1.0, 1.0])
            .unwrap()
            .with_column("Population", [1.0, 2.0, 3.0, 4.0, 5.0, 6.0])
            .unwrap();
        let config = ReportConfig::default();
        let comparison =
            Comparison::compute(&dataset, &Measure::count("Population"), &config).unwrap();
        let chart = MedianChart::from_comparisons(std::slice::from_ref(&comparison)).unwrap();
        assert_eq!(chart.labels(), ["Population"]);
        assert_eq!(chart.open, [2.0]);
        assert_eq!(chart.closed, [5.0]);
        assert_eq!(chart.p_values, [0.1]);
        assert_eq!(chart.percent, [false]);

        let without_test = Comparison {
            mann_whitney: None,
            ..comparison
        };
        assert!(matches!(
            MedianChart::from_comparisons(&[without_test]),
            Err(ChartError::MissingPValue { .. })
        ));
    }

    #[test]
    fn test_from_percent_proportion() {
        let dataset = Dataset::new()
            .with_column("Closed 2012-2016", [0.0, 0.0, 1.0, 1.0])
            .unwrap()
            .with_column("Served", [40.0, 51.0, 1500.0, 1500.0])
            .unwrap()
            .with_column("Population", [100.0, 100.0, 2000.0, 2000.0])
            .unwrap();
        let config = ReportConfig::default();
        let comparisons = [
            Comparison::compute(&dataset, &Measure::count("Population"), &config).unwrap(),
            Comparison::compute(&dataset, &Measure::proportion("Served", "Population"), &config)
                .unwrap(),
        ];
        let chart = MedianChart::from_comparisons(&comparisons).unwrap();
        assert_eq!(chart.percent, [false, true]);

        let svg = chart.render_svg(&ChartConfig::default()).unwrap();
        assert!(svg.contains(">2,000.000</text>"));
        assert!(svg.contains(">45.500%</text>"));
        assert!(svg.contains(">75.000%</text>"));
    }
}

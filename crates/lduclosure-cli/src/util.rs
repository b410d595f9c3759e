use std::{
    fs::{self, File},
    io::{self, BufWriter, StdoutLock, Write as _},
    path::{Path, PathBuf},
};

use anyhow::{Context, bail};
use lduclosure_analysis::{chart::ChartConfig, chart::MedianChart, dataset::Dataset};

/// Destination of report text and JSON results
#[derive(Debug)]
pub enum Output {
    Stdout {
        writer: StdoutLock<'static>,
    },
    File {
        writer: BufWriter<File>,
        path: PathBuf,
    },
}

impl Output {
    /// Write `value` as pretty JSON to a newly created file at `path`
    pub fn save_json<T>(value: &T, path: &Path) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        Output::create(path)?.write_json(value)
    }

    pub fn stdout() -> Self {
        Output::Stdout {
            writer: io::stdout().lock(),
        }
    }

    pub fn create(path: &Path) -> anyhow::Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        Ok(Output::File {
            writer: BufWriter::new(file),
            path: path.to_owned(),
        })
    }

    pub fn display_path(&self) -> String {
        match self {
            Output::Stdout { .. } => "stdout".to_string(),
            Output::File { path, .. } => path.display().to_string(),
        }
    }

    pub fn write_json<T>(&mut self, value: &T) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        serde_json::to_writer_pretty(&mut *self, value)
            .with_context(|| format!("Failed to write JSON to {}", self.display_path()))?;
        writeln!(&mut *self)
            .and_then(|()| self.flush())
            .with_context(|| format!("Failed to finish JSON output to {}", self.display_path()))
    }
}

impl io::Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Output::Stdout { writer } => writer.write(buf),
            Output::File { writer, .. } => writer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Output::Stdout { writer } => writer.flush(),
            Output::File { writer, .. } => writer.flush(),
        }
    }
}

pub fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {} file: {}", file_kind, path.display()))?;

    let reader = io::BufReader::new(file);
    let value = serde_json::from_reader(reader).with_context(|| {
        format!(
            "Failed to parse {} JSON file: {}",
            file_kind,
            path.display()
        )
    })?;

    Ok(value)
}

/// Read an LDU dataset from a JSON array of records
///
/// Each record is an object mapping column names to values.
///
/// # Errors
///
/// Returns error if the file cannot be read, is not an array of objects,
/// or holds no records
pub fn read_dataset<P>(path: P) -> anyhow::Result<Dataset>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let records: Vec<serde_json::Value> = read_json_file("dataset", path)?;
    let dataset = Dataset::from_records(records)
        .with_context(|| format!("Invalid dataset file: {}", path.display()))?;
    if dataset.is_empty() {
        bail!("Dataset file has no records: {}", path.display());
    }
    tracing::debug!(
        path = %path.display(),
        rows = dataset.len(),
        columns = dataset.column_names().count(),
        "loaded dataset"
    );
    Ok(dataset)
}

/// Render a median chart and write it under the configured output directory
///
/// # Returns
///
/// Path of the written SVG file
pub fn save_chart(chart: &MedianChart, config: &ChartConfig) -> anyhow::Result<PathBuf> {
    let svg = chart.render_svg(config).context("Failed to render chart")?;
    fs::create_dir_all(&config.output_dir).with_context(|| {
        format!(
            "Failed to create output directory: {}",
            config.output_dir.display()
        )
    })?;
    let path = config.output_path();
    fs::write(&path, svg)
        .with_context(|| format!("Failed to write chart: {}", path.display()))?;
    Ok(path)
}

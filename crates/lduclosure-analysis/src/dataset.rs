//! In-memory tabular dataset
//!
//! A [`Dataset`] is an ordered set of records with named columns, stored
//! column-wise. Cells are numeric, textual, or missing; numeric measures and
//! the closure flag are read through [`Column::numeric`].
//!
//! # Examples
//!
//! ```
//! use lduclosure_analysis::dataset::{Cell, Dataset};
//!
//! let dataset = Dataset::new()
//!     .with_column("Closed 2012-2016", [0.0, 1.0, 0.0])?
//!     .with_column("Population", [Some(120.0), None, Some(80.0)])?;
//!
//! assert_eq!(dataset.len(), 3);
//! assert_eq!(dataset.column("Population")?.get(1), Some(&Cell::Missing));
//! # Ok::<(), lduclosure_analysis::AnalysisError>(())
//! ```

use std::fmt::{self, Write as _};

use serde_json::Value;

use crate::AnalysisError;

/// A single field value.
#[derive(Debug, Clone, PartialEq, derive_more::IsVariant)]
pub enum Cell {
    Number(f64),
    Text(String),
    Missing,
}

impl Cell {
    /// Converts a JSON value into a cell.
    ///
    /// Booleans become `1`/`0`, strings holding a finite number become
    /// numbers, `null` and non-finite numbers become [`Cell::Missing`].
    #[must_use]
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => Cell::Missing,
            Value::Bool(b) => Cell::Number(if *b { 1.0 } else { 0.0 }),
            Value::Number(n) => n.as_f64().map_or(Cell::Missing, Cell::from),
            Value::String(s) => match s.trim().parse::<f64>() {
                Ok(v) => Cell::from(v),
                Err(_) if s.trim().is_empty() => Cell::Missing,
                Err(_) => Cell::Text(s.clone()),
            },
            Value::Array(_) | Value::Object(_) => Cell::Text(value.to_string()),
        }
    }

    /// Returns the numeric value of a number cell.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(v) => Some(*v),
            Cell::Text(_) | Cell::Missing => None,
        }
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        if value.is_finite() {
            Cell::Number(value)
        } else {
            Cell::Missing
        }
    }
}

impl From<Option<f64>> for Cell {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Cell::Missing, Cell::from)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_owned())
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Number(v) => fmt::Display::fmt(v, f),
            Cell::Text(s) => fmt::Display::fmt(s, f),
            Cell::Missing => f.pad("NaN"),
        }
    }
}

/// A named column of cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    cells: Vec<Cell>,
}

impl Column {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[must_use]
    pub fn get(&self, row: usize) -> Option<&Cell> {
        self.cells.get(row)
    }

    /// Reads a numeric value, treating missing cells as `None`.
    ///
    /// Text cells are an error: a measure column must be numeric.
    pub fn numeric(&self, row: usize) -> Result<Option<f64>, AnalysisError> {
        match self.cells.get(row) {
            Some(Cell::Number(v)) => Ok(Some(*v)),
            Some(Cell::Missing) | None => Ok(None),
            Some(Cell::Text(s)) => Err(AnalysisError::NonNumericValue {
                column: self.name.clone(),
                row,
                value: s.clone(),
            }),
        }
    }

    /// Sum of the present values at the given rows.
    pub fn sum_rows<I>(&self, rows: I) -> Result<f64, AnalysisError>
    where
        I: IntoIterator<Item = usize>,
    {
        let mut sum = 0.0;
        for row in rows {
            sum += self.numeric(row)?.unwrap_or(0.0);
        }
        Ok(sum)
    }
}

/// Ordered rows × named columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    columns: Vec<Column>,
    rows: usize,
}

impl Dataset {
    /// Creates an empty dataset with no columns.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a column, consuming and returning the dataset.
    pub fn with_column<N, I, C>(mut self, name: N, cells: I) -> Result<Self, AnalysisError>
    where
        N: Into<String>,
        I: IntoIterator<Item = C>,
        C: Into<Cell>,
    {
        self.push_column(name, cells)?;
        Ok(self)
    }

    /// Adds a column.
    ///
    /// The first column fixes the number of rows; every later column must
    /// have the same length.
    pub fn push_column<N, I, C>(&mut self, name: N, cells: I) -> Result<(), AnalysisError>
    where
        N: Into<String>,
        I: IntoIterator<Item = C>,
        C: Into<Cell>,
    {
        let name = name.into();
        if self.find(&name).is_some() {
            return Err(AnalysisError::DuplicateColumn { column: name });
        }
        let cells = cells.into_iter().map(Into::into).collect::<Vec<_>>();
        if self.columns.is_empty() {
            self.rows = cells.len();
        } else if cells.len() != self.rows {
            return Err(AnalysisError::ColumnLengthMismatch {
                column: name,
                expected: self.rows,
                actual: cells.len(),
            });
        }
        self.columns.push(Column { name, cells });
        Ok(())
    }

    /// Builds a dataset from JSON records (one object per row).
    ///
    /// Columns appear in the order their keys are first seen; keys absent
    /// from a record are missing values for that row.
    pub fn from_records<I>(records: I) -> Result<Self, AnalysisError>
    where
        I: IntoIterator<Item = Value>,
    {
        let mut columns: Vec<Column> = vec![];
        let mut rows = 0;
        for (row, record) in records.into_iter().enumerate() {
            let Value::Object(fields) = record else {
                return Err(AnalysisError::InvalidRecord { row });
            };
            for (key, value) in &fields {
                let idx = match columns.iter().position(|c| c.name == *key) {
                    Some(idx) => idx,
                    None => {
                        columns.push(Column {
                            name: key.clone(),
                            cells: vec![Cell::Missing; row],
                        });
                        columns.len() - 1
                    }
                };
                columns[idx].cells.push(Cell::from_json(value));
            }
            for column in &mut columns {
                if column.cells.len() == row {
                    column.cells.push(Cell::Missing);
                }
            }
            rows = row + 1;
        }
        Ok(Self { columns, rows })
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.columns.iter().map(Column::name)
    }

    /// Looks up a column by name.
    pub fn column(&self, name: &str) -> Result<&Column, AnalysisError> {
        self.find(name).ok_or_else(|| AnalysisError::MissingColumn {
            column: name.to_owned(),
        })
    }

    fn find(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Returns a view rendering the first `rows` records as a text table.
    #[must_use]
    pub fn preview(&self, rows: usize) -> DatasetPreview<'_> {
        DatasetPreview {
            dataset: self,
            rows: rows.min(self.rows),
        }
    }
}

/// Text table of the leading records of a [`Dataset`].
#[derive(Debug, Clone, Copy)]
pub struct DatasetPreview<'a> {
    dataset: &'a Dataset,
    rows: usize,
}

impl fmt::Display for DatasetPreview<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let index_width = self.rows.saturating_sub(1).to_string().len();
        let columns = self
            .dataset
            .columns
            .iter()
            .map(|column| {
                let cells = column.cells[..self.rows]
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>();
                let width = cells
                    .iter()
                    .chain([&column.name])
                    .map(|s| s.chars().count())
                    .max()
                    .unwrap_or(0);
                (column.name.as_str(), cells, width)
            })
            .collect::<Vec<_>>();

        let mut header = " ".repeat(index_width);
        for (name, _, width) in &columns {
            write!(header, "  {name:>width$}")?;
        }
        write!(f, "{}", header.trim_end())?;

        for row in 0..self.rows {
            write!(f, "\n{row:<index_width$}")?;
            for (_, cells, width) in &columns {
                write!(f, "  {:>width$}", cells[row])?;
            }
        }
        write!(
            f,
            "\n[{} rows x {} columns]",
            self.dataset.rows,
            self.dataset.columns.len()
        )
    }
}

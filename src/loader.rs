use crate::dataset::{Dataset, Record, Schema, format_value};
use crate::dates::{DateOrder, parse_date};
use calamine::{Data, ExcelDateTime, ExcelDateTimeType, Reader, open_workbook_auto};
use chrono::NaiveDate;
use log::{debug, info};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Everything that can stop the dataset from loading
///
/// All variants are fatal: the server never starts with a partial table.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("cannot read workbook: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("cannot read CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("sheet has no data rows")]
    EmptySheet,

    #[error("column '{0}' not found in header row")]
    MissingColumn(String),

    #[error("no passenger-count columns to plot")]
    NoSeriesColumns,

    #[error("row {row}: institution is empty")]
    MissingInstitution { row: usize },

    #[error("row {row}: cannot read '{value}' as a date")]
    InvalidDate { row: usize, value: String },

    #[error("row {row}, column '{column}': cannot read '{value}' as a number")]
    InvalidNumber {
        row: usize,
        column: String,
        value: String,
    },
}

/// Which columns to read, before they are checked against the file
#[derive(Clone, Debug)]
pub struct SchemaConfig {
    pub date_column: String,
    pub institution_column: String,

    /// Declared passenger-count columns. When empty, every column after the
    /// first `leading_columns` header cells is plotted.
    pub series: Vec<String>,

    pub leading_columns: usize,

    /// How ambiguous textual dates such as "03/04/2021" are read
    pub date_order: DateOrder,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            date_column: "Tarih".to_string(),
            institution_column: "Kurum".to_string(),
            series: Vec::new(),
            leading_columns: 3,
            date_order: DateOrder::MonthFirst,
        }
    }
}

/// A raw row and its 1-based spreadsheet row number
type NumberedRow = (usize, Vec<Cell>);

/// A raw cell, independent of the source format
#[derive(Clone, Debug, PartialEq)]
enum Cell {
    Empty,
    Text(String),
    Number(f64),
    /// Workbook date cell, already converted by calamine
    Date(NaiveDate),
}

static EMPTY_CELL: Cell = Cell::Empty;

impl Cell {
    fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Text(s) => write!(f, "{}", s.trim()),
            Cell::Number(n) => write!(f, "{}", format_value(*n)),
            Cell::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

impl From<&Data> for Cell {
    fn from(data: &Data) -> Self {
        match data {
            Data::Empty => Cell::Empty,
            Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
            Data::Float(f) => Cell::Number(*f),
            Data::Int(i) => Cell::Number(*i as f64),
            Data::Bool(b) => Cell::Text(b.to_string()),
            // honours the workbook's 1900/1904 epoch
            Data::DateTime(dt) => match dt.as_datetime() {
                Some(dt) => Cell::Date(dt.date()),
                None => Cell::Text(format!("{dt:?}")),
            },
            Data::Error(e) => Cell::Text(format!("{e:?}")),
        }
    }
}

/// Load the ridership table from a workbook or CSV file
///
/// The format is picked from the file extension. The first worksheet of a
/// workbook is used. The first row must be the header.
///
/// # Errors
/// * `LoadError::NotFound` if `path` does not exist
/// * any other `LoadError` when the file cannot be parsed or does not match
///   `schema`
pub fn load_dataset(path: impl AsRef<Path>, schema: &SchemaConfig) -> Result<Dataset, LoadError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase());

    let rows = match extension.as_deref() {
        Some("csv") => read_csv(path)?,
        Some("xlsx") | Some("xlsm") | Some("xlsb") | Some("xls") | Some("ods") => {
            read_workbook(path)?
        }
        Some(ext) => return Err(LoadError::UnsupportedFormat(format!(".{ext}"))),
        None => return Err(LoadError::UnsupportedFormat("no extension".to_string())),
    };

    let dataset = build_dataset(rows, schema)?;
    info!(
        "read {} records, {} institutions, {} series from {}",
        dataset.len(),
        dataset.institutions().len(),
        dataset.schema().series.len(),
        path.display()
    );
    Ok(dataset)
}

fn read_workbook(path: &Path) -> Result<Vec<NumberedRow>, LoadError> {
    let mut workbook = open_workbook_auto(path)?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(LoadError::EmptySheet)?;
    debug!("reading worksheet '{sheet_name}'");

    let range = workbook.worksheet_range(&sheet_name)?;
    // the range starts at the first non-empty row, not at row 1
    let first_row = range.start().map_or(0, |(row, _)| row as usize) + 1;
    Ok(range
        .rows()
        .enumerate()
        .map(|(i, row)| (first_row + i, row.iter().map(Cell::from).collect()))
        .collect())
}

fn read_csv(path: &Path) -> Result<Vec<NumberedRow>, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        // the csv reader skips empty lines, so count from its position
        let line = record
            .position()
            .map_or(rows.len() + 1, |pos| pos.line() as usize);
        rows.push((
            line,
            record
                .iter()
                .map(|field| {
                    if field.trim().is_empty() {
                        Cell::Empty
                    } else {
                        Cell::Text(field.to_string())
                    }
                })
                .collect(),
        ));
    }
    Ok(rows)
}

/// Column positions of a resolved schema
struct Columns {
    date: usize,
    institution: usize,
    series: Vec<usize>,
}

fn resolve_schema(header: &[String], config: &SchemaConfig) -> Result<(Schema, Columns), LoadError> {
    let find = |name: &str| {
        header
            .iter()
            .position(|h| h == name.trim())
            .ok_or_else(|| LoadError::MissingColumn(name.to_string()))
    };

    let date = find(config.date_column.as_str())?;
    let institution = find(config.institution_column.as_str())?;

    let series: Vec<usize> = if config.series.is_empty() {
        let discovered: Vec<usize> = header
            .iter()
            .enumerate()
            .skip(config.leading_columns)
            .filter(|(i, name)| *i != date && *i != institution && !name.is_empty())
            .map(|(i, _)| i)
            .collect();
        info!(
            "no series columns declared, plotting: {}",
            discovered
                .iter()
                .map(|&i| header[i].as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
        discovered
    } else {
        config
            .series
            .iter()
            .map(|name| find(name.as_str()))
            .collect::<Result<_, _>>()?
    };

    if series.is_empty() {
        return Err(LoadError::NoSeriesColumns);
    }

    let schema = Schema {
        date_column: header[date].clone(),
        institution_column: header[institution].clone(),
        series: series.iter().map(|&i| header[i].clone()).collect(),
    };
    Ok((
        schema,
        Columns {
            date,
            institution,
            series,
        },
    ))
}

fn build_dataset(rows: Vec<NumberedRow>, config: &SchemaConfig) -> Result<Dataset, LoadError> {
    let mut rows = rows.into_iter();
    let header: Vec<String> = rows
        .next()
        .ok_or(LoadError::EmptySheet)?
        .1
        .iter()
        .map(|cell| cell.to_string())
        .collect();

    let (schema, columns) = resolve_schema(&header, config)?;

    let mut records = Vec::new();
    for (row_number, row) in rows {
        if row.iter().all(Cell::is_blank) {
            continue;
        }

        let cell = |idx: usize| row.get(idx).unwrap_or(&EMPTY_CELL);

        let date = coerce_date(cell(columns.date), row_number, config.date_order)?;

        let institution = cell(columns.institution).to_string();
        if institution.is_empty() {
            return Err(LoadError::MissingInstitution { row: row_number });
        }

        let counts = columns
            .series
            .iter()
            .zip(&schema.series)
            .map(|(&idx, name)| coerce_count(cell(idx), row_number, name))
            .collect::<Result<Vec<_>, _>>()?;

        records.push(Record {
            date,
            institution,
            counts,
        });
    }

    if records.is_empty() {
        return Err(LoadError::EmptySheet);
    }

    Ok(Dataset::new(schema, records))
}

fn coerce_date(cell: &Cell, row: usize, order: DateOrder) -> Result<NaiveDate, LoadError> {
    let date = match cell {
        Cell::Date(date) => Some(*date),
        Cell::Number(serial) => serial_to_date(*serial),
        Cell::Text(text) => parse_date(text, order),
        Cell::Empty => None,
    };

    date.ok_or_else(|| LoadError::InvalidDate {
        row,
        value: cell.to_string(),
    })
}

/// A plain number in the date column, read as a 1900-epoch serial day
fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 1.0 {
        return None;
    }
    ExcelDateTime::new(serial, ExcelDateTimeType::DateTime, false)
        .as_datetime()
        .map(|dt| dt.date())
}

fn coerce_count(cell: &Cell, row: usize, column: &str) -> Result<Option<f64>, LoadError> {
    let invalid = || LoadError::InvalidNumber {
        row,
        column: column.to_string(),
        value: cell.to_string(),
    };

    match cell {
        Cell::Empty => Ok(None),
        Cell::Number(n) => Ok(Some(*n)),
        Cell::Text(text) if text.trim().is_empty() => Ok(None),
        Cell::Text(text) => match text.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => Ok(Some(n)),
            _ => Err(invalid()),
        },
        Cell::Date(_) => Err(invalid()),
    }
}

use chrono::NaiveDate;
use std::collections::HashSet;

/// Column layout of a loaded dataset
///
/// Resolved once against the header row of the input file. Every name in
/// `series` is guaranteed to exist in that file, and the order of `series`
/// is the order in which charts lay out their traces and colors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Schema {
    /// Header of the date column (e.g. "Tarih")
    pub date_column: String,

    /// Header of the institution column (e.g. "Kurum")
    pub institution_column: String,

    /// Headers of the numeric passenger-count columns, in plotting order
    pub series: Vec<String>,
}

/// One row of the source table
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    pub date: NaiveDate,
    pub institution: String,

    /// One value per `Schema::series` entry; `None` for a blank cell
    pub counts: Vec<Option<f64>>,
}

/// The full table as loaded from disk
///
/// A `Dataset` is never mutated after construction. The web layer shares a
/// single instance between all requests behind an `Arc`.
#[derive(Clone, Debug)]
pub struct Dataset {
    schema: Schema,
    records: Vec<Record>,
    institutions: Vec<String>,
}

impl Dataset {
    /// Builds a dataset from already-coerced records
    ///
    /// Each record ends up with exactly one count per series column: short
    /// rows are padded with gaps, long rows are cut.
    pub fn new(schema: Schema, mut records: Vec<Record>) -> Self {
        let width = schema.series.len();
        for record in &mut records {
            record.counts.resize(width, None);
        }

        let institutions: Vec<String> = {
            let mut seen = HashSet::new();
            records
                .iter()
                .filter(|r| seen.insert(r.institution.as_str()))
                .map(|r| r.institution.clone())
                .collect()
        };

        Self {
            schema,
            records,
            institutions,
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct institutions, ordered by first occurrence in the table
    pub fn institutions(&self) -> &[String] {
        &self.institutions
    }

    pub fn has_institution(&self, name: &str) -> bool {
        self.institutions.iter().any(|i| i == name)
    }

    /// Rows belonging to `institution`, in table order
    pub fn rows_for<'a>(&'a self, institution: &'a str) -> impl Iterator<Item = &'a Record> + 'a {
        self.records
            .iter()
            .filter(move |r| r.institution == institution)
    }
}

/// Render a cell value the way a spreadsheet shows it: whole numbers
/// without a fractional part
pub fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

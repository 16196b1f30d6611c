//! Sample tables: loading, header validation and per-row field access.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};

use crate::error::{MutationRateError, Result};

/// Required leading column names, in order.
pub const HEADER: [&str; 3] = ["name", "f", "N"];

/// A single measurement: mutant frequency `f` and population size `N`.
#[derive(Clone, Debug, PartialEq)]
pub struct Sample {
    pub name: String,
    /// Observed mutant frequency (`f`).
    pub frequency: f64,
    /// Population size (`N`).
    pub population: f64,
}

impl Sample {
    pub fn new(name: impl Into<String>, frequency: f64, population: f64) -> Self {
        Self {
            name: name.into(),
            frequency,
            population,
        }
    }
}

/// A raw data row as read from the table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record {
    line: u64,
    fields: Vec<String>,
}

impl Record {
    /// Creates a record from its 1-based line number and text fields.
    pub fn new<S: Into<String>>(line: u64, fields: impl IntoIterator<Item = S>) -> Self {
        Self {
            line,
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    fn from_csv(record: &StringRecord) -> Self {
        let line = record.position().map_or(0, |position| position.line());
        Self::new(line, record.iter())
    }

    pub fn line(&self) -> u64 {
        self.line
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Whether the row carries the three required inputs.
    pub fn is_complete(&self) -> bool {
        self.fields.len() >= HEADER.len()
    }

    /// The `name`, `f` and `N` fields as written in the input (fewer if incomplete).
    pub fn leading_fields(&self) -> &[String] {
        &self.fields[..self.fields.len().min(HEADER.len())]
    }

    /// Parses the row into a [`Sample`]. Returns `Ok(None)` for incomplete rows.
    pub fn to_sample(&self) -> Result<Option<Sample>> {
        if !self.is_complete() {
            return Ok(None);
        }
        let frequency = self.parse_number(1)?;
        let population = self.parse_number(2)?;
        Ok(Some(Sample::new(
            self.fields[0].clone(),
            frequency,
            population,
        )))
    }

    fn parse_number(&self, column: usize) -> Result<f64> {
        let raw = &self.fields[column];
        raw.trim()
            .parse::<f64>()
            .map_err(|_| MutationRateError::invalid_number(self.line, HEADER[column], raw.as_str()))
    }
}

/// The data rows of an input table whose header has been checked.
#[derive(Clone, Debug, Default)]
pub struct SampleTable {
    records: Vec<Record>,
}

impl SampleTable {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    /// Loads a table from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(MutationRateError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        Self::from_reader(File::open(path)?)
    }

    /// Reads a table, checking the header and skipping blank lines.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);
        let mut rows = reader.records();

        let header = match rows.next() {
            Some(header) => header?,
            None => return Err(MutationRateError::bad_header("")),
        };
        check_header(&header)?;

        let mut records = Vec::new();
        for row in rows {
            records.push(Record::from_csv(&row?));
        }
        Ok(Self { records })
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
}

fn check_header(header: &StringRecord) -> Result<()> {
    let matches = header.len() >= HEADER.len()
        && header.iter().zip(HEADER.iter()).all(|(found, expected)| found == *expected);
    if matches {
        Ok(())
    } else {
        Err(MutationRateError::bad_header(
            header.iter().collect::<Vec<_>>().join(","),
        ))
    }
}

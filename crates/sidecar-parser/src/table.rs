use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ParserError;
use crate::header::header_to_column;

/// Inclusive, 1-based range of data rows. The header line is not counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowRange {
    pub min: usize,
    pub max: usize,
}

impl RowRange {
    pub fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, row_number: usize) -> bool {
        row_number >= self.min && row_number <= self.max
    }
}

impl Default for RowRange {
    fn default() -> Self {
        Self { min: 1, max: 100_000 }
    }
}

impl fmt::Display for RowRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.min, self.max)
    }
}

impl FromStr for RowRange {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (min, max) = value
            .split_once(',')
            .ok_or_else(|| format!("row range '{value}' must look like 'min,max'"))?;
        let min = min
            .trim()
            .parse::<usize>()
            .map_err(|err| format!("invalid row range minimum '{min}': {err}"))?;
        let max = max
            .trim()
            .parse::<usize>()
            .map_err(|err| format!("invalid row range maximum '{max}': {err}"))?;
        Ok(Self { min, max })
    }
}

/// Header plus string cells, before any type inference. Every row has the
/// header's length.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Build a table from already split cells, rejecting ragged rows.
    pub fn new(header: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self, ParserError> {
        if let Some((index, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != header.len())
        {
            return Err(ParserError::RowLength {
                line: index as u64 + 2,
                row: row.join(","),
                actual: row.len(),
                expected: header.len(),
            });
        }
        Ok(Self { header, rows })
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn column_cells(&self, index: usize) -> Vec<&str> {
        self.rows
            .iter()
            .filter_map(|row| row.get(index))
            .map(String::as_str)
            .collect()
    }
}

pub(crate) fn reader_builder() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder.has_headers(false).flexible(true);
    builder
}

pub(crate) fn open(path: &Path) -> Result<File, ParserError> {
    File::open(path).map_err(|source| ParserError::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn normalize_header(record: &csv::StringRecord) -> Vec<String> {
    record
        .iter()
        .map(|field| header_to_column(field.trim()))
        .collect()
}

/// Read only the first row and return the normalized column names.
pub fn read_header<R: Read>(input: R) -> Result<Vec<String>, ParserError> {
    let mut reader = reader_builder().from_reader(input);
    let header = reader
        .records()
        .next()
        .ok_or(ParserError::MissingHeader)??;
    Ok(normalize_header(&header))
}

pub fn read_header_from_path(path: &Path) -> Result<Vec<String>, ParserError> {
    read_header(open(path)?)
}

/// Read the header and the data rows, keeping only rows inside `range` when
/// one is given. Reading stops as soon as the range is exhausted.
pub fn read_table<R: Read>(input: R, range: Option<RowRange>) -> Result<RawTable, ParserError> {
    let mut reader = reader_builder().from_reader(input);
    let mut records = reader.records();

    let header = records.next().ok_or(ParserError::MissingHeader)??;
    let header = normalize_header(&header);

    let mut rows = Vec::new();
    for (ordinal, record) in records.enumerate() {
        let row_number = ordinal + 1;
        if let Some(range) = range {
            if row_number > range.max {
                break;
            }
            if row_number < range.min {
                continue;
            }
        }

        let record = record?;
        if record.len() != header.len() {
            let line = record
                .position()
                .map(|position| position.line())
                .unwrap_or(row_number as u64 + 1);
            return Err(ParserError::RowLength {
                line,
                row: record.iter().collect::<Vec<_>>().join(","),
                actual: record.len(),
                expected: header.len(),
            });
        }
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(RawTable { header, rows })
}

pub fn read_table_from_path(path: &Path, range: Option<RowRange>) -> Result<RawTable, ParserError> {
    read_table(open(path)?, range)
}

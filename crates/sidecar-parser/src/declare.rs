use std::fmt;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::cast::{parse_float, parse_integer};
use crate::errors::ParserError;
use crate::header::{self, FieldKind, IMAGE};
use crate::table::{normalize_header, open, reader_builder};

/// Minimum declared width of a path-name column.
pub const PATH_NAME_LENGTH: usize = 256;
/// Extra width reserved for path rewrites before batch submission.
pub const PATH_PADDING: usize = 20;
/// Hex length of a 128-bit digest.
pub const DIGEST_LENGTH: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "width", rename_all = "snake_case")]
pub enum ColumnType {
    Integer,
    Float,
    Varchar(usize),
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Integer => f.write_str("integer"),
            ColumnType::Float => f.write_str("float"),
            ColumnType::Varchar(width) => write!(f, "varchar({width})"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDeclaration {
    pub object: String,
    pub feature: String,
    pub column_type: ColumnType,
}

impl ColumnDeclaration {
    pub fn image(feature: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            object: IMAGE.to_string(),
            feature: feature.into(),
            column_type,
        }
    }
}

struct ColumnScan {
    integer: bool,
    float: bool,
    width: usize,
}

impl ColumnScan {
    fn new() -> Self {
        Self {
            integer: true,
            float: true,
            width: 0,
        }
    }

    fn observe(&mut self, cell: &str) {
        self.width = self.width.max(cell.chars().count());
        if self.integer && parse_integer(cell).is_none() {
            self.integer = false;
        }
        if !self.integer && self.float && parse_float(cell).is_none() {
            self.float = false;
        }
    }

    fn column_type(&self, kind: FieldKind, image_columns: bool) -> ColumnType {
        match kind {
            FieldKind::PathName if image_columns => {
                ColumnType::Varchar(PATH_NAME_LENGTH.max(self.width + PATH_PADDING))
            }
            FieldKind::FileName if image_columns => ColumnType::Varchar(self.width),
            _ if self.integer => ColumnType::Integer,
            _ if self.float => ColumnType::Float,
            _ => ColumnType::Varchar(self.width),
        }
    }
}

/// Scan every row once and declare a storage type per header field.
///
/// With `image_columns` set, file-name and path-name fields are always text
/// and path names are widened so rewritten paths still fit.
pub fn declare_columns<R: Read>(
    input: R,
    image_columns: bool,
) -> Result<Vec<ColumnDeclaration>, ParserError> {
    let mut reader = reader_builder().from_reader(input);
    let mut records = reader.records();
    let header = records.next().ok_or(ParserError::MissingHeader)??;
    let header = normalize_header(&header);

    let mut scans: Vec<ColumnScan> = header.iter().map(|_| ColumnScan::new()).collect();
    for record in records {
        let record = record?;
        for (scan, cell) in scans.iter_mut().zip(record.iter()) {
            scan.observe(cell);
        }
    }

    Ok(header
        .into_iter()
        .zip(scans)
        .map(|(feature, scan)| {
            let column_type = scan.column_type(FieldKind::classify(&feature), image_columns);
            ColumnDeclaration::image(feature, column_type)
        })
        .collect())
}

pub fn declare_columns_from_path(
    path: &Path,
    image_columns: bool,
) -> Result<Vec<ColumnDeclaration>, ParserError> {
    declare_columns(open(path)?, image_columns)
}

/// Image names of the file-name fields among `declarations`, in order.
pub fn declared_image_names(declarations: &[ColumnDeclaration]) -> Vec<String> {
    declarations
        .iter()
        .filter(|declaration| header::is_file_name_feature(&declaration.feature))
        .filter_map(|declaration| header::image_name(&declaration.feature))
        .map(str::to_string)
        .collect()
}

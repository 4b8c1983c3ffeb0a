// crates/sidecar-core/src/error.rs

use std::path::PathBuf;

use sidecar_parser::ParserError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadDataError {
    #[error("No such CSV file: {}", path.display())]
    MissingFile { path: PathBuf },

    #[error(
        "The CSV file, {}, is not in the proper format. The first row must be a comma-separated header naming Metadata_, Image_FileName_, Image_PathName_ or plain data columns",
        path.display()
    )]
    InvalidFormat { path: PathBuf },

    #[error(
        "Can't find the CSV file, \"{}\". Please check that the name matches exactly, including the case",
        path.display()
    )]
    BatchFileMissing { path: PathBuf },

    #[error("CSV parsing failed: {0}")]
    Parser(#[from] ParserError),

    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(
        "The CSV file has an Image_PathName_{image} column without a corresponding Image_FileName_{image} column"
    )]
    OrphanPathName { image: String },

    #[error("No table has been loaded into slot {slot}")]
    TableNotLoaded { slot: String },

    #[error("No row matches unit key {key}")]
    UnmatchedUnit { key: String },

    #[error("Unit key field '{field}' has no Metadata_{field} column")]
    MissingColumn { field: String },

    #[error("No unit number {number} is registered")]
    UnknownUnit { number: usize },

    #[error("Unit row {index} is outside the table ({row_count} rows)")]
    RowOutOfRange { index: usize, row_count: usize },

    #[error("Image '{image}' is unavailable: {message}")]
    Image { image: String, message: String },

    #[error("Invalid settings: {0}")]
    Settings(String),
}

impl LoadDataError {
    /// Lift table-structure failures into their dedicated variants.
    pub(crate) fn from_parser(err: ParserError) -> Self {
        match err {
            ParserError::OrphanPathName { image } => LoadDataError::OrphanPathName { image },
            other => LoadDataError::Parser(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, LoadDataError>;

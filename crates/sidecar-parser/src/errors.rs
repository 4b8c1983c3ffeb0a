use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParserError {
    #[error("failed to open {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("CSV error: {source}")]
    Csv {
        #[source]
        source: csv::Error,
    },

    #[error("file did not contain a header row")]
    MissingHeader,

    #[error("error on line {line}: \"{row}\" has {actual} fields, expected {expected}")]
    RowLength {
        line: u64,
        row: String,
        actual: usize,
        expected: usize,
    },

    #[error(
        "the file has an Image_PathName_{image} column without a corresponding Image_FileName_{image} column"
    )]
    OrphanPathName { image: String },
}

impl From<csv::Error> for ParserError {
    fn from(source: csv::Error) -> Self {
        ParserError::Csv { source }
    }
}

pub mod cast;
pub mod declare;
pub mod errors;
pub mod header;
pub mod model;
pub mod table;

pub use cast::{best_cast, Column, ColumnKind, Value};
pub use declare::{
    declare_columns, declare_columns_from_path, declared_image_names, ColumnDeclaration,
    ColumnType, DIGEST_LENGTH, PATH_NAME_LENGTH, PATH_PADDING,
};
pub use errors::ParserError;
pub use header::FieldKind;
pub use model::{ColumnTable, ImageGroup, NamedColumn};
pub use table::{
    read_header, read_header_from_path, read_table, read_table_from_path, RawTable, RowRange,
};

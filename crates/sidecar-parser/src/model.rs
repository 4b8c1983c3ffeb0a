use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::cast::{best_cast, Column, Value};
use crate::errors::ParserError;
use crate::header::{self, FieldKind};
use crate::table::RawTable;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedColumn {
    pub name: String,
    pub column: Column,
}

/// File-name / path-name feature pair for one image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageGroup {
    pub image_name: String,
    pub file_name_feature: String,
    pub path_name_feature: Option<String>,
}

/// The typed table built from a sidecar file.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ColumnTable {
    columns: Vec<NamedColumn>,
    metadata_keys: Vec<String>,
    image_groups: Vec<ImageGroup>,
    row_count: usize,
}

#[derive(Default)]
struct PendingGroup {
    file_name_feature: Option<String>,
    path_name_feature: Option<String>,
}

impl ColumnTable {
    /// Type every column of `raw` and collect the metadata keys and image
    /// groups. When `wants_images` is false, file-name and path-name columns
    /// are treated as plain data.
    pub fn from_raw(raw: RawTable, wants_images: bool) -> Result<Self, ParserError> {
        let row_count = raw.rows().len();
        let mut columns = Vec::with_capacity(raw.header().len());
        let mut metadata_keys = Vec::new();
        let mut group_order: Vec<String> = Vec::new();
        let mut pending: BTreeMap<String, PendingGroup> = BTreeMap::new();

        for (index, name) in raw.header().iter().enumerate() {
            let cells = raw.column_cells(index);
            let kind = FieldKind::classify(name);
            let column = match kind {
                FieldKind::Metadata => {
                    if let Some(key) = header::metadata_key(name) {
                        metadata_keys.push(key.to_string());
                    }
                    best_cast(&cells)
                }
                FieldKind::FileName | FieldKind::PathName if wants_images => {
                    if let Some(image) = header::image_name(name) {
                        if !pending.contains_key(image) {
                            group_order.push(image.to_string());
                        }
                        let group = pending.entry(image.to_string()).or_default();
                        if kind == FieldKind::FileName {
                            group.file_name_feature = Some(name.clone());
                        } else {
                            group.path_name_feature = Some(name.clone());
                        }
                    }
                    Column::Text(cells.iter().map(|cell| cell.to_string()).collect())
                }
                _ => best_cast(&cells),
            };
            columns.push(NamedColumn {
                name: name.clone(),
                column,
            });
        }

        let mut image_groups = Vec::with_capacity(group_order.len());
        for image in group_order {
            let group = pending.remove(&image).unwrap_or_default();
            let Some(file_name_feature) = group.file_name_feature else {
                return Err(ParserError::OrphanPathName { image });
            };
            image_groups.push(ImageGroup {
                image_name: image,
                file_name_feature,
                path_name_feature: group.path_name_feature,
            });
        }

        Ok(Self {
            columns,
            metadata_keys,
            image_groups,
            row_count,
        })
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn columns(&self) -> &[NamedColumn] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns
            .iter()
            .find(|named| named.name == name)
            .map(|named| &named.column)
    }

    pub fn value(&self, name: &str, row: usize) -> Option<Value> {
        self.column(name).and_then(|column| column.get(row))
    }

    pub fn metadata_keys(&self) -> &[String] {
        &self.metadata_keys
    }

    pub fn has_metadata(&self) -> bool {
        !self.metadata_keys.is_empty()
    }

    pub fn image_groups(&self) -> &[ImageGroup] {
        &self.image_groups
    }

    /// Metadata values of one row, keyed by the stripped metadata name.
    pub fn metadata_at(&self, row: usize) -> BTreeMap<String, Value> {
        self.metadata_keys
            .iter()
            .filter_map(|key| {
                self.value(&header::make_metadata_feature(key), row)
                    .map(|value| (key.clone(), value))
            })
            .collect()
    }

    /// Pass every path-name cell through `alter_path`. Returns how many
    /// columns were rewritten.
    pub fn rewrite_path_names<F>(&mut self, alter_path: F) -> usize
    where
        F: Fn(&str) -> String,
    {
        let mut rewritten = 0;
        for named in self
            .columns
            .iter_mut()
            .filter(|named| header::is_path_name_feature(&named.name))
        {
            if named.column.map_text(&alter_path) {
                rewritten += 1;
            }
        }
        rewritten
    }
}

//! Seams to the pipeline that hosts the module.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};
use sidecar_parser::{ColumnTable, Value};

use crate::error::Result;

/// Metadata values identifying a unit, keyed by the stripped field name.
pub type UnitKey = BTreeMap<String, Value>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum UnitIdentity {
    Ordinal(usize),
    Keyed(UnitKey),
}

/// Where the host should look for one image of one unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageProviderDescriptor {
    pub image_name: String,
    pub path: PathBuf,
    pub file_name: String,
}

impl ImageProviderDescriptor {
    pub fn full_path(&self) -> PathBuf {
        self.path.join(&self.file_name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub key: UnitKey,
    /// 1-based unit numbers.
    pub unit_numbers: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grouping {
    pub keys: Vec<String>,
    pub groups: Vec<Group>,
}

pub trait PathResolver {
    fn default_input_directory(&self) -> PathBuf;
    fn default_output_directory(&self) -> PathBuf;

    /// Resolve a user-entered folder. `.` is relative to the default input
    /// folder and `&` to the default output folder.
    fn absolute_path(&self, path: &str) -> PathBuf {
        resolve_relative(
            &self.default_input_directory(),
            &self.default_output_directory(),
            path,
        )
    }
}

pub trait UnitList {
    fn associating_by_key(&self) -> bool;
    /// Returns the index of the unit, creating it if the key is new.
    fn register_keyed(&mut self, key: UnitKey, row: usize) -> usize;
    fn register_ordinal(&mut self, index: usize) -> usize;
    fn identity(&self, unit_index: usize) -> Option<&UnitIdentity>;
    fn groupings(&self, keys: &[String]) -> Grouping;
    fn push_provider(&mut self, unit_index: usize, provider: ImageProviderDescriptor);
    fn store_table(&mut self, slot: &str, table: ColumnTable);
    fn table(&self, slot: &str) -> Option<&ColumnTable>;
    fn table_mut(&mut self, slot: &str) -> Option<&mut ColumnTable>;
}

pub trait Measurements {
    fn add_unit_result(&mut self, name: &str, value: Value);
}

pub trait ImageSource {
    /// Raw pixel buffer of an image already loaded for the current unit.
    fn pixel_data(&self, image_name: &str) -> Result<Cow<'_, [u8]>>;
}

pub trait ResultDisplay {
    fn show_table(&mut self, rows: &[(String, String)]);
}

/// Everything the per-unit run step needs from the host.
pub struct UnitContext<'a> {
    pub unit_list: &'a dyn UnitList,
    pub identity: &'a UnitIdentity,
    pub measurements: &'a mut dyn Measurements,
    pub images: &'a dyn ImageSource,
    pub display: Option<&'a mut dyn ResultDisplay>,
}

pub fn resolve_relative(input: &Path, output: &Path, path: &str) -> PathBuf {
    let joined = if let Some(rest) = path.strip_prefix('&') {
        output.join(rest.trim_start_matches(['/', '\\']))
    } else {
        input.join(path)
    };
    normalize(&joined)
}

/// Lexically remove `.` and `..` components.
pub fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push(component);
                }
            }
            other => normalized.push(other),
        }
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_folders_resolve_against_defaults() {
        let input = Path::new("/work/input");
        let output = Path::new("/work/output");
        assert_eq!(
            resolve_relative(input, output, "./CSVfiles"),
            PathBuf::from("/work/input/CSVfiles")
        );
        assert_eq!(
            resolve_relative(input, output, "&/../My_folder"),
            PathBuf::from("/work/My_folder")
        );
        assert_eq!(resolve_relative(input, output, "&"), PathBuf::from("/work/output"));
        assert_eq!(
            resolve_relative(input, output, "/abs/dir"),
            PathBuf::from("/abs/dir")
        );
    }
}

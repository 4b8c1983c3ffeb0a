//! In-memory host implementations, used by the command line front end and
//! by tests.

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use sidecar_parser::{ColumnTable, Value};

use crate::error::{LoadDataError, Result};
use crate::host::{
    Group, Grouping, ImageProviderDescriptor, ImageSource, Measurements, PathResolver,
    UnitIdentity, UnitKey, UnitList,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitRecord {
    pub identity: UnitIdentity,
    pub row: usize,
    #[serde(default)]
    pub providers: Vec<ImageProviderDescriptor>,
}

/// Hashable form of a unit key. Floats compare by bit pattern, with `-0.0`
/// folded into `0.0`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum KeyCell {
    Integer(i64),
    Float(u64),
    Text(String),
}

type KeyIndex = HashMap<Vec<(String, KeyCell)>, usize>;

fn index_key(key: &UnitKey) -> Vec<(String, KeyCell)> {
    key.iter()
        .map(|(name, value)| {
            let cell = match value {
                Value::Integer(value) => KeyCell::Integer(*value),
                Value::Float(value) if *value == 0.0 => KeyCell::Float(0.0f64.to_bits()),
                Value::Float(value) => KeyCell::Float(value.to_bits()),
                Value::Text(value) => KeyCell::Text(value.clone()),
            };
            (name.clone(), cell)
        })
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "SavedUnitList")]
pub struct InMemoryUnitList {
    associate_by_key: bool,
    units: Vec<UnitRecord>,
    tables: BTreeMap<String, ColumnTable>,
    #[serde(skip)]
    key_index: KeyIndex,
}

/// Serialized shape of [`InMemoryUnitList`]; the key index is rebuilt on load.
#[derive(Deserialize)]
struct SavedUnitList {
    associate_by_key: bool,
    units: Vec<UnitRecord>,
    tables: BTreeMap<String, ColumnTable>,
}

impl From<SavedUnitList> for InMemoryUnitList {
    fn from(saved: SavedUnitList) -> Self {
        let key_index = saved
            .units
            .iter()
            .enumerate()
            .filter_map(|(position, unit)| match &unit.identity {
                UnitIdentity::Keyed(key) => Some((index_key(key), position)),
                UnitIdentity::Ordinal(_) => None,
            })
            .collect();
        Self {
            associate_by_key: saved.associate_by_key,
            units: saved.units,
            tables: saved.tables,
            key_index,
        }
    }
}

impl InMemoryUnitList {
    pub fn new(associate_by_key: bool) -> Self {
        Self {
            associate_by_key,
            ..Self::default()
        }
    }

    pub fn units(&self) -> &[UnitRecord] {
        &self.units
    }

    pub fn unit(&self, index: usize) -> Option<&UnitRecord> {
        self.units.get(index)
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// 1-based numbers of every registered unit.
    pub fn unit_numbers(&self) -> Vec<usize> {
        (1..=self.units.len()).collect()
    }

    pub fn clear_providers(&mut self) {
        for unit in &mut self.units {
            unit.providers.clear();
        }
    }
}

impl UnitList for InMemoryUnitList {
    fn associating_by_key(&self) -> bool {
        self.associate_by_key
    }

    fn register_keyed(&mut self, key: UnitKey, row: usize) -> usize {
        let indexed = index_key(&key);
        if let Some(&position) = self.key_index.get(&indexed) {
            return position;
        }
        let position = self.units.len();
        self.key_index.insert(indexed, position);
        self.units.push(UnitRecord {
            identity: UnitIdentity::Keyed(key),
            row,
            providers: Vec::new(),
        });
        position
    }

    fn register_ordinal(&mut self, index: usize) -> usize {
        while self.units.len() <= index {
            let next = self.units.len();
            self.units.push(UnitRecord {
                identity: UnitIdentity::Ordinal(next),
                row: next,
                providers: Vec::new(),
            });
        }
        index
    }

    fn identity(&self, unit_index: usize) -> Option<&UnitIdentity> {
        self.units.get(unit_index).map(|unit| &unit.identity)
    }

    fn groupings(&self, keys: &[String]) -> Grouping {
        let mut groups: Vec<Group> = Vec::new();
        for (index, unit) in self.units.iter().enumerate() {
            let UnitIdentity::Keyed(unit_key) = &unit.identity else {
                continue;
            };
            let key: UnitKey = keys
                .iter()
                .filter_map(|name| unit_key.get(name).map(|value| (name.clone(), value.clone())))
                .collect();
            match groups.iter_mut().find(|group| group.key == key) {
                Some(group) => group.unit_numbers.push(index + 1),
                None => groups.push(Group {
                    key,
                    unit_numbers: vec![index + 1],
                }),
            }
        }
        Grouping {
            keys: keys.to_vec(),
            groups,
        }
    }

    fn push_provider(&mut self, unit_index: usize, provider: ImageProviderDescriptor) {
        if let Some(unit) = self.units.get_mut(unit_index) {
            unit.providers.push(provider);
        }
    }

    fn store_table(&mut self, slot: &str, table: ColumnTable) {
        self.tables.insert(slot.to_string(), table);
    }

    fn table(&self, slot: &str) -> Option<&ColumnTable> {
        self.tables.get(slot)
    }

    fn table_mut(&mut self, slot: &str) -> Option<&mut ColumnTable> {
        self.tables.get_mut(slot)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InMemoryMeasurements {
    results: Vec<(String, Value)>,
}

impl InMemoryMeasurements {
    pub fn results(&self) -> &[(String, Value)] {
        &self.results
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.results
            .iter()
            .find(|(feature, _)| feature == name)
            .map(|(_, value)| value)
    }
}

impl Measurements for InMemoryMeasurements {
    fn add_unit_result(&mut self, name: &str, value: Value) {
        self.results.push((name.to_string(), value));
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticPathResolver {
    input: PathBuf,
    output: PathBuf,
}

impl StaticPathResolver {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
        }
    }
}

impl PathResolver for StaticPathResolver {
    fn default_input_directory(&self) -> PathBuf {
        self.input.clone()
    }

    fn default_output_directory(&self) -> PathBuf {
        self.output.clone()
    }
}

/// Pixel buffers keyed by image name.
#[derive(Debug, Clone, Default)]
pub struct InMemoryImages {
    pixels: HashMap<String, Vec<u8>>,
}

impl InMemoryImages {
    pub fn insert(&mut self, image_name: impl Into<String>, pixels: Vec<u8>) {
        self.pixels.insert(image_name.into(), pixels);
    }
}

impl ImageSource for InMemoryImages {
    fn pixel_data(&self, image_name: &str) -> Result<Cow<'_, [u8]>> {
        self.pixels
            .get(image_name)
            .map(|pixels| Cow::Borrowed(pixels.as_slice()))
            .ok_or_else(|| LoadDataError::Image {
                image: image_name.to_string(),
                message: "no pixel data loaded".to_string(),
            })
    }
}

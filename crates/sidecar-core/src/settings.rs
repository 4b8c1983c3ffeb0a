use std::fmt;

use serde::{Deserialize, Serialize};
use sidecar_parser::RowRange;

use crate::error::{LoadDataError, Result};

/// Current revision of the settings tuple.
pub const SETTINGS_VERSION: u32 = 3;

pub const YES: &str = "Yes";
pub const NO: &str = "No";

/// Number of values in the current settings tuple.
pub(crate) const SETTING_COUNT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectoryChoice {
    DefaultInput,
    DefaultOutput,
    None,
    Other,
}

impl DirectoryChoice {
    pub const ALL: [DirectoryChoice; 4] = [
        DirectoryChoice::DefaultInput,
        DirectoryChoice::DefaultOutput,
        DirectoryChoice::None,
        DirectoryChoice::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DirectoryChoice::DefaultInput => "Default Input Folder",
            DirectoryChoice::DefaultOutput => "Default Output Folder",
            DirectoryChoice::None => "None",
            DirectoryChoice::Other => "Elsewhere...",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|choice| choice.label() == label)
    }
}

impl fmt::Display for DirectoryChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Identifies one user-facing setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Setting {
    CsvDirectory,
    CsvCustomDirectory,
    CsvFileName,
    WantsImages,
    ImageDirectory,
    ImageCustomDirectory,
    WantsRows,
    RowRange,
    WantsImageGroupings,
    MetadataFields,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadDataSettings {
    pub csv_directory: DirectoryChoice,
    pub csv_custom_directory: String,
    pub csv_file_name: String,
    pub wants_images: bool,
    pub image_directory: DirectoryChoice,
    pub image_custom_directory: String,
    pub wants_rows: bool,
    pub row_range: RowRange,
    pub wants_image_groupings: bool,
    pub metadata_fields: Vec<String>,
}

impl Default for LoadDataSettings {
    fn default() -> Self {
        Self {
            csv_directory: DirectoryChoice::DefaultInput,
            csv_custom_directory: ".".to_string(),
            csv_file_name: "None".to_string(),
            wants_images: true,
            image_directory: DirectoryChoice::DefaultInput,
            image_custom_directory: ".".to_string(),
            wants_rows: false,
            row_range: RowRange::default(),
            wants_image_groupings: false,
            metadata_fields: Vec::new(),
        }
    }
}

impl LoadDataSettings {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|err| LoadDataError::Settings(err.to_string()))
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|err| LoadDataError::Settings(err.to_string()))
    }

    /// The row range to apply while loading, if range restriction is on.
    pub fn active_row_range(&self) -> Option<RowRange> {
        self.wants_rows.then_some(self.row_range)
    }

    /// Settings in the ordered tuple shape the host persists.
    pub fn to_setting_values(&self) -> Vec<String> {
        vec![
            self.csv_directory.label().to_string(),
            self.csv_custom_directory.clone(),
            self.csv_file_name.clone(),
            yes_no(self.wants_images),
            self.image_directory.label().to_string(),
            self.image_custom_directory.clone(),
            yes_no(self.wants_rows),
            self.row_range.to_string(),
            yes_no(self.wants_image_groupings),
            self.metadata_fields.join(","),
        ]
    }

    /// Parse a current-revision settings tuple.
    pub fn from_setting_values(values: &[String]) -> Result<Self> {
        if values.len() != SETTING_COUNT {
            return Err(LoadDataError::Settings(format!(
                "expected {SETTING_COUNT} setting values, found {}",
                values.len()
            )));
        }

        Ok(Self {
            csv_directory: parse_directory(&values[0])?,
            csv_custom_directory: values[1].clone(),
            csv_file_name: values[2].clone(),
            wants_images: parse_binary(&values[3])?,
            image_directory: parse_directory(&values[4])?,
            image_custom_directory: values[5].clone(),
            wants_rows: parse_binary(&values[6])?,
            row_range: values[7].parse().map_err(LoadDataError::Settings)?,
            wants_image_groupings: parse_binary(&values[8])?,
            metadata_fields: values[9]
                .split(',')
                .map(str::trim)
                .filter(|field| !field.is_empty())
                .map(str::to_string)
                .collect(),
        })
    }

    /// Upgrade a tuple saved at any known revision, then parse it.
    pub fn from_versioned_values(
        values: Vec<String>,
        version: u32,
        from_legacy: bool,
    ) -> Result<Self> {
        let upgraded = crate::migration::upgrade_settings(values, version, from_legacy)?;
        Self::from_setting_values(&upgraded)
    }
}

fn yes_no(value: bool) -> String {
    let label = if value { YES } else { NO };
    label.to_string()
}

fn parse_binary(value: &str) -> Result<bool> {
    match value {
        YES => Ok(true),
        NO => Ok(false),
        other => Err(LoadDataError::Settings(format!(
            "expected '{YES}' or '{NO}', found '{other}'"
        ))),
    }
}

fn parse_directory(value: &str) -> Result<DirectoryChoice> {
    DirectoryChoice::from_label(value)
        .ok_or_else(|| LoadDataError::Settings(format!("unknown directory choice '{value}'")))
}

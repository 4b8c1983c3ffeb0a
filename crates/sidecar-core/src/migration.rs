//! Upgrades for settings tuples saved by earlier revisions.
//!
//! Each step is a pure function from one tuple shape to the next. The legacy
//! shim only runs for tuples exported by the legacy system at its revision 2.

use tracing::warn;

use crate::error::{LoadDataError, Result};
use crate::settings::{DirectoryChoice, NO, SETTINGS_VERSION, SETTING_COUNT};

const V1_SETTING_COUNT: usize = 8;
const LEGACY_REVISION: u32 = 2;

/// Bring `values` saved at `version` up to [`SETTINGS_VERSION`].
pub fn upgrade_settings(
    mut values: Vec<String>,
    mut version: u32,
    from_legacy: bool,
) -> Result<Vec<String>> {
    if from_legacy {
        if version != LEGACY_REVISION {
            return Err(LoadDataError::Settings(format!(
                "unsupported legacy settings revision {version}"
            )));
        }
        values = upgrade_legacy(&values)?;
        version = 1;
    }

    if version == 1 {
        values = upgrade_v1(values)?;
        version = 2;
    }

    if version == 2 {
        values = upgrade_v2(values)?;
        version = 3;
    }

    if version != SETTINGS_VERSION {
        return Err(LoadDataError::Settings(format!(
            "unsupported settings revision {version}"
        )));
    }
    expect_len(&values, SETTING_COUNT, SETTINGS_VERSION)?;
    Ok(values)
}

/// Legacy tuple `[file name, field name, path, ...]` to the revision 1 shape.
pub fn upgrade_legacy(values: &[String]) -> Result<Vec<String>> {
    if values.len() < 3 {
        return Err(LoadDataError::Settings(format!(
            "legacy settings need at least 3 values, found {}",
            values.len()
        )));
    }
    warn!("the format and purpose of this module changed substantially since the legacy revision");

    let text_file_name = values[0].clone();
    let path_name = values[2].clone();
    let path_choice = match path_name.as_str() {
        "." => DirectoryChoice::DefaultInput,
        "&" => DirectoryChoice::DefaultOutput,
        _ => DirectoryChoice::Other,
    };

    Ok(vec![
        path_choice.label().to_string(),
        path_name,
        text_file_name,
        NO.to_string(),
        DirectoryChoice::DefaultInput.label().to_string(),
        ".".to_string(),
        NO.to_string(),
        "1,100000".to_string(),
    ])
}

/// Revision 1 to 2: grouping settings were added.
pub fn upgrade_v1(mut values: Vec<String>) -> Result<Vec<String>> {
    expect_len(&values, V1_SETTING_COUNT, 1)?;
    values.push(NO.to_string());
    values.push(String::new());
    Ok(values)
}

/// Revision 2 to 3: directory labels were renamed.
pub fn upgrade_v2(mut values: Vec<String>) -> Result<Vec<String>> {
    expect_len(&values, SETTING_COUNT, 2)?;
    for index in [0, 4] {
        values[index] = normalize_directory_label(&values[index]);
    }
    Ok(values)
}

fn normalize_directory_label(label: &str) -> String {
    if label.starts_with("Default Image") {
        DirectoryChoice::DefaultInput.label().to_string()
    } else if label.starts_with("Default Output") {
        DirectoryChoice::DefaultOutput.label().to_string()
    } else {
        label.to_string()
    }
}

fn expect_len(values: &[String], expected: usize, version: u32) -> Result<()> {
    if values.len() == expected {
        Ok(())
    } else {
        Err(LoadDataError::Settings(format!(
            "revision {version} settings need {expected} values, found {}",
            values.len()
        )))
    }
}

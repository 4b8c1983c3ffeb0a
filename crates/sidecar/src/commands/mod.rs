pub mod batch;
pub mod inspect;
pub mod run;
pub mod upgrade;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use sidecar_core::LoadDataSettings;

/// Module number the command line front end runs the loader under.
pub const MODULE_NUM: usize = 1;

pub fn load_settings(path: &Path) -> Result<LoadDataSettings> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read settings file {}", path.display()))?;
    LoadDataSettings::from_toml_str(&content)
        .with_context(|| format!("invalid settings file {}", path.display()))
}

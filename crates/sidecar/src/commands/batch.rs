use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::{Deserialize, Serialize};
use sidecar_core::host::PathResolver;
use sidecar_core::memory::InMemoryUnitList;
use sidecar_core::{LoadData, LoadDataSettings, RunMode, SETTINGS_VERSION};
use tracing::info;

use super::{load_settings, MODULE_NUM};

#[derive(Args, Debug)]
pub struct BatchArgs {
    /// TOML settings file
    #[arg(long)]
    pub settings: PathBuf,
    /// Where to write the run state
    #[arg(long)]
    pub out: PathBuf,
    /// Local path prefix to replace
    #[arg(long, requires = "to")]
    pub from: Option<String>,
    /// Remote path prefix to substitute
    #[arg(long, requires = "from")]
    pub to: Option<String>,
    /// Register units by row position even when metadata columns exist
    #[arg(long)]
    pub ordinal: bool,
}

/// Everything a remote host needs to resume the run.
#[derive(Debug, Serialize, Deserialize)]
pub struct BatchState {
    pub version: u32,
    pub module_num: usize,
    pub settings: Vec<String>,
    pub units: InMemoryUnitList,
}

impl BatchState {
    pub fn into_parts(self) -> Result<(LoadData, InMemoryUnitList)> {
        let settings = LoadDataSettings::from_versioned_values(self.settings, self.version, false)
            .context("state file carries unusable settings")?;
        Ok((LoadData::new(self.module_num, settings), self.units))
    }
}

pub fn handle(args: BatchArgs, resolver: &dyn PathResolver) -> Result<()> {
    let settings = load_settings(&args.settings)?;
    let mut module = LoadData::new(MODULE_NUM, settings);
    let mut units = InMemoryUnitList::new(!args.ordinal);

    module.validate(resolver)?;
    module.prepare_run(resolver, &mut units, RunMode::Fresh)?;

    let from = args.from.unwrap_or_default();
    let to = args.to.unwrap_or_default();
    module.prepare_to_create_batch(resolver, &mut units, |path| {
        substitute_prefix(path, &from, &to)
    })?;

    let state = BatchState {
        version: SETTINGS_VERSION,
        module_num: module.module_num(),
        settings: module.settings().to_setting_values(),
        units,
    };
    let json = serde_json::to_string_pretty(&state)?;
    fs::write(&args.out, json)
        .with_context(|| format!("failed to write state file {}", args.out.display()))?;

    info!(path = %args.out.display(), units = state.units.len(), "wrote batch state");
    Ok(())
}

/// Replace a leading `from` with `to`. Paths outside `from` pass unchanged.
fn substitute_prefix(path: &str, from: &str, to: &str) -> String {
    if from.is_empty() {
        return path.to_string();
    }
    match path.strip_prefix(from) {
        Some(rest) => format!("{to}{rest}"),
        None => path.to_string(),
    }
}

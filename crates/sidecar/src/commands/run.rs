use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use sidecar_core::host::{PathResolver, UnitContext};
use sidecar_core::memory::{InMemoryMeasurements, InMemoryUnitList};
use sidecar_core::{LoadData, RunMode};
use tracing::info;

use super::batch::BatchState;
use super::{load_settings, MODULE_NUM};
use crate::display::{FileImageSource, TableDisplay};

#[derive(Args, Debug)]
pub struct RunArgs {
    /// TOML settings file
    #[arg(long, required_unless_present = "resume")]
    pub settings: Option<PathBuf>,
    /// Resume from a state file written by `batch`
    #[arg(long, conflicts_with = "settings")]
    pub resume: Option<PathBuf>,
    /// Register units by row position even when metadata columns exist
    #[arg(long)]
    pub ordinal: bool,
}

pub fn handle(args: RunArgs, resolver: &dyn PathResolver) -> Result<()> {
    let (mut module, mut units, mode) = match (&args.resume, &args.settings) {
        (Some(state_path), _) => {
            let content = fs::read_to_string(state_path)
                .with_context(|| format!("failed to read state file {}", state_path.display()))?;
            let state: BatchState = serde_json::from_str(&content)
                .with_context(|| format!("invalid state file {}", state_path.display()))?;
            let (module, mut units) = state.into_parts()?;
            units.clear_providers();
            (module, units, RunMode::Resume)
        }
        (None, Some(settings_path)) => {
            let settings = load_settings(settings_path)?;
            let mut module = LoadData::new(MODULE_NUM, settings);
            module.validate(resolver)?;
            (module, InMemoryUnitList::new(!args.ordinal), RunMode::Fresh)
        }
        (None, None) => anyhow::bail!("either --settings or --resume is required"),
    };

    module.prepare_run(resolver, &mut units, mode)?;
    let numbers = units.unit_numbers();
    module.prepare_group(resolver, &mut units, &numbers)?;

    for (index, unit) in units.units().iter().enumerate() {
        let images = FileImageSource::new(&unit.providers);
        let mut measurements = InMemoryMeasurements::default();
        let mut display = TableDisplay::new();
        module
            .run(UnitContext {
                unit_list: &units,
                identity: &unit.identity,
                measurements: &mut measurements,
                images: &images,
                display: Some(&mut display),
            })
            .with_context(|| format!("unit {} failed", index + 1))?;
        println!("Unit {}", index + 1);
        println!("{display}");
    }

    info!(units = units.len(), "run finished");
    Ok(())
}

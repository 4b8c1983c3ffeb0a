use anyhow::{Context, Result};
use clap::Args;
use sidecar_core::LoadDataSettings;

#[derive(Args, Debug)]
pub struct UpgradeArgs {
    /// Revision the values were saved at
    #[arg(long)]
    pub version: u32,
    /// The values come from the legacy system
    #[arg(long)]
    pub legacy: bool,
    /// Saved setting values, in order
    #[arg(required = true, num_args = 1..)]
    pub values: Vec<String>,
}

pub fn handle(args: UpgradeArgs) -> Result<()> {
    let settings = upgrade(args)?;
    print!("{}", settings.to_toml_string()?);
    Ok(())
}

fn upgrade(args: UpgradeArgs) -> Result<LoadDataSettings> {
    LoadDataSettings::from_versioned_values(args.values, args.version, args.legacy)
        .with_context(|| format!("failed to upgrade settings from revision {}", args.version))
}

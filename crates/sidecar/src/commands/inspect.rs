use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use comfy_table::{presets::UTF8_FULL, Table};
use sidecar_core::memory::StaticPathResolver;
use sidecar_core::{LoadData, LoadDataSettings};
use sidecar_parser::header::category;
use tracing::warn;

use super::MODULE_NUM;

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Glob matching the CSV files to inspect, e.g. "plates/**/*.csv"
    pub pattern: String,
    /// Treat file and path name columns as ordinary data
    #[arg(long)]
    pub no_images: bool,
}

pub fn handle(args: InspectArgs) -> Result<()> {
    let mut inspected = 0;
    let mut skipped = 0;

    for entry in glob::glob(&args.pattern).context("invalid glob pattern")? {
        let path = match entry {
            Ok(path) => path,
            Err(err) => {
                warn!(error = %err, "could not read path from glob pattern");
                skipped += 1;
                continue;
            }
        };
        if !path.is_file() {
            continue;
        }

        match describe(&path, !args.no_images) {
            Ok(table) => {
                println!("{}", path.display());
                println!("{table}");
                inspected += 1;
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "skipping file");
                skipped += 1;
            }
        }
    }

    println!("Inspected {inspected} file(s), skipped {skipped}.");
    Ok(())
}

fn describe(path: &Path, wants_images: bool) -> Result<Table> {
    let folder = path.parent().unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .context("path has no file name")?
        .to_string_lossy()
        .into_owned();
    let resolver = StaticPathResolver::new(folder, folder);
    let settings = LoadDataSettings {
        csv_file_name: file_name,
        wants_images,
        ..LoadDataSettings::default()
    };
    let mut module = LoadData::new(MODULE_NUM, settings);
    module.validate(&resolver)?;

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Object", "Category", "Feature", "Type"]);
    for declaration in module.measurement_columns(&resolver) {
        table.add_row(vec![
            declaration.object.clone(),
            category(&declaration.feature).to_string(),
            declaration.feature.clone(),
            declaration.column_type.to_string(),
        ]);
    }
    Ok(table)
}

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use sidecar_core::memory::StaticPathResolver;
use tracing_subscriber::EnvFilter;

mod commands;
mod display;

use commands::batch::BatchArgs;
use commands::inspect::InspectArgs;
use commands::run::RunArgs;
use commands::upgrade::UpgradeArgs;

#[derive(Parser, Debug)]
#[command(author, version, about = "Load per-image measurements from CSV tables", long_about = None)]
struct Cli {
    #[command(flatten)]
    folders: FolderArgs,
    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug, Default)]
struct FolderArgs {
    /// Default input folder (falls back to SIDECAR_INPUT_DIR, then the working directory)
    #[arg(long, global = true)]
    input_dir: Option<PathBuf>,
    /// Default output folder (falls back to SIDECAR_OUTPUT_DIR, then the input folder)
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the measurement columns every matching CSV would declare
    Inspect(InspectArgs),
    /// Load a CSV and publish every unit
    Run(RunArgs),
    /// Load a CSV and save the run state for another host
    Batch(BatchArgs),
    /// Upgrade a saved settings tuple and print it as TOML
    Upgrade(UpgradeArgs),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Command::Inspect(args) => commands::inspect::handle(args),
        Command::Run(args) => commands::run::handle(args, &resolver(&cli.folders)?),
        Command::Batch(args) => commands::batch::handle(args, &resolver(&cli.folders)?),
        Command::Upgrade(args) => commands::upgrade::handle(args),
    }
}

fn resolver(folders: &FolderArgs) -> Result<StaticPathResolver> {
    let input = match folders.input_dir.clone() {
        Some(dir) => dir,
        None => match env::var("SIDECAR_INPUT_DIR") {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => env::current_dir().context("failed to read the working directory")?,
        },
    };
    let output = folders
        .output_dir
        .clone()
        .or_else(|| env::var("SIDECAR_OUTPUT_DIR").ok().map(PathBuf::from))
        .unwrap_or_else(|| input.clone());
    Ok(StaticPathResolver::new(input, output))
}

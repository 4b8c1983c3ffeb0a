#![allow(dead_code)]

use std::path::PathBuf;

use sidecar_core::memory::StaticPathResolver;
use sidecar_core::{DirectoryChoice, LoadDataSettings};

pub fn fixture_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data")
}

/// Default input folder is the fixture folder; output is a sibling.
pub fn resolver() -> StaticPathResolver {
    StaticPathResolver::new(fixture_dir(), fixture_dir().join("out"))
}

pub fn settings_for(file_name: &str) -> LoadDataSettings {
    LoadDataSettings {
        csv_directory: DirectoryChoice::DefaultInput,
        csv_file_name: file_name.to_string(),
        ..LoadDataSettings::default()
    }
}

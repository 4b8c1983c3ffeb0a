mod common;

use sidecar_core::host::{UnitIdentity, UnitList};
use sidecar_core::memory::{InMemoryUnitList, StaticPathResolver};
use sidecar_core::{DirectoryChoice, LoadData, LoadDataError, RunMode};
use sidecar_parser::Value;

use common::{fixture_dir, resolver, settings_for};

fn to_remote(path: &str) -> String {
    format!("/cluster{}", path.replace('\\', "/"))
}

#[test]
fn batch_preparation_rewrites_paths_and_folders() {
    let resolver = resolver();
    let mut module = LoadData::new(1, settings_for("plate.csv"));
    let mut units = InMemoryUnitList::new(true);
    module
        .prepare_run(&resolver, &mut units, RunMode::Fresh)
        .expect("load failed");

    module
        .prepare_to_create_batch(&resolver, &mut units, to_remote)
        .expect("batch preparation failed");

    let table = units.table(&module.table_slot()).unwrap();
    assert_eq!(
        table.value("PathName_DAPI", 0),
        Some(Value::from("/cluster2009-07-08"))
    );
    assert_eq!(table.value("FileName_DAPI", 0), Some(Value::from("a1.tif")));

    let settings = module.settings();
    assert_eq!(settings.csv_directory, DirectoryChoice::Other);
    assert_eq!(
        settings.csv_custom_directory,
        to_remote(&fixture_dir().to_string_lossy())
    );
    assert_eq!(
        settings.image_custom_directory,
        to_remote(&fixture_dir().to_string_lossy())
    );
}

#[test]
fn relative_custom_folder_is_made_absolute_first() {
    let resolver = resolver();
    let mut settings = settings_for("plate.csv");
    settings.csv_directory = DirectoryChoice::Other;
    settings.csv_custom_directory = "./".to_string();
    settings.image_custom_directory = "&/../images".to_string();
    let mut module = LoadData::new(1, settings);
    let mut units = InMemoryUnitList::new(false);
    module
        .prepare_run(&resolver, &mut units, RunMode::Fresh)
        .expect("load failed");

    module
        .prepare_to_create_batch(&resolver, &mut units, |path| path.to_string())
        .expect("batch preparation failed");

    let settings = module.settings();
    assert_eq!(
        settings.csv_custom_directory,
        fixture_dir().to_string_lossy()
    );
    assert_eq!(
        settings.image_custom_directory,
        fixture_dir().join("images").to_string_lossy()
    );
}

#[test]
fn batch_preparation_needs_a_loaded_table() {
    let mut module = LoadData::new(2, settings_for("plate.csv"));
    let mut units = InMemoryUnitList::new(false);
    let err = module
        .prepare_to_create_batch(&resolver(), &mut units, |path| path.to_string())
        .unwrap_err();
    assert!(matches!(err, LoadDataError::TableNotLoaded { .. }));
}

#[test]
fn saved_state_survives_serialization() {
    let resolver = resolver();
    let mut module = LoadData::new(1, settings_for("plate.csv"));
    let mut units = InMemoryUnitList::new(true);
    module
        .prepare_run(&resolver, &mut units, RunMode::Fresh)
        .expect("load failed");

    let json = serde_json::to_string(&units).unwrap();
    let mut restored: InMemoryUnitList = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, units);

    module
        .prepare_run(&resolver, &mut restored, RunMode::Resume)
        .expect("resume failed");
    assert_eq!(restored.len(), 3);

    let existing = restored.unit(1).unwrap().identity.clone();
    let UnitIdentity::Keyed(key) = existing else {
        panic!("expected a keyed unit");
    };
    assert_eq!(restored.register_keyed(key, 99), 1);
    assert_eq!(restored.len(), 3);
}

#[test]
fn non_finite_cells_survive_the_state_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("intensity.csv"),
        "Metadata_Level,Intensity\n1.5,1.5\n-0.0,NaN\n0.0,inf\n",
    )
    .unwrap();
    let resolver = StaticPathResolver::new(dir.path(), dir.path());
    let mut module = LoadData::new(1, settings_for("intensity.csv"));
    let mut units = InMemoryUnitList::new(true);
    module
        .prepare_run(&resolver, &mut units, RunMode::Fresh)
        .expect("load failed");
    assert_eq!(units.len(), 2, "-0.0 and 0.0 are the same key");

    let json = serde_json::to_string(&units).unwrap();
    let restored: InMemoryUnitList = serde_json::from_str(&json).expect("state must reload");
    assert_eq!(restored, units);

    let table = restored.table(&module.table_slot()).unwrap();
    assert_eq!(table.value("Intensity", 1), Some(Value::from("NaN")));
    assert_eq!(table.value("Metadata_Level", 0), Some(Value::Float(1.5)));
}

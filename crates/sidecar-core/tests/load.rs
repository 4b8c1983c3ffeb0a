mod common;

use std::collections::BTreeMap;

use sidecar_core::host::{UnitIdentity, UnitList};
use sidecar_core::memory::InMemoryUnitList;
use sidecar_core::{LoadData, LoadDataError, RunMode};
use sidecar_parser::{Column, ParserError, RowRange, Value};

use common::{resolver, settings_for};

#[test]
fn key_mode_registers_units_by_metadata() {
    let resolver = resolver();
    let mut module = LoadData::new(1, settings_for("two_plates.csv"));
    let mut units = InMemoryUnitList::new(true);

    module
        .prepare_run(&resolver, &mut units, RunMode::Fresh)
        .expect("load failed");

    let identities: Vec<UnitIdentity> = units.units().iter().map(|u| u.identity.clone()).collect();
    let key = |plate: &str| {
        UnitIdentity::Keyed(BTreeMap::from([("Plate".to_string(), Value::from(plate))]))
    };
    assert_eq!(identities, vec![key("P1"), key("P2")]);

    let table = units.table(&module.table_slot()).expect("table not stored");
    assert_eq!(table.column("Value"), Some(&Column::Float(vec![1.5, 2.5])));
}

#[test]
fn ordinal_mode_ignores_metadata() {
    let resolver = resolver();
    let mut module = LoadData::new(1, settings_for("two_plates.csv"));
    let mut units = InMemoryUnitList::new(false);

    module
        .prepare_run(&resolver, &mut units, RunMode::Fresh)
        .expect("load failed");

    let identities: Vec<UnitIdentity> = units.units().iter().map(|u| u.identity.clone()).collect();
    assert_eq!(
        identities,
        vec![UnitIdentity::Ordinal(0), UnitIdentity::Ordinal(1)]
    );
}

#[test]
fn short_row_stops_the_load() {
    let resolver = resolver();
    let mut module = LoadData::new(1, settings_for("ragged.csv"));
    let mut units = InMemoryUnitList::new(true);

    let err = module
        .prepare_run(&resolver, &mut units, RunMode::Fresh)
        .unwrap_err();
    match err {
        LoadDataError::Parser(ParserError::RowLength {
            line,
            actual,
            expected,
            ..
        }) => {
            assert_eq!(line, 3);
            assert_eq!(actual, 3);
            assert_eq!(expected, 4);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(units.is_empty(), "no units may be registered after a failed load");
    assert!(units.table(&module.table_slot()).is_none());
}

#[test]
fn path_name_without_file_name_is_fatal() {
    let resolver = resolver();
    let mut module = LoadData::new(1, settings_for("orphan_path.csv"));
    let mut units = InMemoryUnitList::new(true);

    let err = module
        .prepare_run(&resolver, &mut units, RunMode::Fresh)
        .unwrap_err();
    match err {
        LoadDataError::OrphanPathName { image } => assert_eq!(image, "DAPI"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn orphan_path_name_is_plain_data_without_image_loading() {
    let resolver = resolver();
    let mut settings = settings_for("orphan_path.csv");
    settings.wants_images = false;
    let mut module = LoadData::new(1, settings);
    let mut units = InMemoryUnitList::new(true);

    module
        .prepare_run(&resolver, &mut units, RunMode::Fresh)
        .expect("load failed");
    assert_eq!(units.len(), 1);
}

#[test]
fn row_range_loads_only_selected_rows() {
    let resolver = resolver();
    let mut settings = settings_for("five_rows.csv");
    settings.wants_rows = true;
    settings.row_range = RowRange::new(2, 3);
    let mut module = LoadData::new(1, settings);
    let mut units = InMemoryUnitList::new(false);

    module
        .prepare_run(&resolver, &mut units, RunMode::Fresh)
        .expect("load failed");

    let table = units.table(&module.table_slot()).expect("table not stored");
    assert_eq!(table.row_count(), 2);
    assert_eq!(table.column("Metadata_Site"), Some(&Column::Integer(vec![2, 3])));
    assert_eq!(
        table.column("Label"),
        Some(&Column::Text(vec!["second".to_string(), "third".to_string()]))
    );
    assert_eq!(units.len(), 2);
}

#[test]
fn missing_file_names_the_expected_path() {
    let resolver = resolver();
    let mut module = LoadData::new(1, settings_for("absent.csv"));
    let mut units = InMemoryUnitList::new(true);

    let err = module
        .prepare_run(&resolver, &mut units, RunMode::Fresh)
        .unwrap_err();
    match &err {
        LoadDataError::MissingFile { path } => assert!(path.ends_with("absent.csv")),
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("absent.csv"));

    let err = module.validate(&resolver).unwrap_err();
    assert!(matches!(err, LoadDataError::MissingFile { .. }));
}

#[test]
fn resume_reuses_stored_table_without_parsing() {
    let resolver = resolver();
    let mut module = LoadData::new(1, settings_for("plate.csv"));
    let mut units = InMemoryUnitList::new(true);
    module
        .prepare_run(&resolver, &mut units, RunMode::Fresh)
        .expect("load failed");
    let before = units.clone();

    module
        .prepare_run(&resolver, &mut units, RunMode::Resume)
        .expect("resume failed");
    assert_eq!(units, before);
}

#[test]
fn resume_requires_the_file_to_exist() {
    let resolver = resolver();
    let mut module = LoadData::new(1, settings_for("Plate.CSV.missing"));
    let mut units = InMemoryUnitList::new(true);

    let err = module
        .prepare_run(&resolver, &mut units, RunMode::Resume)
        .unwrap_err();
    assert!(matches!(err, LoadDataError::BatchFileMissing { .. }));
    assert!(err.to_string().contains("including the case"));
}

#[test]
fn validate_accepts_a_well_formed_file() {
    let resolver = resolver();
    let mut module = LoadData::new(1, settings_for("plate.csv"));
    module.validate(&resolver).expect("validation failed");
}

#[test]
fn validate_reports_unreadable_header_generically() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("bad.csv"), [0xff, 0xfe, b',', 0xfd, b'\n']).unwrap();
    let resolver = sidecar_core::memory::StaticPathResolver::new(dir.path(), dir.path());
    let mut module = LoadData::new(1, settings_for("bad.csv"));

    let err = module.validate(&resolver).unwrap_err();
    match &err {
        LoadDataError::InvalidFormat { path } => assert!(path.ends_with("bad.csv")),
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("not in the proper format"));
}

#[test]
fn duplicate_keys_collapse_into_one_unit() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("dupes.csv"),
        "Metadata_Plate,Count\nP1,1\nP1,2\nP2,3\n",
    )
    .unwrap();
    let resolver = sidecar_core::memory::StaticPathResolver::new(dir.path(), dir.path());
    let mut module = LoadData::new(1, settings_for("dupes.csv"));
    let mut units = InMemoryUnitList::new(true);

    module
        .prepare_run(&resolver, &mut units, RunMode::Fresh)
        .expect("load failed");
    assert_eq!(units.len(), 2);
    assert_eq!(units.unit(1).map(|u| u.row), Some(2));
}

use sidecar_core::migration::{upgrade_legacy, upgrade_settings, upgrade_v1, upgrade_v2};
use sidecar_core::{DirectoryChoice, LoadDataSettings, SETTINGS_VERSION};
use sidecar_parser::RowRange;

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

fn v1_values() -> Vec<String> {
    strings(&[
        "Default Image Folder",
        ".",
        "plate.csv",
        "Yes",
        "Default Output Folder",
        "./images",
        "Yes",
        "2,40",
    ])
}

#[test]
fn current_revision_passes_through() {
    let values = LoadDataSettings::default().to_setting_values();
    assert_eq!(
        upgrade_settings(values.clone(), SETTINGS_VERSION, false).unwrap(),
        values
    );
}

#[test]
fn revision_one_gains_grouping_and_new_labels() {
    let upgraded = upgrade_settings(v1_values(), 1, false).unwrap();
    assert_eq!(upgraded.len(), 10);
    assert_eq!(upgraded[0], "Default Input Folder");
    assert_eq!(upgraded[4], "Default Output Folder");
    assert_eq!(upgraded[8], "No");
    assert_eq!(upgraded[9], "");

    let settings = LoadDataSettings::from_setting_values(&upgraded).unwrap();
    assert_eq!(settings.csv_directory, DirectoryChoice::DefaultInput);
    assert_eq!(settings.image_directory, DirectoryChoice::DefaultOutput);
    assert!(settings.wants_rows);
    assert_eq!(settings.row_range, RowRange::new(2, 40));
    assert!(!settings.wants_image_groupings);
    assert!(settings.metadata_fields.is_empty());
}

#[test]
fn each_step_is_pure() {
    let v2 = upgrade_v1(v1_values()).unwrap();
    assert_eq!(v2.len(), 10);
    assert_eq!(v2[0], "Default Image Folder");

    let v3 = upgrade_v2(v2.clone()).unwrap();
    assert_eq!(v3[0], "Default Input Folder");
    assert_eq!(upgrade_v2(v2).unwrap(), v3);
}

#[test]
fn legacy_tuple_maps_folder_shorthands() {
    let cases = [
        (".", DirectoryChoice::DefaultInput),
        ("&", DirectoryChoice::DefaultOutput),
        ("/data/csv", DirectoryChoice::Other),
    ];
    for (path, expected) in cases {
        let legacy = strings(&["plate.csv", "Metadata", path]);
        let v1 = upgrade_legacy(&legacy).unwrap();
        assert_eq!(v1.len(), 8);

        let settings = LoadDataSettings::from_versioned_values(legacy, 2, true).unwrap();
        assert_eq!(settings.csv_directory, expected);
        assert_eq!(settings.csv_custom_directory, path);
        assert_eq!(settings.csv_file_name, "plate.csv");
        assert!(!settings.wants_images);
        assert!(!settings.wants_rows);
        assert_eq!(settings.row_range, RowRange::default());
    }
}

#[test]
fn unknown_shapes_are_rejected() {
    assert!(upgrade_settings(v1_values(), 7, false).is_err());
    assert!(upgrade_settings(v1_values(), 1, true).is_err());
    assert!(upgrade_settings(strings(&["plate.csv"]), 2, true).is_err());
    assert!(upgrade_settings(strings(&["a", "b"]), 1, false).is_err());
}

//! Header field naming rules.
//!
//! Files name image columns `Image_FileName_<image>` and `Image_PathName_<image>`.
//! Internally the `Image_` prefix is dropped so the published features read
//! `FileName_<image>` / `PathName_<image>`.

pub const IMAGE: &str = "Image";
pub const FILE_NAME: &str = "FileName";
pub const PATH_NAME: &str = "PathName";
pub const METADATA: &str = "Metadata";
pub const DIGEST: &str = "Digest";

const IMAGE_PREFIX: &str = "Image_";
const FILE_NAME_PREFIX: &str = "FileName_";
const PATH_NAME_PREFIX: &str = "PathName_";
const METADATA_PREFIX: &str = "Metadata_";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Metadata,
    FileName,
    PathName,
    Data,
}

impl FieldKind {
    pub fn classify(feature: &str) -> Self {
        if feature.starts_with(METADATA_PREFIX) {
            FieldKind::Metadata
        } else if is_file_name_feature(feature) {
            FieldKind::FileName
        } else if is_path_name_feature(feature) {
            FieldKind::PathName
        } else {
            FieldKind::Data
        }
    }
}

/// Convert a raw header cell to its column name.
pub fn header_to_column(field: &str) -> String {
    match field.strip_prefix(IMAGE_PREFIX) {
        Some(rest) if rest.starts_with(FILE_NAME_PREFIX) || rest.starts_with(PATH_NAME_PREFIX) => {
            rest.to_string()
        }
        _ => field.to_string(),
    }
}

pub fn is_file_name_feature(feature: &str) -> bool {
    feature.starts_with(FILE_NAME_PREFIX)
}

pub fn is_path_name_feature(feature: &str) -> bool {
    feature.starts_with(PATH_NAME_PREFIX)
}

/// The image name carried by a file-name or path-name feature.
pub fn image_name(feature: &str) -> Option<&str> {
    feature
        .strip_prefix(PATH_NAME_PREFIX)
        .or_else(|| feature.strip_prefix(FILE_NAME_PREFIX))
}

pub fn make_file_name_feature(image: &str) -> String {
    format!("{FILE_NAME_PREFIX}{image}")
}

pub fn make_path_name_feature(image: &str) -> String {
    format!("{PATH_NAME_PREFIX}{image}")
}

pub fn make_digest_feature(image: &str) -> String {
    format!("{DIGEST}_{image}")
}

pub fn metadata_key(feature: &str) -> Option<&str> {
    feature.strip_prefix(METADATA_PREFIX)
}

pub fn make_metadata_feature(key: &str) -> String {
    format!("{METADATA_PREFIX}{key}")
}

/// First underscore-delimited segment of a feature name.
pub fn category(feature: &str) -> &str {
    feature.split('_').next().unwrap_or(feature)
}

/// Everything after the first underscore, or an empty string.
pub fn measurement_suffix(feature: &str) -> &str {
    feature.split_once('_').map(|(_, rest)| rest).unwrap_or("")
}

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::PathBuf;

use comfy_table::{presets::UTF8_FULL, Table};
use sidecar_core::host::{ImageProviderDescriptor, ImageSource, ResultDisplay};
use sidecar_core::{LoadDataError, Result};

/// Collects each unit's published values into a printable table.
pub struct TableDisplay {
    table: Table,
}

impl TableDisplay {
    pub fn new() -> Self {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL).set_header(vec!["Feature", "Value"]);
        Self { table }
    }
}

impl Default for TableDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultDisplay for TableDisplay {
    fn show_table(&mut self, rows: &[(String, String)]) {
        for (name, value) in rows {
            self.table.add_row(vec![name.as_str(), value.as_str()]);
        }
    }
}

impl fmt::Display for TableDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.table)
    }
}

/// Serves the raw bytes of the files a unit's providers point at.
pub struct FileImageSource {
    files: HashMap<String, PathBuf>,
}

impl FileImageSource {
    pub fn new(providers: &[ImageProviderDescriptor]) -> Self {
        let files = providers
            .iter()
            .map(|provider| (provider.image_name.clone(), provider.full_path()))
            .collect();
        Self { files }
    }
}

impl ImageSource for FileImageSource {
    fn pixel_data(&self, image_name: &str) -> Result<Cow<'_, [u8]>> {
        let path = self.files.get(image_name).ok_or_else(|| LoadDataError::Image {
            image: image_name.to_string(),
            message: "no provider was prepared for this unit".to_string(),
        })?;
        let bytes = fs::read(path).map_err(|err| LoadDataError::Image {
            image: image_name.to_string(),
            message: format!("{}: {err}", path.display()),
        })?;
        Ok(Cow::Owned(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_provider_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a1.tif"), [7, 8, 9]).unwrap();
        let source = FileImageSource::new(&[ImageProviderDescriptor {
            image_name: "DAPI".to_string(),
            path: dir.path().to_path_buf(),
            file_name: "a1.tif".to_string(),
        }]);

        assert_eq!(source.pixel_data("DAPI").unwrap().as_ref(), &[7, 8, 9]);
        assert!(matches!(
            source.pixel_data("GFP"),
            Err(LoadDataError::Image { .. })
        ));
    }

    #[test]
    fn missing_file_is_an_image_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileImageSource::new(&[ImageProviderDescriptor {
            image_name: "DAPI".to_string(),
            path: dir.path().to_path_buf(),
            file_name: "absent.tif".to_string(),
        }]);
        match source.pixel_data("DAPI") {
            Err(LoadDataError::Image { image, message }) => {
                assert_eq!(image, "DAPI");
                assert!(message.contains("absent.tif"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn display_lists_rows() {
        let mut display = TableDisplay::new();
        display.show_table(&[("Count".to_string(), "30".to_string())]);
        let rendered = display.to_string();
        assert!(rendered.contains("Count"));
        assert!(rendered.contains("30"));
    }
}

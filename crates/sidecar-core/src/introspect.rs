//! Best-effort queries the host uses to browse a file without loading it.
//!
//! Failures are logged and yield empty results: a bad file must not break
//! settings browsing. The authoritative load in [`LoadData::prepare_run`]
//! reports the same problems as errors.

use sidecar_parser::declare::declared_image_names;
use sidecar_parser::header::{
    self, category, image_name, is_file_name_feature, make_digest_feature, measurement_suffix,
    IMAGE,
};
use sidecar_parser::{declare_columns_from_path, ColumnDeclaration, ColumnType, DIGEST_LENGTH};
use tracing::debug;

use crate::host::{Grouping, PathResolver, UnitList};
use crate::loader::LoadData;

impl LoadData {
    pub fn categories(&mut self, resolver: &dyn PathResolver, object: &str) -> Vec<String> {
        if object != IMAGE {
            return Vec::new();
        }
        self.header_or_empty(resolver)
            .iter()
            .map(|field| category(field).to_string())
            .collect()
    }

    pub fn measurements(
        &mut self,
        resolver: &dyn PathResolver,
        object: &str,
        category_name: &str,
    ) -> Vec<String> {
        if object != IMAGE {
            return Vec::new();
        }
        self.header_or_empty(resolver)
            .iter()
            .filter(|field| category(field) == category_name)
            .map(|field| measurement_suffix(field).to_string())
            .collect()
    }

    /// Names of the images this module can provide.
    pub fn image_names(&mut self, resolver: &dyn PathResolver) -> Vec<String> {
        if !self.settings.wants_images {
            return Vec::new();
        }
        self.header_or_empty(resolver)
            .iter()
            .filter(|field| is_file_name_feature(field))
            .filter_map(|field| image_name(field))
            .map(str::to_string)
            .collect()
    }

    /// Metadata keys offered for grouping.
    pub fn metadata_field_choices(&mut self, resolver: &dyn PathResolver) -> Vec<String> {
        self.header_or_empty(resolver)
            .iter()
            .filter_map(|field| header::metadata_key(field))
            .map(str::to_string)
            .collect()
    }

    /// Storage declarations for every published result.
    pub fn measurement_columns(&mut self, resolver: &dyn PathResolver) -> Vec<ColumnDeclaration> {
        let path = self.csv_path(resolver);
        let wants_images = self.settings.wants_images;
        let entry = match self.cache.entry(&path) {
            Ok(entry) => entry,
            Err(err) => {
                debug!(path = %path.display(), error = %err, "cannot stat file for declarations");
                return Vec::new();
            }
        };
        if let Some((images, declarations)) = &entry.declarations {
            if *images == wants_images {
                return declarations.clone();
            }
        }

        let declarations = match declare_columns_from_path(&path, wants_images) {
            Ok(mut declarations) => {
                if wants_images {
                    let digests: Vec<ColumnDeclaration> = declared_image_names(&declarations)
                        .iter()
                        .map(|image| {
                            ColumnDeclaration::image(
                                make_digest_feature(image),
                                ColumnType::Varchar(DIGEST_LENGTH),
                            )
                        })
                        .collect();
                    declarations.extend(digests);
                }
                declarations
            }
            Err(err) => {
                debug!(path = %path.display(), error = %err, "declaration scan failed");
                Vec::new()
            }
        };
        entry.declarations = Some((wants_images, declarations.clone()));
        declarations
    }

    /// Partition of the units by the selected metadata fields, if grouping
    /// is enabled.
    pub fn groupings(&self, unit_list: &dyn UnitList) -> Option<Grouping> {
        let settings = &self.settings;
        if !settings.wants_images
            || !settings.wants_image_groupings
            || settings.metadata_fields.is_empty()
        {
            return None;
        }
        Some(unit_list.groupings(&settings.metadata_fields))
    }

    fn header_or_empty(&mut self, resolver: &dyn PathResolver) -> Vec<String> {
        match self.header(resolver) {
            Ok(header) => header,
            Err(err) => {
                debug!(error = %err, "header unavailable");
                Vec::new()
            }
        }
    }
}

use std::path::PathBuf;

use sidecar_parser::{read_header_from_path, read_table_from_path, ColumnTable};
use tracing::{debug, info};

use crate::cache::HeaderCache;
use crate::error::{LoadDataError, Result};
use crate::host::{PathResolver, UnitList};
use crate::settings::{DirectoryChoice, LoadDataSettings, Setting};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Parse the file and build the unit list.
    Fresh,
    /// Re-enter a saved run; the stored table is reused.
    Resume,
}

/// Binds the rows of a sidecar CSV file to the host's units of work.
#[derive(Debug)]
pub struct LoadData {
    module_num: usize,
    pub(crate) settings: LoadDataSettings,
    pub(crate) cache: HeaderCache,
}

impl LoadData {
    pub const MODULE_NAME: &'static str = "LoadData";

    pub fn new(module_num: usize, settings: LoadDataSettings) -> Self {
        Self {
            module_num,
            settings,
            cache: HeaderCache::new(),
        }
    }

    pub fn module_num(&self) -> usize {
        self.module_num
    }

    pub fn settings(&self) -> &LoadDataSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut LoadDataSettings {
        &mut self.settings
    }

    /// Key under which the loaded table lives in the unit list.
    pub fn table_slot(&self) -> String {
        format!("{}_{}", Self::MODULE_NAME, self.module_num)
    }

    pub fn csv_path(&self, resolver: &dyn PathResolver) -> PathBuf {
        let directory = match self.settings.csv_directory {
            DirectoryChoice::DefaultInput => resolver.default_input_directory(),
            DirectoryChoice::DefaultOutput => resolver.default_output_directory(),
            DirectoryChoice::None | DirectoryChoice::Other => {
                resolver.absolute_path(&self.settings.csv_custom_directory)
            }
        };
        directory.join(&self.settings.csv_file_name)
    }

    /// Base folder that image path names are relative to. Empty when the
    /// file supplies absolute paths.
    pub fn image_path(&self, resolver: &dyn PathResolver) -> PathBuf {
        match self.settings.image_directory {
            DirectoryChoice::DefaultInput => resolver.default_input_directory(),
            DirectoryChoice::DefaultOutput => resolver.default_output_directory(),
            DirectoryChoice::None => PathBuf::new(),
            DirectoryChoice::Other => resolver.absolute_path(&self.settings.image_custom_directory),
        }
    }

    /// Check that the file exists and that its header parses.
    pub fn validate(&mut self, resolver: &dyn PathResolver) -> Result<()> {
        let path = self.csv_path(resolver);
        if !path.is_file() {
            return Err(LoadDataError::MissingFile { path });
        }
        self.header(resolver).map(|_| ()).map_err(|err| {
            debug!(path = %path.display(), error = %err, "header did not parse");
            LoadDataError::InvalidFormat { path }
        })
    }

    /// Header fields of the file, served from the cache when the file is
    /// unchanged.
    pub fn header(&mut self, resolver: &dyn PathResolver) -> Result<Vec<String>> {
        let path = self.csv_path(resolver);
        let entry = self.cache.entry(&path)?;
        if let Some(header) = &entry.header {
            debug!(path = %path.display(), "header cache hit");
            return Ok(header.clone());
        }
        let header = read_header_from_path(&path)?;
        entry.header = Some(header.clone());
        Ok(header)
    }

    /// Load the file once at the start of a run and register one unit per row.
    pub fn prepare_run(
        &mut self,
        resolver: &dyn PathResolver,
        unit_list: &mut dyn UnitList,
        mode: RunMode,
    ) -> Result<()> {
        let path = self.csv_path(resolver);

        if mode == RunMode::Resume {
            if path.exists() {
                debug!(path = %path.display(), "resuming with stored table");
                return Ok(());
            }
            return Err(LoadDataError::BatchFileMissing { path });
        }

        if !path.is_file() {
            return Err(LoadDataError::MissingFile { path });
        }

        let raw = read_table_from_path(&path, self.settings.active_row_range())
            .map_err(LoadDataError::from_parser)?;
        let table = ColumnTable::from_raw(raw, self.settings.wants_images)
            .map_err(LoadDataError::from_parser)?;

        let by_key = table.has_metadata() && unit_list.associating_by_key();
        for row in 0..table.row_count() {
            if by_key {
                unit_list.register_keyed(table.metadata_at(row), row);
            } else {
                unit_list.register_ordinal(row);
            }
        }

        info!(
            path = %path.display(),
            rows = table.row_count(),
            columns = table.columns().len(),
            image_groups = table.image_groups().len(),
            by_key,
            "loaded sidecar table"
        );

        unit_list.store_table(&self.table_slot(), table);
        Ok(())
    }

    /// Whether changing `setting` invalidates the unit list built by
    /// [`LoadData::prepare_run`].
    pub fn change_causes_prepare_run(&self, setting: Setting) -> bool {
        self.settings.wants_images || setting == Setting::WantsImages
    }
}

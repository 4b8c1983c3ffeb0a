use tracing::info;

use crate::error::{LoadDataError, Result};
use crate::host::{PathResolver, UnitList};
use crate::loader::LoadData;
use crate::settings::DirectoryChoice;

impl LoadData {
    /// Rewrite every stored path before the run state is shipped to another
    /// host. `alter_path` maps a local path to its remote form.
    pub fn prepare_to_create_batch<F>(
        &mut self,
        resolver: &dyn PathResolver,
        unit_list: &mut dyn UnitList,
        alter_path: F,
    ) -> Result<()>
    where
        F: Fn(&str) -> String,
    {
        let slot = self.table_slot();
        let table = unit_list
            .table_mut(&slot)
            .ok_or_else(|| LoadDataError::TableNotLoaded { slot: slot.clone() })?;
        let rewritten = table.rewrite_path_names(&alter_path);

        let csv_directory = match self.settings.csv_directory {
            DirectoryChoice::DefaultInput => resolver.default_input_directory(),
            DirectoryChoice::DefaultOutput => resolver.default_output_directory(),
            DirectoryChoice::None | DirectoryChoice::Other => {
                resolver.absolute_path(&self.settings.csv_custom_directory)
            }
        };
        self.settings.csv_directory = DirectoryChoice::Other;
        self.settings.csv_custom_directory = alter_path(&csv_directory.to_string_lossy());

        let image_directory = resolver.absolute_path(&self.settings.image_custom_directory);
        self.settings.image_custom_directory = alter_path(&image_directory.to_string_lossy());

        info!(
            slot = %slot,
            path_columns = rewritten,
            csv_directory = %self.settings.csv_custom_directory,
            "prepared sidecar table for batch submission"
        );
        Ok(())
    }
}

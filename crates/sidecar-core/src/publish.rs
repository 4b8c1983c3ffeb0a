use std::path::PathBuf;

use sidecar_parser::header::{make_digest_feature, make_metadata_feature};
use sidecar_parser::{ColumnTable, Value};
use tracing::debug;

use crate::digest::pixel_digest;
use crate::error::{LoadDataError, Result};
use crate::host::{ImageProviderDescriptor, PathResolver, UnitContext, UnitIdentity, UnitList};
use crate::loader::LoadData;
use crate::settings::DirectoryChoice;

impl LoadData {
    /// Attach an image provider per image group to each of `unit_numbers`
    /// (1-based).
    pub fn prepare_group(
        &self,
        resolver: &dyn PathResolver,
        unit_list: &mut dyn UnitList,
        unit_numbers: &[usize],
    ) -> Result<()> {
        if !self.settings.wants_images {
            return Ok(());
        }

        let slot = self.table_slot();
        let table = unit_list
            .table(&slot)
            .ok_or(LoadDataError::TableNotLoaded { slot })?;
        let base = self.image_path(resolver);
        let join_base = self.settings.image_directory != DirectoryChoice::None;

        let mut providers = Vec::new();
        for &unit_number in unit_numbers {
            let Some((unit_index, identity)) = unit_number
                .checked_sub(1)
                .and_then(|index| Some((index, unit_list.identity(index)?)))
            else {
                return Err(LoadDataError::UnknownUnit {
                    number: unit_number,
                });
            };
            // A keyed unit's row is the first one matching its key, not its position.
            let row = resolve_row(table, identity)?;

            for group in table.image_groups() {
                let path = match &group.path_name_feature {
                    Some(feature) => {
                        let cell = text_cell(table, feature, row)?;
                        if join_base {
                            base.join(cell)
                        } else {
                            PathBuf::from(cell)
                        }
                    }
                    None => base.clone(),
                };
                let file_name = text_cell(table, &group.file_name_feature, row)?;
                providers.push((
                    unit_index,
                    ImageProviderDescriptor {
                        image_name: group.image_name.clone(),
                        path,
                        file_name,
                    },
                ));
            }
        }

        debug!(units = unit_numbers.len(), providers = providers.len(), "prepared image providers");
        for (index, provider) in providers {
            unit_list.push_provider(index, provider);
        }
        Ok(())
    }

    /// Publish the current unit's row as named results.
    ///
    /// Returns the published name/value pairs in order.
    pub fn run(&self, ctx: UnitContext<'_>) -> Result<Vec<(String, Value)>> {
        let slot = self.table_slot();
        let table = ctx
            .unit_list
            .table(&slot)
            .ok_or(LoadDataError::TableNotLoaded { slot })?;
        let row = resolve_row(table, ctx.identity)?;

        let mut published = Vec::with_capacity(table.columns().len());
        for named in table.columns() {
            let value = named.column.get(row).ok_or(LoadDataError::RowOutOfRange {
                index: row,
                row_count: named.column.len(),
            })?;
            ctx.measurements.add_unit_result(&named.name, value.clone());
            published.push((named.name.clone(), value));
        }

        if self.settings.wants_images {
            for group in table.image_groups() {
                let pixels = ctx.images.pixel_data(&group.image_name)?;
                let feature = make_digest_feature(&group.image_name);
                let value = Value::Text(pixel_digest(&pixels));
                ctx.measurements.add_unit_result(&feature, value.clone());
                published.push((feature, value));
            }
        }

        if let Some(display) = ctx.display {
            let rows: Vec<(String, String)> = published
                .iter()
                .map(|(name, value)| (name.clone(), value.to_string()))
                .collect();
            display.show_table(&rows);
        }

        Ok(published)
    }
}

/// Row of `table` that belongs to the unit.
///
/// Keyed units take the first row, in file order, whose metadata matches
/// every key field.
pub fn resolve_row(table: &ColumnTable, identity: &UnitIdentity) -> Result<usize> {
    match identity {
        UnitIdentity::Ordinal(index) => {
            if *index < table.row_count() {
                Ok(*index)
            } else {
                Err(LoadDataError::RowOutOfRange {
                    index: *index,
                    row_count: table.row_count(),
                })
            }
        }
        UnitIdentity::Keyed(key) => {
            let mut criteria = Vec::with_capacity(key.len());
            for (field, expected) in key {
                let column = table
                    .column(&make_metadata_feature(field))
                    .ok_or_else(|| LoadDataError::MissingColumn {
                        field: field.clone(),
                    })?;
                criteria.push((column, expected));
            }

            (0..table.row_count())
                .find(|&row| {
                    criteria
                        .iter()
                        .all(|(column, expected)| column.value_eq(row, expected))
                })
                .ok_or_else(|| LoadDataError::UnmatchedUnit {
                    key: key
                        .iter()
                        .map(|(field, value)| format!("{field}={value}"))
                        .collect::<Vec<_>>()
                        .join(", "),
                })
        }
    }
}

fn text_cell(table: &ColumnTable, feature: &str, row: usize) -> Result<String> {
    table
        .value(feature, row)
        .map(|value| value.to_string())
        .ok_or_else(|| LoadDataError::RowOutOfRange {
            index: row,
            row_count: table.row_count(),
        })
}

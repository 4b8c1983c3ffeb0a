use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use sidecar_parser::ColumnDeclaration;
use tracing::debug;

use crate::error::Result;

/// What has been parsed from one file since its last modification.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub modified: DateTime<Utc>,
    pub header: Option<Vec<String>>,
    /// Declarations, tagged with the image-loading flag they were scanned under.
    pub declarations: Option<(bool, Vec<ColumnDeclaration>)>,
}

impl CacheEntry {
    fn new(modified: DateTime<Utc>) -> Self {
        Self {
            modified,
            header: None,
            declarations: None,
        }
    }
}

/// Header and declaration cache keyed by resolved file path.
///
/// An entry is dropped as soon as the file's modification time moves past
/// the one recorded with it.
#[derive(Debug, Default)]
pub struct HeaderCache {
    entries: HashMap<PathBuf, CacheEntry>,
}

impl HeaderCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entry for `path`, checked against the file's current modification time.
    pub fn entry(&mut self, path: &Path) -> Result<&mut CacheEntry> {
        let modified: DateTime<Utc> = fs::metadata(path)?.modified()?.into();
        Ok(self.entry_at(path, modified))
    }

    /// Entry for `path` given an already observed modification time.
    pub fn entry_at(&mut self, path: &Path, modified: DateTime<Utc>) -> &mut CacheEntry {
        let entry = self
            .entries
            .entry(path.to_path_buf())
            .or_insert_with(|| CacheEntry::new(modified));
        if modified > entry.modified {
            debug!(path = %path.display(), %modified, "cached header is stale");
            *entry = CacheEntry::new(modified);
        }
        entry
    }

    pub fn invalidate(&mut self, path: &Path) {
        self.entries.remove(path);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    #[test]
    fn newer_modification_time_resets_entry() {
        let mut cache = HeaderCache::new();
        let path = Path::new("/data/plate.csv");
        let first = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

        cache.entry_at(path, first).header = Some(vec!["Metadata_Plate".to_string()]);
        assert!(cache.entry_at(path, first).header.is_some());

        let older = first - Duration::seconds(5);
        assert!(cache.entry_at(path, older).header.is_some());

        let newer = first + Duration::seconds(5);
        let entry = cache.entry_at(path, newer);
        assert!(entry.header.is_none());
        assert_eq!(entry.modified, newer);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn entries_are_per_path() {
        let mut cache = HeaderCache::new();
        let stamp = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        cache.entry_at(Path::new("a.csv"), stamp).header = Some(Vec::new());
        assert!(cache.entry_at(Path::new("b.csv"), stamp).header.is_none());

        cache.invalidate(Path::new("a.csv"));
        assert!(cache.entry_at(Path::new("a.csv"), stamp).header.is_none());
    }
}

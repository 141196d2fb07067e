//! Table Cache Module
//! Process-local memo of generated tables and parsed CSV files.
//!
//! Entries are keyed by input identity and never evicted: a demo entry by its seed,
//! a file entry by its canonical path and modification time.

use crate::data::loader::{DataLoader, LoaderError};
use crate::data::{DemoGenerator, TrendTables};
use moka::sync::Cache;
use polars::prelude::DataFrame;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

/// Identity of one load request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SourceKey {
    Demo {
        seed: Option<u64>,
    },
    Csv {
        path: PathBuf,
        modified: Option<SystemTime>,
    },
}

/// Memoizes demo generation and CSV parsing for the lifetime of the process.
#[derive(Clone)]
pub struct TableCache {
    demo: Cache<SourceKey, Arc<TrendTables>>,
    csv: Cache<SourceKey, DataFrame>,
}

impl Default for TableCache {
    fn default() -> Self {
        Self::new()
    }
}

impl TableCache {
    pub fn new() -> Self {
        Self {
            demo: Cache::builder().build(),
            csv: Cache::builder().build(),
        }
    }

    /// Demo tables for `seed`, generated on first request.
    pub fn demo(&self, seed: Option<u64>) -> Arc<TrendTables> {
        let key = SourceKey::Demo { seed };
        self.demo.get_with(key, || {
            tracing::debug!(?seed, "generating demo tables");
            Arc::new(DemoGenerator::generate_demo_data(seed))
        })
    }

    /// Raw frame for the CSV at `path`, parsed on first request.
    ///
    /// A file modified since it was cached is parsed again under a new key.
    pub fn csv(&self, path: &Path) -> Result<DataFrame, LoaderError> {
        let key = Self::csv_key(path)?;
        if let Some(df) = self.csv.get(&key) {
            tracing::debug!(path = %path.display(), "CSV served from cache");
            return Ok(df);
        }

        let df = DataLoader::load_csv(path)?;
        self.csv.insert(key, df.clone());
        Ok(df)
    }

    fn csv_key(path: &Path) -> Result<SourceKey, LoaderError> {
        let resolved = fs::canonicalize(path).map_err(|source| LoaderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let modified = fs::metadata(&resolved).and_then(|m| m.modified()).ok();
        Ok(SourceKey::Csv {
            path: resolved,
            modified,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn demo_tables_are_memoized_per_seed() {
        let cache = TableCache::new();
        let first = cache.demo(Some(1));
        let again = cache.demo(Some(1));
        assert!(Arc::ptr_eq(&first, &again));

        let other = cache.demo(Some(2));
        assert!(!Arc::ptr_eq(&first, &other));
    }

    #[test]
    fn unseeded_demo_is_stable_within_process() {
        let cache = TableCache::new();
        assert_eq!(*cache.demo(None), *cache.demo(None));
    }

    #[test]
    fn csv_is_parsed_once() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tags.csv");
        fs::write(&path, "hashtag,count\n#A,1\n").unwrap();

        let cache = TableCache::new();
        let first = cache.csv(&path).unwrap();
        let relative_spelling = dir.path().join(".").join("tags.csv");
        let second = cache.csv(&relative_spelling).unwrap();

        assert!(first.equals(&second));
        cache.csv.run_pending_tasks();
        assert_eq!(cache.csv.entry_count(), 1);
    }

    #[test]
    fn modified_csv_is_parsed_again() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tags.csv");
        fs::write(&path, "hashtag,count\n#A,1\n").unwrap();

        let cache = TableCache::new();
        let before = cache.csv(&path).unwrap();
        assert_eq!(before.height(), 1);

        let modified = fs::metadata(&path).unwrap().modified().unwrap();
        fs::write(&path, "hashtag,count\n#A,1\n#B,2\n").unwrap();
        fs::File::options()
            .write(true)
            .open(&path)
            .unwrap()
            .set_modified(modified + std::time::Duration::from_secs(10))
            .unwrap();

        let after = cache.csv(&path).unwrap();
        assert_eq!(after.height(), 2);
        cache.csv.run_pending_tasks();
        assert_eq!(cache.csv.entry_count(), 2);
    }

    #[test]
    fn missing_csv_is_io_error() {
        let dir = TempDir::new().unwrap();
        let cache = TableCache::new();
        let err = cache.csv(&dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, LoaderError::Io { .. }));
    }
}

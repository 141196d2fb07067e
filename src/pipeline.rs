//! Dashboard Pipeline Module
//! One `compute` call turns the current inputs into everything the presentation layer draws.

use crate::config::DashboardConfig;
use crate::data::{
    CanonicalTable, DataLoader, DataProcessor, GeoPoint, HashtagCount, LoaderError,
    NormalizeOptions, ProcessorError, TableCache, TimeSeriesRow, TrendTables,
};
use crate::stats::{KpiCalculator, Kpis};
use chrono::NaiveDate;
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Load(#[from] LoaderError),
    #[error(transparent)]
    Normalize(#[from] ProcessorError),
}

/// Where the tables come from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DataSource {
    #[default]
    Demo,
    /// A CSV file; relative paths resolve against the data directory.
    Csv(PathBuf),
}

/// Everything that determines a view.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DashboardInputs {
    pub source: DataSource,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

/// Output of one pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    /// Time series narrowed to `range`.
    pub time_series: Vec<TimeSeriesRow>,
    pub hashtags: Vec<HashtagCount>,
    pub geo: Vec<GeoPoint>,
    /// Min and max date of the unfiltered series.
    pub date_bounds: Option<(NaiveDate, NaiveDate)>,
    /// Inclusive range actually applied.
    pub range: Option<(NaiveDate, NaiveDate)>,
    pub kpis: Kpis,
    /// Tables taken from the CSV instead of demo data.
    pub replaced: Vec<CanonicalTable>,
    /// CSV file the view was built from, if any.
    pub source_path: Option<PathBuf>,
}

/// Owns the memo cache and the settings every computation shares.
#[derive(Clone)]
pub struct Dashboard {
    cache: TableCache,
    data_dir: PathBuf,
    seed: Option<u64>,
    options: NormalizeOptions,
}

impl Dashboard {
    pub fn new(config: &DashboardConfig) -> Self {
        Self {
            cache: TableCache::new(),
            data_dir: config.data_dir.clone(),
            seed: config.seed,
            options: config.normalize_options(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// CSV files available in the data directory.
    pub fn candidates(&self) -> Vec<PathBuf> {
        DataLoader::discover_csv_files(&self.data_dir)
    }

    /// Resolve a CSV path against the data directory.
    ///
    /// Paths from [`Dashboard::candidates`] already carry the directory and pass through as-is.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() || path.starts_with(&self.data_dir) {
            path.to_path_buf()
        } else {
            self.data_dir.join(path)
        }
    }

    /// Build the view for `inputs`.
    pub fn compute(&self, inputs: &DashboardInputs) -> Result<DashboardView, PipelineError> {
        let defaults = self.cache.demo(self.seed);

        let (tables, replaced, source_path) = match &inputs.source {
            DataSource::Demo => (TrendTables::clone(&defaults), Vec::new(), None),
            DataSource::Csv(path) => {
                let path = self.resolve(path);
                let raw = self.cache.csv(&path)?;
                let normalized =
                    DataProcessor::normalize(&raw, TrendTables::clone(&defaults), &self.options)?;
                if normalized.replaced.is_empty() {
                    tracing::info!(
                        path = %path.display(),
                        "no recognised columns in CSV, keeping demo data"
                    );
                }
                (normalized.tables, normalized.replaced, Some(path))
            }
        };

        let date_bounds = DataProcessor::date_bounds(&tables.time_series);
        let range = date_bounds.map(|(min, max)| {
            (inputs.start.unwrap_or(min), inputs.end.unwrap_or(max))
        });
        let time_series = match range {
            Some((start, end)) => {
                DataProcessor::filter_by_date(&tables.time_series, Some(start), Some(end))
            }
            None => Vec::new(),
        };
        let kpis = KpiCalculator::compute(&time_series, &tables.hashtags);

        Ok(DashboardView {
            time_series,
            hashtags: tables.hashtags,
            geo: tables.geo,
            date_bounds,
            range,
            kpis,
            replaced,
            source_path,
        })
    }
}

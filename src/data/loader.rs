//! CSV Data Loader Module
//! Handles CSV file loading, lenient date parsing and data directory discovery using Polars.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use polars::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the column that gets parsed into calendar dates on load.
pub const DATE_COLUMN: &str = "date";

/// Text values read as missing in any column.
const NULL_MARKERS: [&str; 10] = [
    "NA", "N/A", "NULL", "null", "NaN", "nan", "-NaN", "None", "#N/A", "<NA>",
];

const DATE_FORMATS: [&str; 12] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y.%m.%d",
    "%m/%d/%Y",
    "%d.%m.%Y",
    "%d-%m-%Y",
    "%Y%m%d",
    "%b %d %Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%d %b %Y",
    "%d %B %Y",
];

const DATETIME_FORMATS: [&str; 6] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M",
];

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse CSV: {0}")]
    Parse(#[from] PolarsError),
}

/// Handles CSV file loading with Polars.
pub struct DataLoader;

impl DataLoader {
    /// Load a CSV file and parse its `date` column if present.
    pub fn load_csv(path: &Path) -> Result<DataFrame, LoaderError> {
        let metadata = fs::metadata(path).map_err(|source| LoaderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if !metadata.is_file() {
            return Err(LoaderError::Io {
                path: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a file"),
            });
        }

        let null_values = NullValues::AllColumns(NULL_MARKERS.iter().map(|&m| m.into()).collect());

        let mut df = LazyCsvReader::new(path)
            .with_has_header(true)
            .with_infer_schema_length(Some(10000))
            .with_null_values(Some(null_values))
            .finish()?
            .collect()?;

        Self::parse_date_column(&mut df)?;

        tracing::info!(
            path = %path.display(),
            rows = df.height(),
            columns = df.width(),
            "loaded CSV"
        );
        Ok(df)
    }

    /// Replace a textual `date` column with a Date column.
    ///
    /// Values that do not look like a date become null; no rows are dropped.
    pub fn parse_date_column(df: &mut DataFrame) -> PolarsResult<()> {
        let Ok(column) = df.column(DATE_COLUMN) else {
            return Ok(());
        };
        if column.dtype() == &DataType::Date {
            return Ok(());
        }

        let text = column.cast(&DataType::String)?;
        let parsed = DateChunked::from_naive_date_options(
            DATE_COLUMN.into(),
            text.str()?
                .into_iter()
                .map(|value| value.and_then(Self::parse_date_lenient)),
        );

        let unparsed = parsed.null_count().saturating_sub(text.null_count());
        if unparsed > 0 {
            tracing::debug!(unparsed, "date values could not be parsed and were set to null");
        }

        df.with_column(parsed.into_series())?;
        Ok(())
    }

    /// Parse a date from any of the common textual layouts.
    ///
    /// Date-times are truncated to their calendar date.
    pub fn parse_date_lenient(value: &str) -> Option<NaiveDate> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }

        DATE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
            .or_else(|| {
                DATETIME_FORMATS
                    .iter()
                    .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
                    .map(|dt| dt.date())
            })
            .or_else(|| {
                DateTime::parse_from_rfc3339(value)
                    .or_else(|_| DateTime::parse_from_rfc2822(value))
                    .ok()
                    .map(|dt| dt.date_naive())
            })
    }

    /// List `*.csv` files in a data directory, sorted by path.
    ///
    /// A missing or unreadable directory yields no candidates.
    pub fn discover_csv_files(data_dir: &Path) -> Vec<PathBuf> {
        let Ok(entries) = fs::read_dir(data_dir) else {
            tracing::debug!(dir = %data_dir.display(), "data directory not found");
            return Vec::new();
        };

        let mut files: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file())
            .filter(|path| path.extension().is_some_and(|ext| ext == "csv"))
            .collect();
        files.sort();
        files
    }

    /// Get list of column names from a DataFrame.
    pub fn get_columns(df: &DataFrame) -> Vec<String> {
        df.get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_csv(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn parses_common_date_layouts() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 31);
        for text in [
            "2024-01-31",
            "2024/01/31",
            "01/31/2024",
            "31.01.2024",
            "20240131",
            "Jan 31 2024",
            "January 31, 2024",
            "31 Jan 2024",
            "2024-01-31T10:15:00",
            "2024-01-31 10:15:00",
            "2024-01-31T10:15:00+02:00",
            " 2024-01-31 ",
        ] {
            assert_eq!(DataLoader::parse_date_lenient(text), expected, "{text}");
        }
    }

    #[test]
    fn rejects_non_dates() {
        assert_eq!(DataLoader::parse_date_lenient(""), None);
        assert_eq!(DataLoader::parse_date_lenient("yesterday"), None);
        assert_eq!(DataLoader::parse_date_lenient("2024-13-45"), None);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = DataLoader::load_csv(&dir.path().join("absent.csv")).unwrap_err();
        assert!(matches!(err, LoaderError::Io { .. }));
    }

    #[test]
    fn directory_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = DataLoader::load_csv(dir.path()).unwrap_err();
        assert!(matches!(err, LoaderError::Io { .. }));
    }

    #[test]
    fn empty_file_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "empty.csv", "");
        let err = DataLoader::load_csv(&path).unwrap_err();
        assert!(matches!(err, LoaderError::Parse(_)));
    }

    #[test]
    fn unparseable_dates_become_null_without_dropping_rows() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            &dir,
            "dates.csv",
            "date,posts\n2024-01-01,10\nnot a date,20\n2024-01-03,30\n",
        );

        let df = DataLoader::load_csv(&path).unwrap();
        assert_eq!(df.height(), 3);

        let dates = df.column(DATE_COLUMN).unwrap();
        assert_eq!(dates.dtype(), &DataType::Date);
        assert_eq!(dates.null_count(), 1);
    }

    #[test]
    fn null_markers_are_missing_values() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "nulls.csv", "posts,sentiment\n1,0.5\nNULL,NaN\n,0.1\n");

        let df = DataLoader::load_csv(&path).unwrap();
        assert_eq!(df.column("posts").unwrap().null_count(), 2);
        assert_eq!(df.column("sentiment").unwrap().null_count(), 1);
    }

    #[test]
    fn frame_without_date_column_is_untouched() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "tags.csv", "hashtag,count\n#A,1\n");

        let df = DataLoader::load_csv(&path).unwrap();
        assert_eq!(DataLoader::get_columns(&df), vec!["hashtag", "count"]);
    }

    #[test]
    fn discovers_only_csv_files_sorted() {
        let dir = TempDir::new().unwrap();
        write_csv(&dir, "b.csv", "x\n1\n");
        write_csv(&dir, "a.csv", "x\n1\n");
        write_csv(&dir, "notes.txt", "hello");
        fs::create_dir(dir.path().join("nested.csv")).unwrap();

        let names: Vec<String> = DataLoader::discover_csv_files(dir.path())
            .iter()
            .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().to_string()))
            .collect();
        assert_eq!(names, vec!["a.csv", "b.csv"]);
    }

    #[test]
    fn missing_data_dir_has_no_candidates() {
        let dir = TempDir::new().unwrap();
        assert!(DataLoader::discover_csv_files(&dir.path().join("data")).is_empty());
    }
}

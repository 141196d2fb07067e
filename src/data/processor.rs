//! Data Processor Module
//! Normalizes raw frames into the canonical tables and filters the time series by date.

use crate::data::loader::{DataLoader, DATE_COLUMN};
use crate::data::schema::{
    matching_tables, CanonicalTable, SchemaRule, GEO_RULE, HASHTAG_RULE, TIME_SERIES_RULE,
};
use crate::data::{GeoPoint, HashtagCount, TimeSeriesRow, TrendTables};
use chrono::NaiveDate;
use polars::prelude::*;
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// Optional validation applied to file-sourced rows.
///
/// Generated data is always in range; files are taken as-is unless enabled here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct NormalizeOptions {
    /// Clamp sentiment into [-1, 1].
    pub clamp_sentiment: bool,
    /// Drop geo rows with latitude outside [-90, 90] or longitude outside [-180, 180].
    pub validate_coordinates: bool,
}

/// Result of normalizing a raw frame over a set of defaults.
#[derive(Debug, Clone)]
pub struct Normalized {
    pub tables: TrendTables,
    /// Tables taken from the raw frame rather than the defaults.
    pub replaced: Vec<CanonicalTable>,
}

/// Handles normalization and filtering of trend tables.
pub struct DataProcessor;

impl DataProcessor {
    /// Replace each default table whose schema rule matches `raw`.
    pub fn normalize(
        raw: &DataFrame,
        defaults: TrendTables,
        options: &NormalizeOptions,
    ) -> Result<Normalized, ProcessorError> {
        let replaced = matching_tables(&DataLoader::get_columns(raw));
        let mut tables = defaults;

        for table in &replaced {
            match table {
                CanonicalTable::TimeSeries => {
                    tables.time_series = Self::extract_time_series(raw, options)?;
                }
                CanonicalTable::Hashtags => {
                    tables.hashtags = Self::extract_hashtags(raw)?;
                }
                CanonicalTable::Geo => {
                    tables.geo = Self::extract_geo(raw, options)?;
                }
            }
        }

        tracing::debug!(?replaced, "normalized raw frame");
        Ok(Normalized { tables, replaced })
    }

    /// Project the rule's columns and cast them to the row types.
    ///
    /// Casting is non-strict: a value that does not convert becomes null.
    fn project(
        raw: &DataFrame,
        rule: &SchemaRule,
        casts: &[(&str, DataType)],
    ) -> Result<DataFrame, ProcessorError> {
        let mut projected = raw.select(rule.columns.iter().copied())?;

        if projected.column(DATE_COLUMN).is_ok() {
            DataLoader::parse_date_column(&mut projected)?;
        }
        for (name, dtype) in casts {
            let cast = projected.column(name)?.cast(dtype)?;
            projected.with_column(cast)?;
        }
        Ok(projected)
    }

    fn log_dropped(table: CanonicalTable, before: usize, after: usize) {
        if after < before {
            tracing::debug!(%table, dropped = before - after, "dropped rows with missing values");
        }
    }

    fn extract_time_series(
        raw: &DataFrame,
        options: &NormalizeOptions,
    ) -> Result<Vec<TimeSeriesRow>, ProcessorError> {
        let df = Self::project(
            raw,
            &TIME_SERIES_RULE,
            &[("posts", DataType::Int64), ("sentiment", DataType::Float64)],
        )?;

        let dates = df.column(DATE_COLUMN)?.as_materialized_series().date()?;
        let posts = df.column("posts")?.i64()?;
        let sentiment = df.column("sentiment")?.f64()?;

        let rows = dates
            .as_date_iter()
            .zip(posts.into_iter())
            .zip(sentiment.into_iter())
            .filter_map(|((date, posts), sentiment)| {
                let sentiment = sentiment?;
                Some(TimeSeriesRow {
                    date: date?,
                    sentiment: if options.clamp_sentiment {
                        sentiment.clamp(-1.0, 1.0)
                    } else {
                        sentiment
                    },
                    posts: posts?,
                })
            })
            .collect::<Vec<_>>();
        Self::log_dropped(CanonicalTable::TimeSeries, df.height(), rows.len());
        Ok(rows)
    }

    fn extract_hashtags(raw: &DataFrame) -> Result<Vec<HashtagCount>, ProcessorError> {
        let mut projected = raw.select(HASHTAG_RULE.columns.iter().copied())?;
        let hashtag = projected.column("hashtag")?.cast(&DataType::String)?;
        // Fractional counts are summed before the total is truncated.
        let summable = if projected.column("count")?.dtype().is_integer() {
            DataType::Int64
        } else {
            DataType::Float64
        };
        let count = projected.column("count")?.cast(&summable)?;
        projected.with_column(hashtag)?;
        projected.with_column(count)?;

        let grouped = projected
            .lazy()
            .filter(col("hashtag").is_not_null())
            .group_by([col("hashtag")])
            .agg([col("count").sum().cast(DataType::Int64)])
            .collect()?;

        let hashtags = grouped.column("hashtag")?.str()?;
        let counts = grouped.column("count")?.i64()?;

        let mut rows: Vec<HashtagCount> = hashtags
            .into_iter()
            .zip(counts.into_iter())
            .filter_map(|(hashtag, count)| {
                Some(HashtagCount {
                    hashtag: hashtag?.to_string(),
                    count: count.unwrap_or(0),
                })
            })
            .collect();
        rows.sort_by(|a, b| a.hashtag.cmp(&b.hashtag));
        Ok(rows)
    }

    fn extract_geo(
        raw: &DataFrame,
        options: &NormalizeOptions,
    ) -> Result<Vec<GeoPoint>, ProcessorError> {
        let df = Self::project(
            raw,
            &GEO_RULE,
            &[
                ("lat", DataType::Float64),
                ("lon", DataType::Float64),
                ("region", DataType::String),
                ("engagement", DataType::Int64),
            ],
        )?;

        let lat = df.column("lat")?.f64()?;
        let lon = df.column("lon")?.f64()?;
        let region = df.column("region")?.str()?;
        let engagement = df.column("engagement")?.i64()?;

        let rows: Vec<GeoPoint> = lat
            .into_iter()
            .zip(lon.into_iter())
            .zip(region.into_iter())
            .zip(engagement.into_iter())
            .filter_map(|(((lat, lon), region), engagement)| {
                Some(GeoPoint {
                    lat: lat?,
                    lon: lon?,
                    region: region?.to_string(),
                    engagement: engagement?,
                })
            })
            .collect();
        Self::log_dropped(CanonicalTable::Geo, df.height(), rows.len());

        if !options.validate_coordinates {
            return Ok(rows);
        }

        let before = rows.len();
        let valid: Vec<GeoPoint> = rows
            .into_iter()
            .filter(|p| (-90.0..=90.0).contains(&p.lat) && (-180.0..=180.0).contains(&p.lon))
            .collect();
        if valid.len() < before {
            tracing::debug!(
                dropped = before - valid.len(),
                "dropped geo rows with out-of-range coordinates"
            );
        }
        Ok(valid)
    }

    /// Earliest and latest date in the series.
    pub fn date_bounds(series: &[TimeSeriesRow]) -> Option<(NaiveDate, NaiveDate)> {
        let min = series.iter().map(|r| r.date).min()?;
        let max = series.iter().map(|r| r.date).max()?;
        Some((min, max))
    }

    /// Keep rows with `start <= date <= end`.
    ///
    /// Missing bounds default to the series' own min/max. An inverted range yields no rows.
    pub fn filter_by_date(
        series: &[TimeSeriesRow],
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Vec<TimeSeriesRow> {
        let Some((min, max)) = Self::date_bounds(series) else {
            return Vec::new();
        };
        let start = start.unwrap_or(min);
        let end = end.unwrap_or(max);

        series
            .iter()
            .filter(|row| start <= row.date && row.date <= end)
            .cloned()
            .collect()
    }
}

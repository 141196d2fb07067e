//! Canonical Tables Module
//! Row types for the three tables every data source is normalized into.

use chrono::NaiveDate;
use serde::Serialize;

/// One day of sentiment and post volume.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeriesRow {
    pub date: NaiveDate,
    /// Expected in [-1.0, 1.0].
    pub sentiment: f64,
    pub posts: i64,
}

/// Total mentions of one hashtag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HashtagCount {
    pub hashtag: String,
    pub count: i64,
}

/// Engagement weight at a geographic point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
    pub region: String,
    pub engagement: i64,
}

/// The three canonical tables consumed by the presentation layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TrendTables {
    pub time_series: Vec<TimeSeriesRow>,
    pub hashtags: Vec<HashtagCount>,
    pub geo: Vec<GeoPoint>,
}

//! Data module - demo generation, CSV loading, normalization and caching

mod cache;
mod demo;
mod loader;
mod processor;
mod schema;
mod tables;

pub use cache::{SourceKey, TableCache};
pub use demo::{
    DemoGenerator, DEMO_DAYS, DEMO_EPOCH, DEMO_HASHTAGS, DEMO_LOCATIONS, ENGAGEMENT_RANGE,
    HASHTAG_COUNT_RANGE, POSTS_RANGE,
};
pub use loader::{DataLoader, LoaderError, DATE_COLUMN};
pub use processor::{DataProcessor, NormalizeOptions, Normalized, ProcessorError};
pub use schema::{matching_tables, CanonicalTable, SchemaRule, SCHEMA_RULES};
pub use tables::{GeoPoint, HashtagCount, TimeSeriesRow, TrendTables};

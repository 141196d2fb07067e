//! Schema Rule Module
//! Maps raw column sets onto the canonical tables they can populate.

use serde::Serialize;
use std::fmt;

/// The canonical tables a raw file can be normalized into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalTable {
    TimeSeries,
    Hashtags,
    Geo,
}

impl fmt::Display for CanonicalTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CanonicalTable::TimeSeries => "time series",
            CanonicalTable::Hashtags => "hashtags",
            CanonicalTable::Geo => "geo engagement",
        };
        f.write_str(name)
    }
}

/// A table is populated when every one of its required columns is present.
#[derive(Debug, Clone, Copy)]
pub struct SchemaRule {
    pub table: CanonicalTable,
    pub columns: &'static [&'static str],
}

impl SchemaRule {
    /// Check whether `available` contains all required columns.
    pub fn matches<S: AsRef<str>>(&self, available: &[S]) -> bool {
        self.columns
            .iter()
            .all(|required| available.iter().any(|c| c.as_ref() == *required))
    }
}

pub const TIME_SERIES_RULE: SchemaRule = SchemaRule {
    table: CanonicalTable::TimeSeries,
    columns: &["date", "posts", "sentiment"],
};

pub const HASHTAG_RULE: SchemaRule = SchemaRule {
    table: CanonicalTable::Hashtags,
    columns: &["hashtag", "count"],
};

pub const GEO_RULE: SchemaRule = SchemaRule {
    table: CanonicalTable::Geo,
    columns: &["lat", "lon", "region", "engagement"],
};

pub const SCHEMA_RULES: [SchemaRule; 3] = [TIME_SERIES_RULE, HASHTAG_RULE, GEO_RULE];

/// Tables whose rule matches the given columns, in rule order.
pub fn matching_tables<S: AsRef<str>>(available: &[S]) -> Vec<CanonicalTable> {
    SCHEMA_RULES
        .iter()
        .filter(|rule| rule.matches(available))
        .map(|rule| rule.table)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_series_rule_needs_all_three_columns() {
        assert!(TIME_SERIES_RULE.matches(&["sentiment", "date", "posts"]));
        assert!(TIME_SERIES_RULE.matches(&["date", "posts", "sentiment", "extra"]));
        assert!(!TIME_SERIES_RULE.matches(&["date", "posts"]));
    }

    #[test]
    fn hashtag_rule() {
        assert!(HASHTAG_RULE.matches(&["count", "hashtag"]));
        assert!(!HASHTAG_RULE.matches(&["hashtag", "counts"]));
    }

    #[test]
    fn geo_rule() {
        assert!(GEO_RULE.matches(&["lat", "lon", "region", "engagement"]));
        assert!(!GEO_RULE.matches(&["lat", "lon", "region"]));
    }

    #[test]
    fn column_names_are_case_sensitive() {
        assert!(!HASHTAG_RULE.matches(&["Hashtag", "Count"]));
    }

    #[test]
    fn one_file_can_match_several_tables() {
        let columns = vec![
            "date".to_string(),
            "posts".to_string(),
            "sentiment".to_string(),
            "hashtag".to_string(),
            "count".to_string(),
        ];
        assert_eq!(
            matching_tables(&columns),
            vec![CanonicalTable::TimeSeries, CanonicalTable::Hashtags]
        );
    }

    #[test]
    fn unrelated_columns_match_nothing() {
        assert!(matching_tables(&["foo", "bar"]).is_empty());
    }
}

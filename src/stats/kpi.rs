//! KPI Calculator Module
//! Headline numbers shown above the charts: total posts, mean sentiment and top hashtag.

use crate::data::{HashtagCount, TimeSeriesRow};
use serde::Serialize;
use statrs::statistics::Statistics;

/// Shown in place of a top hashtag when there are none.
pub const NO_HASHTAG: &str = "n/a";

/// Key figures over a filtered time series and the hashtag table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Kpis {
    pub total_posts: i64,
    /// NaN when the series is empty.
    pub mean_sentiment: f64,
    pub top_hashtag: String,
}

impl Kpis {
    /// Total posts with thousands separators, e.g. `12,345`.
    pub fn total_posts_display(&self) -> String {
        format_thousands(self.total_posts)
    }

    /// Mean sentiment to two decimals.
    pub fn mean_sentiment_display(&self) -> String {
        format!("{:.2}", self.mean_sentiment)
    }
}

pub struct KpiCalculator;

impl KpiCalculator {
    pub fn compute(series: &[TimeSeriesRow], hashtags: &[HashtagCount]) -> Kpis {
        Kpis {
            total_posts: Self::total_posts(series),
            mean_sentiment: Self::mean_sentiment(series),
            top_hashtag: Self::top_hashtag(hashtags)
                .map(|h| h.hashtag.clone())
                .unwrap_or_else(|| NO_HASHTAG.to_string()),
        }
    }

    /// Sum of posts, saturating at the `i64` bounds.
    pub fn total_posts(series: &[TimeSeriesRow]) -> i64 {
        series
            .iter()
            .fold(0i64, |total, r| total.saturating_add(r.posts))
    }

    pub fn mean_sentiment(series: &[TimeSeriesRow]) -> f64 {
        series.iter().map(|r| r.sentiment).mean()
    }

    /// Row with the highest count; the earliest row wins a tie.
    pub fn top_hashtag(hashtags: &[HashtagCount]) -> Option<&HashtagCount> {
        hashtags
            .iter()
            .fold(None, |best: Option<&HashtagCount>, row| match best {
                Some(b) if b.count >= row.count => Some(b),
                _ => Some(row),
            })
    }
}

fn format_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn row(day: u32, sentiment: f64, posts: i64) -> TimeSeriesRow {
        TimeSeriesRow {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            sentiment,
            posts,
        }
    }

    fn tag(label: &str, count: i64) -> HashtagCount {
        HashtagCount {
            hashtag: label.to_string(),
            count,
        }
    }

    #[test]
    fn sums_posts_and_averages_sentiment() {
        let series = vec![row(1, 0.5, 100), row(2, -0.25, 250), row(3, 0.0, 50)];
        let kpis = KpiCalculator::compute(&series, &[tag("#A", 1)]);
        assert_eq!(kpis.total_posts, 400);
        assert!((kpis.mean_sentiment - 0.25 / 3.0).abs() < 1e-12);
        assert_eq!(kpis.top_hashtag, "#A");
    }

    #[test]
    fn total_posts_saturates_instead_of_overflowing() {
        let high = vec![row(1, 0.0, i64::MAX), row(2, 0.0, 1)];
        assert_eq!(KpiCalculator::total_posts(&high), i64::MAX);

        let low = vec![row(1, 0.0, i64::MIN), row(2, 0.0, -1)];
        assert_eq!(KpiCalculator::total_posts(&low), i64::MIN);
    }

    #[test]
    fn empty_series_has_zero_posts_and_nan_mean() {
        let kpis = KpiCalculator::compute(&[], &[]);
        assert_eq!(kpis.total_posts, 0);
        assert!(kpis.mean_sentiment.is_nan());
    }

    #[test]
    fn empty_hashtags_fall_back_to_sentinel() {
        assert_eq!(KpiCalculator::top_hashtag(&[]), None);
        assert_eq!(KpiCalculator::compute(&[], &[]).top_hashtag, NO_HASHTAG);
    }

    #[test]
    fn top_hashtag_tie_goes_to_first_row() {
        let tags = vec![tag("#A", 5), tag("#B", 9), tag("#C", 9), tag("#D", 2)];
        assert_eq!(KpiCalculator::top_hashtag(&tags), Some(&tags[1]));
    }

    #[test]
    fn formats_for_display() {
        let kpis = Kpis {
            total_posts: 1234567,
            mean_sentiment: 0.456,
            top_hashtag: NO_HASHTAG.to_string(),
        };
        assert_eq!(kpis.total_posts_display(), "1,234,567");
        assert_eq!(kpis.mean_sentiment_display(), "0.46");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(-1000), "-1,000");
        assert_eq!(format_thousands(0), "0");
    }
}

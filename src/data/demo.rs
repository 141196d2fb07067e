//! Demo Data Generator Module
//! Synthesizes small trend tables so the dashboard runs without any input file.

use crate::data::{GeoPoint, HashtagCount, TimeSeriesRow, TrendTables};
use chrono::{Days, NaiveDate};
use rand::distributions::Distribution;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use statrs::distribution::Normal;

/// First day of the generated time series.
pub const DEMO_EPOCH: NaiveDate = match NaiveDate::from_ymd_opt(2024, 1, 1) {
    Some(date) => date,
    None => NaiveDate::MIN,
};

pub const DEMO_DAYS: usize = 120;

/// The sine driving sentiment sweeps 0..=SENTIMENT_PHASE_SPAN across the series.
const SENTIMENT_PHASE_SPAN: f64 = 10.0;
const SENTIMENT_NOISE_STD_DEV: f64 = 0.2;

pub const POSTS_RANGE: std::ops::Range<i64> = 50..400;
pub const HASHTAG_COUNT_RANGE: std::ops::Range<i64> = 200..2000;
pub const ENGAGEMENT_RANGE: std::ops::Range<i64> = 100..3000;

pub const DEMO_HASHTAGS: [&str; 5] = [
    "#ClimateJustice",
    "#LossAndDamage",
    "#NetZero",
    "#JustTransition",
    "#AirQuality",
];

/// (lat, lon, region)
pub const DEMO_LOCATIONS: [(f64, f64, &str); 5] = [
    (40.71, -74.00, "NA-US-NY"),
    (34.05, -118.24, "NA-US-CA"),
    (51.50, -0.12, "EU-UK-LON"),
    (28.61, 77.21, "AS-IN-DEL"),
    (-33.87, 151.21, "OC-AU-SYD"),
];

/// Generates randomized demo tables with a fixed shape.
pub struct DemoGenerator;

impl DemoGenerator {
    /// Generate the three demo tables.
    ///
    /// The same `seed` always yields the same tables; `None` draws from OS entropy.
    pub fn generate_demo_data(seed: Option<u64>) -> TrendTables {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        TrendTables {
            time_series: Self::time_series(&mut rng),
            hashtags: Self::hashtags(&mut rng),
            geo: Self::geo(&mut rng),
        }
    }

    fn time_series(rng: &mut StdRng) -> Vec<TimeSeriesRow> {
        let noise = Normal::new(0.0, SENTIMENT_NOISE_STD_DEV).ok();
        let step = SENTIMENT_PHASE_SPAN / (DEMO_DAYS - 1) as f64;

        (0..DEMO_DAYS)
            .map(|i| {
                let jitter = noise.as_ref().map_or(0.0, |n| n.sample(rng));
                TimeSeriesRow {
                    date: DEMO_EPOCH + Days::new(i as u64),
                    sentiment: ((i as f64 * step).sin() + jitter).clamp(-1.0, 1.0),
                    posts: rng.gen_range(POSTS_RANGE),
                }
            })
            .collect()
    }

    fn hashtags(rng: &mut StdRng) -> Vec<HashtagCount> {
        DEMO_HASHTAGS
            .iter()
            .map(|tag| HashtagCount {
                hashtag: tag.to_string(),
                count: rng.gen_range(HASHTAG_COUNT_RANGE),
            })
            .collect()
    }

    fn geo(rng: &mut StdRng) -> Vec<GeoPoint> {
        DEMO_LOCATIONS
            .iter()
            .map(|&(lat, lon, region)| GeoPoint {
                lat,
                lon,
                region: region.to_string(),
                engagement: rng.gen_range(ENGAGEMENT_RANGE),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_fixed_shape() {
        let tables = DemoGenerator::generate_demo_data(Some(7));
        assert_eq!(tables.time_series.len(), DEMO_DAYS);
        assert_eq!(tables.hashtags.len(), DEMO_HASHTAGS.len());
        assert_eq!(tables.geo.len(), DEMO_LOCATIONS.len());
    }

    #[test]
    fn values_stay_in_range() {
        for seed in 0..20 {
            let tables = DemoGenerator::generate_demo_data(Some(seed));
            for row in &tables.time_series {
                assert!((-1.0..=1.0).contains(&row.sentiment));
                assert!(POSTS_RANGE.contains(&row.posts));
            }
            for row in &tables.hashtags {
                assert!(HASHTAG_COUNT_RANGE.contains(&row.count));
            }
            for row in &tables.geo {
                assert!(ENGAGEMENT_RANGE.contains(&row.engagement));
            }
        }
    }

    #[test]
    fn dates_are_consecutive_from_epoch() {
        let tables = DemoGenerator::generate_demo_data(None);
        assert_eq!(tables.time_series[0].date, DEMO_EPOCH);
        for pair in tables.time_series.windows(2) {
            assert_eq!(pair[1].date - pair[0].date, chrono::Duration::days(1));
        }
        assert_eq!(
            tables.time_series.last().map(|r| r.date),
            NaiveDate::from_ymd_opt(2024, 4, 29)
        );
    }

    #[test]
    fn same_seed_same_tables() {
        let a = DemoGenerator::generate_demo_data(Some(42));
        let b = DemoGenerator::generate_demo_data(Some(42));
        assert_eq!(a, b);

        let c = DemoGenerator::generate_demo_data(Some(43));
        assert_ne!(a.time_series, c.time_series);
    }

    #[test]
    fn fixed_labels_and_coordinates() {
        let tables = DemoGenerator::generate_demo_data(Some(1));
        let tags: Vec<&str> = tables.hashtags.iter().map(|h| h.hashtag.as_str()).collect();
        assert_eq!(tags, DEMO_HASHTAGS);
        assert_eq!(tables.geo[2].region, "EU-UK-LON");
        assert_eq!(tables.geo[4].lat, -33.87);
    }
}

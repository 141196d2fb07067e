//! Chart Plotter Module
//! Creates the interactive dashboard charts using egui_plot.

use crate::data::{GeoPoint, HashtagCount, TimeSeriesRow};
use chrono::{Datelike, NaiveDate};
use egui::Color32;
use egui_plot::{Bar, BarChart, GridMark, Line, Plot, PlotPoints, Points};
use std::ops::RangeInclusive;

pub const SENTIMENT_COLOR: Color32 = Color32::from_rgb(52, 152, 219); // Blue
pub const POSTS_COLOR: Color32 = Color32::from_rgb(46, 204, 113); // Green
pub const HASHTAG_COLOR: Color32 = Color32::from_rgb(155, 89, 182); // Purple
pub const GEO_COLOR: Color32 = Color32::from_rgb(231, 76, 60); // Red

const CHART_HEIGHT: f32 = 280.0;
const HASHTAG_CHART_HEIGHT: f32 = 260.0;

/// Marker radius range for geo points, in screen points.
const GEO_MIN_RADIUS: f32 = 4.0;
const GEO_MAX_RADIUS: f32 = 24.0;

/// Creates dashboard charts using egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Dates are plotted as days since the common era.
    pub fn date_to_x(date: NaiveDate) -> f64 {
        date.num_days_from_ce() as f64
    }

    pub fn x_to_date(x: f64) -> Option<NaiveDate> {
        NaiveDate::from_num_days_from_ce_opt(x.round() as i32)
    }

    fn date_axis_label(mark: GridMark, _range: &RangeInclusive<f64>) -> String {
        Self::x_to_date(mark.value)
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default()
    }

    /// Marker radius proportional to engagement relative to the largest point.
    pub fn geo_radius(engagement: i64, max_engagement: i64) -> f32 {
        if max_engagement <= 0 {
            return GEO_MIN_RADIUS;
        }
        let share = (engagement.max(0) as f32 / max_engagement as f32).min(1.0);
        GEO_MIN_RADIUS + share * (GEO_MAX_RADIUS - GEO_MIN_RADIUS)
    }

    /// Hashtags ordered by descending count, ties kept in input order.
    pub fn hashtags_by_count(hashtags: &[HashtagCount]) -> Vec<&HashtagCount> {
        let mut sorted: Vec<&HashtagCount> = hashtags.iter().collect();
        sorted.sort_by(|a, b| b.count.cmp(&a.count));
        sorted
    }

    /// Sentiment line on a fixed [-1, 1] axis.
    pub fn draw_sentiment_chart(ui: &mut egui::Ui, series: &[TimeSeriesRow]) {
        let points: PlotPoints = series
            .iter()
            .map(|r| [Self::date_to_x(r.date), r.sentiment])
            .collect();

        Plot::new("sentiment_over_time")
            .height(CHART_HEIGHT)
            .allow_scroll(false)
            .x_axis_label("Date")
            .y_axis_label("Sentiment (−1 to +1)")
            .include_y(-1.0)
            .include_y(1.0)
            .x_axis_formatter(Self::date_axis_label)
            .label_formatter(|_name, value| {
                let date = Self::x_to_date(value.x)
                    .map(|d| d.to_string())
                    .unwrap_or_default();
                format!("{}\nsentiment: {:.2}", date, value.y)
            })
            .show(ui, |plot_ui| {
                plot_ui.line(
                    Line::new(points)
                        .color(SENTIMENT_COLOR)
                        .width(1.5)
                        .name("Sentiment"),
                );
            });
    }

    /// One bar per day.
    pub fn draw_posts_chart(ui: &mut egui::Ui, series: &[TimeSeriesRow]) {
        let bars: Vec<Bar> = series
            .iter()
            .map(|r| {
                Bar::new(Self::date_to_x(r.date), r.posts as f64)
                    .width(0.8)
                    .name(r.date.to_string())
            })
            .collect();

        Plot::new("posts_over_time")
            .height(CHART_HEIGHT)
            .allow_scroll(false)
            .x_axis_label("Date")
            .y_axis_label("Number of posts")
            .include_y(0.0)
            .x_axis_formatter(Self::date_axis_label)
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).color(POSTS_COLOR).name("Posts"));
            });
    }

    /// Horizontal bars, largest count on top.
    pub fn draw_hashtag_chart(ui: &mut egui::Ui, hashtags: &[HashtagCount]) {
        let sorted = Self::hashtags_by_count(hashtags);
        let n = sorted.len();
        // Row 0 is drawn at the top.
        let labels: Vec<String> = sorted.iter().rev().map(|h| h.hashtag.clone()).collect();

        let bars: Vec<Bar> = sorted
            .iter()
            .enumerate()
            .map(|(i, h)| {
                Bar::new((n - 1 - i) as f64, h.count as f64)
                    .width(0.6)
                    .name(&h.hashtag)
            })
            .collect();

        Plot::new("top_hashtags")
            .height(HASHTAG_CHART_HEIGHT)
            .allow_scroll(false)
            .allow_zoom(false)
            .x_axis_label("Count")
            .include_x(0.0)
            .y_axis_formatter(move |mark, _range| {
                let idx = mark.value.round();
                if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
                    return String::new();
                }
                labels.get(idx as usize).cloned().unwrap_or_default()
            })
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(
                    BarChart::new(bars)
                        .horizontal()
                        .color(HASHTAG_COLOR)
                        .name("Hashtags"),
                );
            });
    }

    /// Points on longitude/latitude axes, sized by engagement.
    pub fn draw_geo_chart(ui: &mut egui::Ui, geo: &[GeoPoint]) {
        let max_engagement = geo.iter().map(|p| p.engagement).max().unwrap_or(0);

        Plot::new("geo_engagement")
            .height(CHART_HEIGHT)
            .allow_scroll(false)
            .data_aspect(1.0)
            .x_axis_label("Longitude")
            .y_axis_label("Latitude")
            .include_x(-180.0)
            .include_x(180.0)
            .include_y(-90.0)
            .include_y(90.0)
            .show(ui, |plot_ui| {
                for point in geo {
                    plot_ui.points(
                        Points::new(vec![[point.lon, point.lat]])
                            .radius(Self::geo_radius(point.engagement, max_engagement))
                            .color(GEO_COLOR.gamma_multiply(0.7))
                            .name(format!("{}\nEngagement: {}", point.region, point.engagement)),
                    );
                }
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_axis_round_trips() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(ChartPlotter::x_to_date(ChartPlotter::date_to_x(date)), Some(date));
    }

    #[test]
    fn geo_radius_scales_with_engagement() {
        assert_eq!(ChartPlotter::geo_radius(0, 0), GEO_MIN_RADIUS);
        assert_eq!(ChartPlotter::geo_radius(3000, 3000), GEO_MAX_RADIUS);
        let mid = ChartPlotter::geo_radius(1500, 3000);
        assert!(mid > GEO_MIN_RADIUS && mid < GEO_MAX_RADIUS);
    }

    #[test]
    fn hashtags_sorted_descending_with_stable_ties() {
        let tags = vec![
            HashtagCount { hashtag: "#A".into(), count: 1 },
            HashtagCount { hashtag: "#B".into(), count: 5 },
            HashtagCount { hashtag: "#C".into(), count: 5 },
        ];
        let order: Vec<&str> = ChartPlotter::hashtags_by_count(&tags)
            .iter()
            .map(|h| h.hashtag.as_str())
            .collect();
        assert_eq!(order, vec!["#B", "#C", "#A"]);
    }
}

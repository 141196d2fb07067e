//! Static Chart Renderer
//! Draws the dashboard charts into a single PNG report.
//!
//! Layout (2 x 2):
//! 1. Sentiment over time (line, fixed -1..1 axis)
//! 2. Posts over time (bars)
//! 3. Top hashtags (horizontal bars, largest first)
//! 4. Engagement by region (lon/lat scatter sized by engagement)

use crate::charts::ChartPlotter;
use crate::data::{GeoPoint, HashtagCount, TimeSeriesRow};
use crate::pipeline::DashboardView;
use chrono::{Days, NaiveDate};
use image::{ImageFormat, RgbImage};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::fs;
use std::io::Cursor;
use std::path::Path;
use thiserror::Error;

const SENTIMENT: RGBColor = RGBColor(52, 152, 219);
const POSTS: RGBColor = RGBColor(46, 204, 113);
const HASHTAGS: RGBColor = RGBColor(155, 89, 182);
const GEO: RGBColor = RGBColor(231, 76, 60);
const LABEL: RGBColor = RGBColor(60, 60, 60);

/// Largest accepted report width or height, in pixels.
pub const MAX_REPORT_SIDE: u32 = 8192;

const CAPTION_FONT: (&str, u32) = ("sans-serif", 22);
const LABEL_FONT: (&str, u32) = ("sans-serif", 13);

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Drawing failed: {0}")]
    Drawing(String),
    #[error("Image buffer does not match {0}x{1}")]
    Buffer(u32, u32),
    #[error("Report size {0}x{1} is outside the supported range")]
    Size(u32, u32),
    #[error("Failed to encode PNG: {0}")]
    Image(#[from] image::ImageError),
    #[error("Failed to write report: {0}")]
    Io(#[from] std::io::Error),
}

fn draw_err<E: std::fmt::Display>(err: E) -> RenderError {
    RenderError::Drawing(err.to_string())
}

/// Both sides non-zero and at most [`MAX_REPORT_SIDE`].
pub fn report_size_is_valid(width: u32, height: u32) -> bool {
    (1..=MAX_REPORT_SIDE).contains(&width) && (1..=MAX_REPORT_SIDE).contains(&height)
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render the report and write it to `path`.
    pub fn render_dashboard_png(
        view: &DashboardView,
        path: &Path,
        width: u32,
        height: u32,
    ) -> Result<(), RenderError> {
        let png = Self::render_dashboard_to_bytes(view, width, height)?;
        fs::write(path, png)?;
        tracing::info!(path = %path.display(), width, height, "report written");
        Ok(())
    }

    /// Render the report to in-memory PNG bytes.
    pub fn render_dashboard_to_bytes(
        view: &DashboardView,
        width: u32,
        height: u32,
    ) -> Result<Vec<u8>, RenderError> {
        if !report_size_is_valid(width, height) {
            return Err(RenderError::Size(width, height));
        }
        let mut buffer = vec![0u8; width as usize * height as usize * 3];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            root.fill(&WHITE).map_err(draw_err)?;

            let panels = root.split_evenly((2, 2));
            Self::draw_sentiment(&panels[0], &view.time_series)?;
            Self::draw_posts(&panels[1], &view.time_series)?;
            Self::draw_hashtags(&panels[2], &view.hashtags)?;
            Self::draw_geo(&panels[3], &view.geo)?;

            root.present().map_err(draw_err)?;
        }

        let image =
            RgbImage::from_raw(width, height, buffer).ok_or(RenderError::Buffer(width, height))?;
        let mut png = Vec::new();
        image.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
        Ok(png)
    }

    /// First date and the number of days covered.
    fn day_span(series: &[TimeSeriesRow]) -> (NaiveDate, f64) {
        let first = series.iter().map(|r| r.date).min().unwrap_or_default();
        let last = series.iter().map(|r| r.date).max().unwrap_or(first);
        (first, ((last - first).num_days() as f64).max(1.0))
    }

    fn day_offset(first: NaiveDate, date: NaiveDate) -> f64 {
        (date - first).num_days() as f64
    }

    fn draw_sentiment<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        series: &[TimeSeriesRow],
    ) -> Result<(), RenderError> {
        let (first, span) = Self::day_span(series);
        let date_label = |x: &f64| label_date(first, *x);

        let mut chart = ChartBuilder::on(area)
            .caption("Sentiment over time", CAPTION_FONT)
            .margin(12)
            .x_label_area_size(30)
            .y_label_area_size(45)
            .build_cartesian_2d(0f64..span, -1f64..1f64)
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .x_labels(6)
            .x_label_formatter(&date_label)
            .y_desc("Sentiment")
            .label_style(LABEL_FONT)
            .draw()
            .map_err(draw_err)?;

        chart
            .draw_series(LineSeries::new(
                series
                    .iter()
                    .map(|r| (Self::day_offset(first, r.date), r.sentiment)),
                SENTIMENT.stroke_width(2),
            ))
            .map_err(draw_err)?;
        Ok(())
    }

    fn draw_posts<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        series: &[TimeSeriesRow],
    ) -> Result<(), RenderError> {
        let (first, span) = Self::day_span(series);
        let max_posts = series.iter().map(|r| r.posts).max().unwrap_or(0).max(1) as f64;
        let date_label = |x: &f64| label_date(first, *x);

        let mut chart = ChartBuilder::on(area)
            .caption("Posts over time", CAPTION_FONT)
            .margin(12)
            .x_label_area_size(30)
            .y_label_area_size(50)
            .build_cartesian_2d(-0.5f64..span + 0.5, 0f64..max_posts * 1.1)
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(6)
            .x_label_formatter(&date_label)
            .y_desc("Number of posts")
            .label_style(LABEL_FONT)
            .draw()
            .map_err(draw_err)?;

        chart
            .draw_series(series.iter().map(|r| {
                let x = Self::day_offset(first, r.date);
                Rectangle::new([(x - 0.4, 0.0), (x + 0.4, r.posts as f64)], POSTS.filled())
            }))
            .map_err(draw_err)?;
        Ok(())
    }

    fn draw_hashtags<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        hashtags: &[HashtagCount],
    ) -> Result<(), RenderError> {
        let sorted = ChartPlotter::hashtags_by_count(hashtags);
        let n = sorted.len();
        let max_count = sorted.first().map_or(1, |h| h.count.max(1)) as f64;
        // Largest count is drawn at the top row.
        let row_of = |i: usize| (n - 1 - i) as f64;
        let tag_label = |y: &f64| {
            let idx = y.round();
            if (y - idx).abs() > 1e-6 || idx < 0.0 || idx as usize >= n {
                return String::new();
            }
            sorted[n - 1 - idx as usize].hashtag.clone()
        };

        let mut chart = ChartBuilder::on(area)
            .caption("Top hashtags", CAPTION_FONT)
            .margin(12)
            .x_label_area_size(30)
            .y_label_area_size(130)
            .build_cartesian_2d(0f64..max_count * 1.1, -0.5f64..(n.max(1) as f64 - 0.5))
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .disable_y_mesh()
            .y_labels(n.max(1))
            .y_label_formatter(&tag_label)
            .x_desc("Count")
            .label_style(LABEL_FONT)
            .draw()
            .map_err(draw_err)?;

        if n == 0 {
            area.draw(&Text::new(
                "No hashtag data available for this source.",
                (40, 60),
                LABEL_FONT.into_font().color(&LABEL),
            ))
            .map_err(draw_err)?;
            return Ok(());
        }

        chart
            .draw_series(sorted.iter().enumerate().map(|(i, h)| {
                let y = row_of(i);
                Rectangle::new([(0.0, y - 0.3), (h.count as f64, y + 0.3)], HASHTAGS.filled())
            }))
            .map_err(draw_err)?;
        Ok(())
    }

    fn draw_geo<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        geo: &[GeoPoint],
    ) -> Result<(), RenderError> {
        let max_engagement = geo.iter().map(|p| p.engagement).max().unwrap_or(0);

        let mut chart = ChartBuilder::on(area)
            .caption("Engagement by region", CAPTION_FONT)
            .margin(12)
            .x_label_area_size(30)
            .y_label_area_size(45)
            .build_cartesian_2d(-180f64..180f64, -90f64..90f64)
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .x_desc("Longitude")
            .y_desc("Latitude")
            .label_style(LABEL_FONT)
            .draw()
            .map_err(draw_err)?;

        if geo.is_empty() {
            area.draw(&Text::new(
                "No geo data available for this source.",
                (40, 60),
                LABEL_FONT.into_font().color(&LABEL),
            ))
            .map_err(draw_err)?;
            return Ok(());
        }

        chart
            .draw_series(geo.iter().map(|p| {
                let radius = ChartPlotter::geo_radius(p.engagement, max_engagement).round() as i32;
                Circle::new((p.lon, p.lat), radius, GEO.mix(0.6).filled())
            }))
            .map_err(draw_err)?;

        chart
            .draw_series(geo.iter().map(|p| {
                Text::new(
                    format!("{} ({})", p.region, p.engagement),
                    (p.lon, p.lat),
                    LABEL_FONT.into_font().color(&LABEL),
                )
            }))
            .map_err(draw_err)?;
        Ok(())
    }
}

fn label_date(first: NaiveDate, offset: f64) -> String {
    if offset < 0.0 {
        return String::new();
    }
    first
        .checked_add_days(Days::new(offset.round() as u64))
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_degenerate_report_sizes() {
        let view = crate::Dashboard::new(&crate::DashboardConfig {
            seed: Some(3),
            ..Default::default()
        })
        .compute(&Default::default())
        .unwrap();

        for (width, height) in [(0, 600), (800, 0), (MAX_REPORT_SIDE + 1, 600)] {
            let err = StaticChartRenderer::render_dashboard_to_bytes(&view, width, height)
                .unwrap_err();
            assert!(matches!(err, RenderError::Size(w, h) if w == width && h == height));
        }
        assert!(report_size_is_valid(1, MAX_REPORT_SIDE));
    }

    #[test]
    fn labels_offsets_as_dates() {
        let first = NaiveDate::from_ymd_opt(2024, 1, 30).unwrap();
        assert_eq!(label_date(first, 2.0), "2024-02-01");
        assert_eq!(label_date(first, -1.0), "");
    }

    #[test]
    fn single_day_series_still_has_an_axis() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let series = vec![TimeSeriesRow {
            date,
            sentiment: 0.0,
            posts: 1,
        }];
        assert_eq!(StaticChartRenderer::day_span(&series), (date, 1.0));
    }
}

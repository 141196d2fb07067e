//! Chart Viewer Widget
//! Central scrollable panel with the KPI cards and the four dashboard charts.

use crate::charts::ChartPlotter;
use crate::pipeline::DashboardView;
use egui::{Color32, RichText, ScrollArea};

const CARD_SPACING: f32 = 15.0;
const KPI_CARD_WIDTH: f32 = 220.0;

/// Renders the latest [`DashboardView`].
#[derive(Default)]
pub struct ChartViewer {
    pub view: Option<DashboardView>,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_view(&mut self, view: DashboardView) {
        self.view = Some(view);
    }

    pub fn clear(&mut self) {
        self.view = None;
    }

    pub fn show(&self, ui: &mut egui::Ui) {
        let Some(view) = &self.view else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0));
            });
            return;
        };

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.heading("Global Climate Action Social Media Trends (Justice Lens)");
                if let Some(path) = &view.source_path {
                    let replaced: Vec<String> =
                        view.replaced.iter().map(|t| t.to_string()).collect();
                    let detail = if replaced.is_empty() {
                        "no recognised columns, showing demo data".to_string()
                    } else {
                        format!("using {}", replaced.join(", "))
                    };
                    ui.label(
                        RichText::new(format!("{} ({})", path.display(), detail))
                            .size(11.0)
                            .color(Color32::GRAY),
                    );
                }
                ui.add_space(CARD_SPACING);

                ui.horizontal(|ui| {
                    Self::kpi_card(ui, "Total Posts", &view.kpis.total_posts_display());
                    ui.add_space(CARD_SPACING);
                    Self::kpi_card(ui, "Average Sentiment", &view.kpis.mean_sentiment_display());
                    ui.add_space(CARD_SPACING);
                    Self::kpi_card(ui, "Top Hashtag", &view.kpis.top_hashtag);
                });

                ui.add_space(CARD_SPACING);
                ui.separator();

                Self::section(ui, "Sentiment over time");
                ChartPlotter::draw_sentiment_chart(ui, &view.time_series);

                Self::section(ui, "Posts over time");
                ChartPlotter::draw_posts_chart(ui, &view.time_series);

                Self::section(ui, "Top hashtags");
                if view.hashtags.is_empty() {
                    ui.label("No hashtag data available for this source.");
                } else {
                    ChartPlotter::draw_hashtag_chart(ui, &view.hashtags);
                }

                Self::section(ui, "Engagement by region");
                if view.geo.is_empty() {
                    ui.label("No geo data available for this source.");
                } else {
                    ChartPlotter::draw_geo_chart(ui, &view.geo);
                }

                ui.add_space(CARD_SPACING);
                ui.separator();
                ui.label(
                    RichText::new(
                        "Place a CSV in the data directory and pick it in the side panel. \
                         Recognised columns: date, posts, sentiment, hashtag, count, \
                         lat, lon, region, engagement.",
                    )
                    .size(11.0)
                    .color(Color32::GRAY),
                );
            });
    }

    fn section(ui: &mut egui::Ui, title: &str) {
        ui.add_space(CARD_SPACING);
        ui.label(RichText::new(title).size(16.0).strong());
        ui.add_space(5.0);
    }

    fn kpi_card(ui: &mut egui::Ui, label: &str, value: &str) {
        egui::Frame::none()
            .rounding(8.0)
            .stroke(egui::Stroke::new(1.0, Color32::from_rgb(100, 149, 237)))
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.set_width(KPI_CARD_WIDTH);
                ui.vertical(|ui| {
                    ui.label(RichText::new(label).size(12.0).color(Color32::GRAY));
                    ui.label(RichText::new(value).size(24.0).strong());
                });
            });
    }
}

//! TrendLens Main Application
//! Main window with control panel and chart viewer.

use crate::charts::StaticChartRenderer;
use crate::config::DashboardConfig;
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use crate::pipeline::Dashboard;
use egui::SidePanel;

/// Main application window.
pub struct TrendLensApp {
    dashboard: Dashboard,
    config: DashboardConfig,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
}

impl TrendLensApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: DashboardConfig) -> Self {
        let dashboard = Dashboard::new(&config);
        let control_panel =
            ControlPanel::new(dashboard.data_dir().to_path_buf(), dashboard.candidates());

        let mut app = Self {
            dashboard,
            config,
            control_panel,
            chart_viewer: ChartViewer::new(),
        };
        app.refresh();
        app
    }

    /// Recompute the view from the current control panel selections.
    fn refresh(&mut self) {
        let inputs = self.control_panel.settings.inputs();
        match self.dashboard.compute(&inputs) {
            Ok(view) => {
                self.control_panel.update_bounds(view.date_bounds);
                self.control_panel.set_status(format!(
                    "Showing {} days, {} hashtags, {} regions",
                    view.time_series.len(),
                    view.hashtags.len(),
                    view.geo.len()
                ));
                self.chart_viewer.set_view(view);
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to compute dashboard");
                self.control_panel.update_bounds(None);
                self.control_panel.set_status(format!("Error: {}", e));
                self.chart_viewer.clear();
            }
        }
    }

    fn handle_source_changed(&mut self) {
        // The new source brings its own date span.
        self.control_panel.settings.start = None;
        self.control_panel.settings.end = None;
        self.refresh();
    }

    fn handle_rescan(&mut self) {
        self.control_panel.candidates = self.dashboard.candidates();
        let still_present = self
            .control_panel
            .settings
            .csv_choice
            .as_ref()
            .map_or(true, |choice| self.control_panel.candidates.contains(choice));
        if !still_present {
            self.control_panel.settings.csv_choice = None;
            self.handle_source_changed();
        }
    }

    /// Render the current view to the configured PNG path.
    fn handle_export_report(&mut self) {
        let Some(view) = &self.chart_viewer.view else {
            self.control_panel.set_status("Nothing to export");
            return;
        };

        let path = &self.config.report_path;
        match StaticChartRenderer::render_dashboard_png(
            view,
            path,
            self.config.report_width,
            self.config.report_height,
        ) {
            Ok(()) => {
                self.control_panel
                    .set_status(format!("Report exported to {}", path.display()));
                if self.config.open_after_export {
                    if let Err(e) = open::that(path) {
                        tracing::warn!(error = %e, "could not open exported report");
                    }
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "report export failed");
                self.control_panel.set_status(format!("Error: {}", e));
            }
        }
    }
}

impl eframe::App for TrendLensApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(280.0)
            .max_width(340.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui);

                    match action {
                        ControlPanelAction::SourceChanged => self.handle_source_changed(),
                        ControlPanelAction::Rescan => self.handle_rescan(),
                        ControlPanelAction::RangeChanged => self.refresh(),
                        ControlPanelAction::ExportReport => self.handle_export_report(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Chart Viewer
        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ui);
        });
    }
}

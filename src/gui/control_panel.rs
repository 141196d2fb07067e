//! Control Panel Widget
//! Left side panel with data source selection, date range filter and export.

use crate::pipeline::{DashboardInputs, DataSource};
use chrono::{Duration, NaiveDate};
use egui::{Color32, ComboBox, RichText, Slider};
use std::path::PathBuf;

const NO_FILE_LABEL: &str = "(none)";

/// Which kind of data the user picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceKind {
    #[default]
    Demo,
    Csv,
}

/// User selections driving the pipeline.
#[derive(Debug, Default, Clone)]
pub struct UserSettings {
    pub source_kind: SourceKind,
    pub csv_choice: Option<PathBuf>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl UserSettings {
    /// Inputs for the next pipeline run. CSV mode with no file picked falls back to demo data.
    pub fn inputs(&self) -> DashboardInputs {
        let source = match (&self.source_kind, &self.csv_choice) {
            (SourceKind::Csv, Some(path)) => DataSource::Csv(path.clone()),
            _ => DataSource::Demo,
        };
        DashboardInputs {
            source,
            start: self.start,
            end: self.end,
        }
    }
}

/// Left side control panel.
pub struct ControlPanel {
    pub settings: UserSettings,
    pub candidates: Vec<PathBuf>,
    pub data_dir: PathBuf,
    /// Min and max date of the current series; bounds the range sliders.
    pub bounds: Option<(NaiveDate, NaiveDate)>,
    pub status: String,
}

impl ControlPanel {
    pub fn new(data_dir: PathBuf, candidates: Vec<PathBuf>) -> Self {
        Self {
            settings: UserSettings::default(),
            candidates,
            data_dir,
            bounds: None,
            status: "Ready".to_string(),
        }
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    /// New series bounds; the selected range resets to the full span when they change.
    pub fn update_bounds(&mut self, bounds: Option<(NaiveDate, NaiveDate)>) {
        if self.bounds != bounds {
            self.bounds = bounds;
            self.settings.start = None;
            self.settings.end = None;
        }
    }

    fn file_label(path: &Option<PathBuf>) -> String {
        path.as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| NO_FILE_LABEL.to_string())
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("🌍 Justice Lens")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(
                RichText::new("Climate action social media trends")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Data Source Section =====
        ui.label(RichText::new("📁 Data source").size(14.0).strong());
        ui.add_space(5.0);

        let before = self.settings.source_kind;
        ui.radio_value(&mut self.settings.source_kind, SourceKind::Demo, "Demo (built-in)");
        ui.radio_value(
            &mut self.settings.source_kind,
            SourceKind::Csv,
            format!("CSV from {}", self.data_dir.display()),
        );
        if self.settings.source_kind != before {
            action = ControlPanelAction::SourceChanged;
        }

        if self.settings.source_kind == SourceKind::Csv {
            ui.add_space(5.0);
            ComboBox::from_id_salt("csv_choice")
                .width(220.0)
                .selected_text(Self::file_label(&self.settings.csv_choice))
                .show_ui(ui, |ui| {
                    if ui
                        .selectable_label(self.settings.csv_choice.is_none(), NO_FILE_LABEL)
                        .clicked()
                        && self.settings.csv_choice.is_some()
                    {
                        self.settings.csv_choice = None;
                        action = ControlPanelAction::SourceChanged;
                    }
                    for path in &self.candidates {
                        let selected = self.settings.csv_choice.as_ref() == Some(path);
                        if ui
                            .selectable_label(selected, Self::file_label(&Some(path.clone())))
                            .clicked()
                            && !selected
                        {
                            self.settings.csv_choice = Some(path.clone());
                            action = ControlPanelAction::SourceChanged;
                        }
                    }
                });

            if self.candidates.is_empty() {
                ui.label(
                    RichText::new("No CSV files found")
                        .size(11.0)
                        .color(Color32::GRAY),
                );
            }
            if ui.small_button("⟳ Rescan").clicked() {
                action = ControlPanelAction::Rescan;
            }
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Filters Section =====
        ui.label(RichText::new("🔧 Filters").size(14.0).strong());
        ui.add_space(5.0);

        match self.bounds {
            Some((min, max)) => {
                if self.show_range_sliders(ui, min, max) && action == ControlPanelAction::None {
                    action = ControlPanelAction::RangeChanged;
                }
            }
            None => {
                ui.label(
                    RichText::new("No dates to filter")
                        .size(11.0)
                        .color(Color32::GRAY),
                );
            }
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Action Buttons =====
        ui.vertical_centered(|ui| {
            let button = egui::Button::new(RichText::new("📄 Export PNG").size(14.0))
                .min_size(egui::vec2(150.0, 30.0));
            if ui.add(button).clicked() {
                action = ControlPanelAction::ExportReport;
            }
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(5.0);

        let status_color = if self.status.starts_with("Error") {
            Color32::from_rgb(220, 53, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    /// Start/end sliders over day offsets from `min`. Returns true when either moved.
    fn show_range_sliders(&mut self, ui: &mut egui::Ui, min: NaiveDate, max: NaiveDate) -> bool {
        let span = (max - min).num_days() as i32;
        let offset_of = |date: Option<NaiveDate>, fallback: i32| {
            date.map_or(fallback, |d| (d - min).num_days() as i32)
        };
        let mut start = offset_of(self.settings.start, 0);
        let mut end = offset_of(self.settings.end, span);
        let format_offset = move |value: f64, _: std::ops::RangeInclusive<usize>| {
            (min + Duration::days(value.round() as i64)).to_string()
        };

        let start_changed = ui
            .add(
                Slider::new(&mut start, 0..=span)
                    .text("Start")
                    .custom_formatter(format_offset),
            )
            .changed();
        let end_changed = ui
            .add(
                Slider::new(&mut end, 0..=span)
                    .text("End")
                    .custom_formatter(format_offset),
            )
            .changed();

        if start_changed {
            self.settings.start = Some(min + Duration::days(start as i64));
        }
        if end_changed {
            self.settings.end = Some(min + Duration::days(end as i64));
        }
        start_changed || end_changed
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    SourceChanged,
    Rescan,
    RangeChanged,
    ExportReport,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_mode_without_file_uses_demo_data() {
        let settings = UserSettings {
            source_kind: SourceKind::Csv,
            ..Default::default()
        };
        assert_eq!(settings.inputs().source, DataSource::Demo);
    }

    #[test]
    fn csv_choice_only_applies_in_csv_mode() {
        let mut settings = UserSettings {
            csv_choice: Some(PathBuf::from("data/trends.csv")),
            ..Default::default()
        };
        assert_eq!(settings.inputs().source, DataSource::Demo);

        settings.source_kind = SourceKind::Csv;
        assert_eq!(
            settings.inputs().source,
            DataSource::Csv(PathBuf::from("data/trends.csv"))
        );
    }

    #[test]
    fn new_bounds_reset_range() {
        let mut panel = ControlPanel::new(PathBuf::from("data"), Vec::new());
        let a = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let b = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        panel.update_bounds(Some((a, b)));
        panel.settings.start = Some(b);

        panel.update_bounds(Some((a, b)));
        assert_eq!(panel.settings.start, Some(b));

        panel.update_bounds(Some((a, a)));
        assert_eq!(panel.settings.start, None);
    }
}

//! Control Panel Widget
//! Left side panel with file selection, analysis and export controls.

use crate::data::REQUIRED_COLUMNS;
use egui::{Color32, RichText};
use std::path::PathBuf;

/// User settings for analysis
#[derive(Default, Clone)]
pub struct UserSettings {
    pub input_path: Option<PathBuf>,
}

/// Left side control panel with file selection and processing controls.
pub struct ControlPanel {
    pub settings: UserSettings,
    pub progress: f32,
    pub status: String,
    pub analyze_enabled: bool,
    pub export_enabled: bool,
    pub row_count: usize,
    pub transformer_count: usize,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            settings: UserSettings::default(),
            progress: 0.0,
            status: "Ready".to_string(),
            analyze_enabled: false,
            export_enabled: false,
            row_count: 0,
            transformer_count: 0,
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update the panel after a file finished loading
    pub fn file_loaded(&mut self, row_count: usize) {
        self.row_count = row_count;
        self.analyze_enabled = row_count > 0;
        self.export_enabled = false;
        self.transformer_count = 0;
    }

    /// Update the panel after an analysis completed
    pub fn analysis_complete(&mut self, transformer_count: usize) {
        self.transformer_count = transformer_count;
        self.export_enabled = transformer_count > 0;
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("⚡ TrafoScope")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(
                RichText::new("Transformer Loading Analyzer")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Data Source Section =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let path_text = self
                        .settings
                        .input_path
                        .as_ref()
                        .and_then(|p| p.file_name())
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| "No file selected".to_string());

                    ui.label(RichText::new(&path_text).size(12.0).color(
                        if self.settings.input_path.is_some() {
                            Color32::WHITE
                        } else {
                            Color32::GRAY
                        },
                    ));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("📂 Browse").clicked() {
                            action = ControlPanelAction::BrowseFile;
                        }
                    });
                });
            });

        ui.add_space(5.0);
        ui.label(
            RichText::new("Expected columns:")
                .size(11.0)
                .color(Color32::GRAY),
        );
        for col in REQUIRED_COLUMNS {
            ui.label(RichText::new(format!("  • {col}")).size(11.0).color(Color32::GRAY));
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Action Buttons =====
        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(self.analyze_enabled, |ui| {
                let button = egui::Button::new(RichText::new("▶ Analyze Loading").size(16.0))
                    .min_size(egui::vec2(200.0, 35.0));
                if ui.add(button).clicked() {
                    action = ControlPanelAction::Analyze;
                }
            });

            ui.add_space(8.0);

            ui.add_enabled_ui(self.export_enabled, |ui| {
                let csv_button = egui::Button::new(RichText::new("⬇ Export CSV").size(14.0))
                    .min_size(egui::vec2(150.0, 30.0));
                if ui.add(csv_button).clicked() {
                    action = ControlPanelAction::ExportCsv;
                }

                ui.add_space(5.0);

                let charts_button = egui::Button::new(RichText::new("🖼 Export Charts").size(14.0))
                    .min_size(egui::vec2(150.0, 30.0));
                if ui.add(charts_button).clicked() {
                    action = ControlPanelAction::ExportCharts;
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Summary Section =====
        if self.row_count > 0 {
            ui.label(RichText::new("📋 Dataset").size(14.0).strong());
            ui.add_space(5.0);
            ui.label(RichText::new(format!("Rows: {}", self.row_count)).size(12.0));
            if self.transformer_count > 0 {
                ui.label(
                    RichText::new(format!("Transformers: {}", self.transformer_count)).size(12.0),
                );
            }
            ui.add_space(10.0);
            ui.separator();
            ui.add_space(10.0);
        }

        // ===== Progress Section =====
        ui.label(RichText::new("📊 Progress").size(14.0).strong());
        ui.add_space(5.0);

        ui.add(
            egui::ProgressBar::new(self.progress / 100.0)
                .show_percentage()
                .animate(self.progress > 0.0 && self.progress < 100.0),
        );

        ui.add_space(5.0);

        let status_color = if self.status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.contains("Complete") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    /// Set progress and status
    pub fn set_progress(&mut self, progress: f32, status: &str) {
        self.progress = progress;
        self.status = status.to_string();
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    BrowseFile,
    Analyze,
    ExportCsv,
    ExportCharts,
}

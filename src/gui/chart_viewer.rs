//! Chart Viewer Widget
//! Right side scrollable panel showing one loading chart per transformer.
//! Supports responsive multi-column layout based on available width.

use crate::charts::{ChartData, ChartPlotter};
use crate::engine::Status;
use egui::{RichText, ScrollArea};

/// Chart card configuration
const CHART_SPACING: f32 = 15.0;
const CARD_HEIGHT: f32 = 420.0; // Height for each card
const CHART_WIDTH: f32 = 780.0; // Fixed width for each chart card

/// Scrollable chart display area with responsive multi-column layout.
/// Cards appear in first-appearance order of the transformers in the input.
pub struct ChartViewer {
    pub charts: Vec<ChartData>,
}

impl Default for ChartViewer {
    fn default() -> Self {
        Self { charts: Vec::new() }
    }
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all charts
    pub fn clear(&mut self) {
        self.charts.clear();
    }

    /// Replace the displayed charts, keeping the given order.
    pub fn set_charts(&mut self, charts: Vec<ChartData>) {
        self.charts = charts;
    }

    /// Draw the chart viewer with responsive multi-column layout
    pub fn show(&mut self, _ctx: &egui::Context, ui: &mut egui::Ui) {
        if self.charts.is_empty() {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0));
            });
            return;
        }

        // Calculate how many columns fit in available width
        let avail_width = ui.available_width();
        let card_total_width = CHART_WIDTH + CHART_SPACING;
        let num_columns = ((avail_width / card_total_width).floor() as usize).max(1);

        let total_items = self.charts.len();
        let total_rows = total_items.div_ceil(num_columns);
        let row_height = CARD_HEIGHT + CHART_SPACING;

        let charts = self.charts.clone();

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show_rows(ui, row_height, total_rows, |ui, row_range| {
                for row in row_range {
                    ui.horizontal(|ui| {
                        for col in 0..num_columns {
                            let idx = row * num_columns + col;
                            if let Some(data) = charts.get(idx) {
                                Self::draw_chart_card(ui, data);
                                ui.add_space(CHART_SPACING);
                            }
                        }
                    });
                    ui.add_space(CHART_SPACING);
                }
            });
    }

    /// Draw a single transformer card: title, worst-status badge, band legend
    /// and the annotated loading chart.
    fn draw_chart_card(ui: &mut egui::Ui, data: &ChartData) {
        let border_color = ChartPlotter::band_fill(data.worst_status);
        let card_width = CHART_WIDTH - 20.0;

        egui::Frame::none()
            .rounding(8.0)
            .stroke(egui::Stroke::new(2.0, border_color))
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.set_width(card_width);

                ui.vertical(|ui| {
                    ui.horizontal(|ui| {
                        ui.label(
                            RichText::new(format!("⚡ Transformer: {}", data.transformer))
                                .size(18.0)
                                .strong(),
                        );
                        ui.with_layout(
                            egui::Layout::right_to_left(egui::Align::Center),
                            |ui| {
                                ui.label(
                                    RichText::new(format!(
                                        "peak {:.1}% · {}",
                                        data.peak_percent,
                                        data.worst_status.label()
                                    ))
                                    .size(12.0)
                                    .color(border_color),
                                );
                            },
                        );
                    });

                    ui.add_space(8.0);

                    // Band legend
                    ui.horizontal_wrapped(|ui| {
                        for status in Status::ALL {
                            let color = ChartPlotter::band_fill(status);
                            let (rect, _) = ui
                                .allocate_exact_size(egui::vec2(12.0, 12.0), egui::Sense::hover());
                            ui.painter().rect_filled(rect, 2.0, color);
                            ui.label(RichText::new(status.label()).size(11.0));
                            ui.add_space(8.0);
                        }
                    });

                    ui.add_space(10.0);

                    ChartPlotter::draw_loading_chart(ui, data, true);
                });
            });
    }
}

//! Chart Plotter Module
//! Interactive per-transformer loading charts using egui_plot.

use crate::engine::{EnrichedReading, Status, BAND_BOUNDARIES};
use egui::Color32;
use egui_plot::{Line, Plot, PlotPoints, Points, Polygon};

/// Fill colors for the six risk bands, bottom band first.
pub const BAND_FILLS: [Color32; 6] = [
    Color32::from_rgb(189, 195, 199), // gray - underutilization
    Color32::from_rgb(46, 204, 113),  // green - normal
    Color32::from_rgb(241, 196, 15),  // yellow - alert
    Color32::from_rgb(243, 156, 18),  // orange - controlled overload
    Color32::from_rgb(231, 76, 60),   // red - high risk
    Color32::from_rgb(146, 43, 33),   // dark red - critical
];

/// Series color for the loading line.
pub const LOADING_COLOR: Color32 = Color32::from_rgb(52, 152, 219); // Blue

/// Chart data for a single transformer
#[derive(Clone)]
pub struct ChartData {
    pub transformer: String,
    pub timestamps: Vec<String>,
    pub percents: Vec<f64>,
    pub peak_percent: f64,
    pub worst_status: Status,
}

impl ChartData {
    pub fn from_rows(transformer: &str, rows: &[EnrichedReading]) -> Self {
        let timestamps = rows.iter().map(|r| r.reading.timestamp.clone()).collect();
        let percents: Vec<f64> = rows.iter().map(|r| r.percent_of_capacity).collect();
        let peak_percent = percents.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let worst_status = rows
            .iter()
            .map(|r| r.status)
            .max()
            .unwrap_or(Status::Underutilization);

        Self {
            transformer: transformer.to_string(),
            timestamps,
            percents,
            peak_percent,
            worst_status,
        }
    }
}

/// Creates the annotated loading chart using egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Band fill for a status, also used for status badges.
    pub fn band_fill(status: Status) -> Color32 {
        BAND_FILLS[status as usize]
    }

    /// Vertical extent of each shaded band; the open-ended top band is drawn
    /// up to `ceiling`.
    pub fn band_spans(ceiling: f64) -> [(f64, f64); 6] {
        [
            (BAND_BOUNDARIES[0], BAND_BOUNDARIES[1]),
            (BAND_BOUNDARIES[1], BAND_BOUNDARIES[2]),
            (BAND_BOUNDARIES[2], BAND_BOUNDARIES[3]),
            (BAND_BOUNDARIES[3], BAND_BOUNDARIES[4]),
            (BAND_BOUNDARIES[4], BAND_BOUNDARIES[5]),
            (BAND_BOUNDARIES[5], ceiling),
        ]
    }

    /// Shading ceiling: keep the whole series visible, never below 200%.
    pub fn shading_ceiling(peak_percent: f64) -> f64 {
        (peak_percent + 20.0).max(200.0)
    }

    /// Draw the loading time series with the six risk bands shaded behind it.
    /// X-axis: reading index labeled with timestamps, Y-axis: % of capacity.
    pub fn draw_loading_chart(ui: &mut egui::Ui, data: &ChartData, full_size: bool) {
        let height = if full_size { 300.0 } else { 180.0 };
        let n = data.percents.len();
        let ceiling = Self::shading_ceiling(data.peak_percent);

        let x_labels = data.timestamps.clone();

        Plot::new(format!("loading_{}", data.transformer))
            .height(height)
            .allow_zoom(full_size)
            .allow_drag(full_size)
            .allow_scroll(false)
            .x_axis_label("Timestamp")
            .y_axis_label("% of Capacity")
            .include_y(0.0)
            .x_axis_formatter(move |mark, _range| {
                let idx = mark.value.round() as usize;
                if mark.value >= -0.25 && idx < x_labels.len() {
                    x_labels[idx].clone()
                } else {
                    String::new()
                }
            })
            .show(ui, |plot_ui| {
                let x_min = -0.5;
                let x_max = n.saturating_sub(1) as f64 + 0.5;

                for (i, (lo, hi)) in Self::band_spans(ceiling).iter().enumerate() {
                    let corners =
                        vec![[x_min, *lo], [x_max, *lo], [x_max, *hi], [x_min, *hi]];
                    plot_ui.polygon(
                        Polygon::new(PlotPoints::from(corners))
                            .fill_color(BAND_FILLS[i].gamma_multiply(0.25))
                            .stroke(egui::Stroke::NONE)
                            .name(Status::ALL[i].label()),
                    );
                }

                let series: Vec<[f64; 2]> = data
                    .percents
                    .iter()
                    .enumerate()
                    .map(|(i, &p)| [i as f64, p])
                    .collect();

                plot_ui.line(
                    Line::new(PlotPoints::from_iter(series.iter().copied()))
                        .color(LOADING_COLOR)
                        .width(2.0)
                        .name("Loading (%)"),
                );
                plot_ui.points(
                    Points::new(PlotPoints::from_iter(series.iter().copied()))
                        .radius(3.0)
                        .color(LOADING_COLOR),
                );
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{LoadingEngine, Reading};

    fn chart(loads: &[f64]) -> ChartData {
        let rows: Vec<EnrichedReading> = loads
            .iter()
            .enumerate()
            .map(|(i, &load)| {
                LoadingEngine::enrich_row(&Reading {
                    transformer: "T1".to_string(),
                    timestamp: format!("{i:02}:00"),
                    load_kw: load,
                    generation_kw: 0.0,
                    capacity_kva: 100.0,
                })
                .unwrap()
            })
            .collect();
        ChartData::from_rows("T1", &rows)
    }

    #[test]
    fn band_spans_are_contiguous() {
        let spans = ChartPlotter::band_spans(200.0);
        for pair in spans.windows(2) {
            assert_eq!(pair[0].1, pair[1].0);
        }
        assert_eq!(spans[0].0, 0.0);
        assert_eq!(spans[5], (140.0, 200.0));
    }

    #[test]
    fn chart_data_tracks_peak_and_worst_status() {
        let data = chart(&[5.0, 50.0, 135.0]);
        assert_eq!(data.worst_status, Status::Critical);
        assert!(data.peak_percent > 140.0);
        assert_eq!(data.timestamps.len(), 3);
    }

    #[test]
    fn ceiling_clears_the_series() {
        assert_eq!(ChartPlotter::shading_ceiling(50.0), 200.0);
        assert!(ChartPlotter::shading_ceiling(400.0) >= 420.0);
    }
}

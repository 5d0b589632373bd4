//! Static Chart Renderer
//! Writes the per-transformer loading chart to a PNG file using plotters.
//!
//! Layout mirrors the interactive chart: the six risk bands shaded across the
//! full x range, the percent-of-capacity series drawn on top with markers,
//! timestamps as x labels.

use crate::charts::plotter::ChartPlotter;
use crate::charts::ChartData;
use plotters::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("chart for transformer '{0}' has no data points")]
    Empty(String),
    #[error("failed to render chart: {0}")]
    Backend(String),
}

/// Band fills (RGB), bottom band first; matches the interactive palette.
const BAND_COLORS: [RGBColor; 6] = [
    RGBColor(189, 195, 199),
    RGBColor(46, 204, 113),
    RGBColor(241, 196, 15),
    RGBColor(243, 156, 18),
    RGBColor(231, 76, 60),
    RGBColor(146, 43, 33),
];

const LOADING_COLOR: RGBColor = RGBColor(52, 152, 219);

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render one transformer's chart to `path` as a PNG.
    pub fn render_to_file(
        data: &ChartData,
        path: &Path,
        width: u32,
        height: u32,
    ) -> Result<(), RenderError> {
        if data.percents.is_empty() {
            return Err(RenderError::Empty(data.transformer.clone()));
        }

        let n = data.percents.len();
        let ceiling = ChartPlotter::shading_ceiling(data.peak_percent);
        let floor = data.percents.iter().copied().fold(0.0f64, f64::min) - 10.0;

        let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
        root.fill(&WHITE)
            .map_err(|e| RenderError::Backend(e.to_string()))?;

        let caption = format!("Transformer {} loading", data.transformer);
        let mut chart = ChartBuilder::on(&root)
            .caption(&caption, ("sans-serif", 24))
            .margin(10)
            .x_label_area_size(60)
            .y_label_area_size(55)
            .build_cartesian_2d(-0.5f64..(n as f64 - 0.5), floor..ceiling)
            .map_err(|e| RenderError::Backend(e.to_string()))?;

        let timestamps = data.timestamps.clone();
        chart
            .configure_mesh()
            .x_labels(n.min(24))
            .x_label_formatter(&|x| {
                let idx = x.round() as usize;
                if *x >= -0.25 && idx < timestamps.len() {
                    timestamps[idx].clone()
                } else {
                    String::new()
                }
            })
            .y_desc("% of Capacity")
            .x_desc("Timestamp")
            .draw()
            .map_err(|e| RenderError::Backend(e.to_string()))?;

        for (i, (lo, hi)) in ChartPlotter::band_spans(ceiling).iter().enumerate() {
            chart
                .draw_series(std::iter::once(Rectangle::new(
                    [(-0.5, *lo), (n as f64 - 0.5, *hi)],
                    BAND_COLORS[i].mix(0.25).filled(),
                )))
                .map_err(|e| RenderError::Backend(e.to_string()))?;
        }

        chart
            .draw_series(LineSeries::new(
                data.percents.iter().enumerate().map(|(i, &p)| (i as f64, p)),
                LOADING_COLOR.stroke_width(2),
            ))
            .map_err(|e| RenderError::Backend(e.to_string()))?
            .label("Loading (%)")
            .legend(|(x, y)| {
                PathElement::new(vec![(x, y), (x + 16, y)], LOADING_COLOR.stroke_width(2))
            });

        chart
            .draw_series(
                data.percents
                    .iter()
                    .enumerate()
                    .map(|(i, &p)| Circle::new((i as f64, p), 3, LOADING_COLOR.filled())),
            )
            .map_err(|e| RenderError::Backend(e.to_string()))?;

        chart
            .configure_series_labels()
            .border_style(BLACK)
            .background_style(WHITE.mix(0.8))
            .draw()
            .map_err(|e| RenderError::Backend(e.to_string()))?;

        root.present()
            .map_err(|e| RenderError::Backend(e.to_string()))?;
        Ok(())
    }

    /// Render every chart into `dir` as one PNG per transformer, calling
    /// `on_progress(finished, total)` after each file. The first failure
    /// aborts the batch. Returns the number of files written.
    pub fn render_batch(
        charts: &[ChartData],
        dir: &Path,
        width: u32,
        height: u32,
        mut on_progress: impl FnMut(usize, usize),
    ) -> Result<usize, RenderError> {
        let total = charts.len();
        for (idx, data) in charts.iter().enumerate() {
            let path = dir.join(Self::file_name(&data.transformer));
            Self::render_to_file(data, &path, width, height)?;
            on_progress(idx + 1, total);
        }
        Ok(total)
    }

    /// File-system safe chart file name for a transformer id.
    pub fn file_name(transformer: &str) -> PathBuf {
        let safe: String = transformer
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { '_' })
            .collect();
        PathBuf::from(format!("transformer_{safe}.png"))
    }
}

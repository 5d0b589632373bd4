//! Charts module - Chart rendering

mod plotter;
mod renderer;

pub use plotter::{ChartData, ChartPlotter, BAND_FILLS, LOADING_COLOR};
pub use renderer::{RenderError, StaticChartRenderer};

//! TrafoScope - Transformer Loading Analyzer & Chart Viewer
//!
//! Loads per-transformer readings from a spreadsheet, classifies each one
//! into an operating-risk band and displays one annotated chart per
//! transformer.

use anyhow::anyhow;
use eframe::egui;
use trafoscope::gui::TrafoScopeApp;
use trafoscope::logging;

fn main() -> anyhow::Result<()> {
    logging::init();

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 800.0])
            .with_min_inner_size([1200.0, 700.0])
            .with_title("TrafoScope"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "TrafoScope",
        options,
        Box::new(|cc| Ok(Box::new(TrafoScopeApp::new(cc)))),
    )
    .map_err(|e| anyhow!("failed to start the UI: {e}"))
}

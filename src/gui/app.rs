//! TrafoScope Main Application
//! Main window with control panel and chart viewer.

use crate::charts::{ChartData, StaticChartRenderer};
use crate::data::{read_table, DataLoader};
use crate::engine;
use crate::export::CsvExporter;
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use egui::SidePanel;
use polars::prelude::*;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread;
use tracing::warn;

/// Analysis result from background thread
enum CalcResult {
    Progress(f32, String),
    Complete {
        charts: Vec<ChartData>,
        enriched: DataFrame,
    },
    Error(String),
}

/// File loading result from background thread
enum LoadResult {
    Complete { df: DataFrame, row_count: usize },
    Error(String),
}

/// Chart export result from background thread
enum ExportResult {
    Progress(f32, String),
    Complete(usize),
    Error(String),
}

/// Main application window.
pub struct TrafoScopeApp {
    loader: DataLoader,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,

    /// Enriched frame of the last completed analysis, ready for CSV export.
    enriched: Option<DataFrame>,

    // Async analysis
    calc_rx: Option<Receiver<CalcResult>>,
    is_calculating: bool,

    // Async file loading
    load_rx: Option<Receiver<LoadResult>>,
    is_loading: bool,

    // Async chart export
    export_rx: Option<Receiver<ExportResult>>,
    is_exporting: bool,
}

impl TrafoScopeApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        Self {
            loader: DataLoader::new(),
            control_panel: ControlPanel::new(),
            chart_viewer: ChartViewer::new(),
            enriched: None,
            calc_rx: None,
            is_calculating: false,
            load_rx: None,
            is_loading: false,
            export_rx: None,
            is_exporting: false,
        }
    }

    /// Handle spreadsheet file selection - loads in the background
    fn handle_browse_file(&mut self) {
        if self.is_loading {
            return; // Already loading
        }

        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Spreadsheets", &["csv", "xlsx", "xls"])
            .pick_file()
        {
            // Clear previous results
            self.chart_viewer.clear();
            self.enriched = None;
            self.control_panel.settings.input_path = Some(path.clone());
            self.control_panel.set_progress(0.0, "Loading file...");
            self.is_loading = true;

            let (tx, rx) = channel();
            self.load_rx = Some(rx);

            thread::spawn(move || match read_table(&path) {
                Ok(df) => {
                    let row_count = df.height();
                    let _ = tx.send(LoadResult::Complete { df, row_count });
                }
                Err(e) => {
                    let _ = tx.send(LoadResult::Error(e.to_string()));
                }
            });
        }
    }

    /// Check for file loading results
    fn check_load_results(&mut self) {
        let rx = self.load_rx.take();
        if let Some(rx) = rx {
            let mut should_keep_receiver = true;

            while let Ok(result) = rx.try_recv() {
                match result {
                    LoadResult::Complete { df, row_count } => {
                        self.loader.set_dataframe(df);
                        self.control_panel.file_loaded(row_count);
                        self.control_panel
                            .set_progress(0.0, &format!("Loaded {} rows", row_count));
                        self.is_loading = false;
                        should_keep_receiver = false;
                    }
                    LoadResult::Error(error) => {
                        self.control_panel
                            .set_progress(0.0, &format!("Error: {}", error));
                        self.is_loading = false;
                        should_keep_receiver = false;
                    }
                }
            }

            if should_keep_receiver {
                self.load_rx = Some(rx);
            }
        }
    }

    /// Start the validate-enrich-group pipeline in a background thread
    fn start_analysis(&mut self) {
        let Some(df) = self.loader.get_dataframe().cloned() else {
            self.control_panel.set_progress(0.0, "No data loaded");
            return;
        };

        let (tx, rx) = channel();
        self.calc_rx = Some(rx);
        self.is_calculating = true;
        self.control_panel.set_progress(5.0, "Validating columns...");

        thread::spawn(move || {
            Self::run_analysis(tx, df);
        });
    }

    /// Run the analysis (called from background thread)
    fn run_analysis(tx: Sender<CalcResult>, df: DataFrame) {
        let _ = tx.send(CalcResult::Progress(
            20.0,
            "Computing loading metrics...".to_string(),
        ));

        let analysis = match engine::analyze(&df) {
            Ok(analysis) => analysis,
            Err(e) => {
                let _ = tx.send(CalcResult::Error(e.to_string()));
                return;
            }
        };

        let _ = tx.send(CalcResult::Progress(
            60.0,
            "Building charts...".to_string(),
        ));

        let charts: Vec<ChartData> = analysis
            .groups
            .iter()
            .map(|(transformer, rows)| ChartData::from_rows(transformer, rows))
            .collect();

        let enriched = match CsvExporter::enriched_frame(&df, &analysis.rows) {
            Ok(enriched) => enriched,
            Err(e) => {
                let _ = tx.send(CalcResult::Error(e.to_string()));
                return;
            }
        };

        let _ = tx.send(CalcResult::Complete { charts, enriched });
    }

    /// Check for analysis results
    fn check_calculation_results(&mut self) {
        // Take the receiver temporarily to avoid borrow issues
        let rx = self.calc_rx.take();
        if let Some(rx) = rx {
            let mut should_keep_receiver = true;

            while let Ok(result) = rx.try_recv() {
                match result {
                    CalcResult::Progress(progress, status) => {
                        self.control_panel.set_progress(progress, &status);
                    }
                    CalcResult::Complete { charts, enriched } => {
                        let count = charts.len();
                        self.chart_viewer.set_charts(charts);
                        self.enriched = Some(enriched);
                        self.control_panel.analysis_complete(count);
                        self.control_panel.set_progress(
                            100.0,
                            &format!("Complete! {} transformers analyzed", count),
                        );
                        self.is_calculating = false;
                        should_keep_receiver = false;
                    }
                    CalcResult::Error(error) => {
                        self.control_panel
                            .set_progress(0.0, &format!("Error: {}", error));
                        self.is_calculating = false;
                        should_keep_receiver = false;
                    }
                }
            }

            // Put receiver back if still needed
            if should_keep_receiver {
                self.calc_rx = Some(rx);
            }
        }
    }

    /// Handle CSV export - writes the flattened enriched dataset
    fn handle_export_csv(&mut self) {
        let Some(enriched) = self.enriched.as_ref() else {
            self.control_panel.set_progress(0.0, "No analysis to export");
            return;
        };

        let Some(output_path) = rfd::FileDialog::new()
            .add_filter("CSV", &["csv"])
            .set_file_name("transformer_diagnostics.csv")
            .save_file()
        else {
            return; // User cancelled
        };

        match CsvExporter::write_csv(enriched, &output_path) {
            Ok(()) => {
                self.control_panel
                    .set_progress(100.0, "Complete! CSV exported");
                if let Err(e) = open::that(&output_path) {
                    warn!("could not open exported CSV: {e}");
                }
            }
            Err(e) => {
                self.control_panel
                    .set_progress(0.0, &format!("Error: {}", e));
            }
        }
    }

    /// Handle chart export - renders one PNG per transformer into a chosen
    /// directory on a background thread so progress stays visible
    fn handle_export_charts(&mut self) {
        if self.is_exporting {
            return; // Already exporting
        }
        if self.chart_viewer.charts.is_empty() {
            self.control_panel.set_progress(0.0, "No charts to export");
            return;
        }

        let Some(dir) = rfd::FileDialog::new().pick_folder() else {
            return; // User cancelled
        };

        let charts = self.chart_viewer.charts.clone();
        let (tx, rx) = channel();
        self.export_rx = Some(rx);
        self.is_exporting = true;
        self.control_panel.set_progress(0.0, "Rendering charts...");

        thread::spawn(move || {
            let progress_tx = tx.clone();
            let result =
                StaticChartRenderer::render_batch(&charts, &dir, 1200, 700, |done, total| {
                    let _ = progress_tx.send(ExportResult::Progress(
                        done as f32 / total as f32 * 100.0,
                        format!("Rendering chart {done}/{total}..."),
                    ));
                });
            match result {
                Ok(total) => {
                    let _ = tx.send(ExportResult::Complete(total));
                }
                Err(e) => {
                    let _ = tx.send(ExportResult::Error(e.to_string()));
                }
            }
        });
    }

    /// Check for chart export results
    fn check_export_results(&mut self) {
        let rx = self.export_rx.take();
        if let Some(rx) = rx {
            let mut should_keep_receiver = true;

            while let Ok(result) = rx.try_recv() {
                match result {
                    ExportResult::Progress(progress, status) => {
                        self.control_panel.set_progress(progress, &status);
                    }
                    ExportResult::Complete(total) => {
                        self.control_panel
                            .set_progress(100.0, &format!("Complete! {} charts exported", total));
                        self.is_exporting = false;
                        should_keep_receiver = false;
                    }
                    ExportResult::Error(error) => {
                        self.control_panel
                            .set_progress(0.0, &format!("Error: {}", error));
                        self.is_exporting = false;
                        should_keep_receiver = false;
                    }
                }
            }

            if should_keep_receiver {
                self.export_rx = Some(rx);
            }
        }
    }
}

impl eframe::App for TrafoScopeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for background results
        self.check_load_results();
        self.check_calculation_results();
        self.check_export_results();

        // Request repaint while background work is running
        if self.is_loading || self.is_calculating || self.is_exporting {
            ctx.request_repaint();
        }

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(300.0)
            .max_width(350.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui);

                    match action {
                        ControlPanelAction::BrowseFile => self.handle_browse_file(),
                        ControlPanelAction::Analyze => {
                            if !self.is_calculating {
                                self.start_analysis();
                            }
                        }
                        ControlPanelAction::ExportCsv => self.handle_export_csv(),
                        ControlPanelAction::ExportCharts => self.handle_export_charts(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Chart Viewer
        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ctx, ui);
        });
    }
}

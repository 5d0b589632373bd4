//! TrafoScope - Transformer Loading Analyzer & Chart Viewer
//!
//! Ingests a spreadsheet of per-transformer load/generation/capacity
//! readings, computes a loading percentage per row, classifies each reading
//! into one of six operating-risk bands, and renders one annotated chart per
//! transformer plus an enriched CSV export.

pub mod charts;
pub mod data;
pub mod engine;
pub mod export;
pub mod gui;
pub mod logging;

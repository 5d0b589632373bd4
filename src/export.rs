//! CSV Export Module
//! Flattens the enriched dataset back onto the original frame for download.

use crate::engine::EnrichedReading;
use polars::prelude::*;
use std::fs::File;
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Derived column headers, appended after the original columns in this order.
pub const COL_CAPACITY_KW: &str = "Capacity(kW)";
pub const COL_NET_DEMAND_KW: &str = "Net Demand (kW)";
pub const COL_PERCENT_OF_CAPACITY: &str = "% of Capacity";
pub const COL_STATUS: &str = "Status";

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("enriched rows ({rows}) do not match the input frame height ({height})")]
    RowMismatch { rows: usize, height: usize },
}

/// Builds and writes the downloadable enriched dataset.
pub struct CsvExporter;

impl CsvExporter {
    /// The original frame (including any extra columns) with the four derived
    /// columns appended, row-aligned with the enriched output.
    pub fn enriched_frame(
        df: &DataFrame,
        rows: &[EnrichedReading],
    ) -> Result<DataFrame, ExportError> {
        if rows.len() != df.height() {
            return Err(ExportError::RowMismatch {
                rows: rows.len(),
                height: df.height(),
            });
        }

        let capacity: Vec<f64> = rows.iter().map(|r| r.capacity_kw).collect();
        let net_demand: Vec<f64> = rows.iter().map(|r| r.net_demand_kw).collect();
        let percent: Vec<f64> = rows.iter().map(|r| r.percent_of_capacity).collect();
        let status: Vec<&str> = rows.iter().map(|r| r.status.label()).collect();

        let mut out = df.clone();
        out.with_column(Column::new(COL_CAPACITY_KW.into(), capacity))?;
        out.with_column(Column::new(COL_NET_DEMAND_KW.into(), net_demand))?;
        out.with_column(Column::new(COL_PERCENT_OF_CAPACITY.into(), percent))?;
        out.with_column(Column::new(COL_STATUS.into(), status))?;
        Ok(out)
    }

    /// UTF-8, comma-separated, header row included.
    pub fn to_csv_bytes(df: &DataFrame) -> Result<Vec<u8>, ExportError> {
        let mut df = df.clone();
        let mut buf = Vec::new();
        CsvWriter::new(&mut buf).include_header(true).finish(&mut df)?;
        Ok(buf)
    }

    pub fn write_csv(df: &DataFrame, path: &Path) -> Result<(), ExportError> {
        let mut df = df.clone();
        let file = File::create(path)?;
        CsvWriter::new(file).include_header(true).finish(&mut df)?;
        info!(path = %path.display(), rows = df.height(), "enriched CSV written");
        Ok(())
    }
}

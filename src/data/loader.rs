//! Table Loader Module
//! Reads CSV files via Polars and Excel workbooks via calamine.

use calamine::{open_workbook_auto, Data, DataType as _, Reader};
use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV: {0}")]
    Csv(#[from] PolarsError),
    #[error("Failed to load Excel workbook: {0}")]
    Excel(String),
    #[error("File not found: {0}")]
    NotFound(String),
    #[error("Unsupported file extension: {0}")]
    UnsupportedExtension(String),
    #[error("No data loaded")]
    NoData,
}

/// Read a tabular file into a frame, dispatching on the extension.
///
/// `.csv` goes through the Polars lazy reader with schema inference; `.xlsx`
/// and `.xls` go through calamine, first row as header. Columns whose cells
/// are all numeric (or empty) become Float64, everything else becomes text.
pub fn read_table(path: &Path) -> Result<DataFrame, LoaderError> {
    if !path.exists() {
        return Err(LoaderError::NotFound(path.display().to_string()));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    let df = match ext.as_str() {
        "csv" => read_csv(path)?,
        "xlsx" | "xls" => read_excel(path)?,
        other => return Err(LoaderError::UnsupportedExtension(other.to_string())),
    };

    info!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "table loaded"
    );
    Ok(df)
}

fn read_csv(path: &Path) -> Result<DataFrame, LoaderError> {
    // Lazy evaluation for memory efficiency, then collect
    let df = LazyCsvReader::new(path.to_string_lossy().as_ref())
        .with_infer_schema_length(Some(10000))
        .with_ignore_errors(true)
        .finish()?
        .collect()?;
    Ok(df)
}

fn read_excel(path: &Path) -> Result<DataFrame, LoaderError> {
    let mut workbook =
        open_workbook_auto(path).map_err(|e| LoaderError::Excel(e.to_string()))?;

    let sheet_names = workbook.sheet_names();
    let sheet_name = sheet_names.first().ok_or(LoaderError::NoData)?.clone();
    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| LoaderError::Excel(e.to_string()))?;

    let mut rows = range.rows();
    let header_row = rows.next().ok_or(LoaderError::NoData)?;
    let data_rows: Vec<&[Data]> = rows.collect();
    frame_from_sheet(header_row, &data_rows)
}

/// Build a frame from a worksheet's header row and data rows.
///
/// Header cells are trimmed. Short rows are padded with empty cells so every
/// column has the full height. A column whose cells are all numeric or empty
/// (with at least one value) becomes Float64, anything else becomes text.
fn frame_from_sheet(header_row: &[Data], data_rows: &[&[Data]]) -> Result<DataFrame, LoaderError> {
    let headers: Vec<String> = header_row
        .iter()
        .map(|cell| cell.to_string().trim().to_string())
        .collect();

    let columns: Vec<Column> = headers
        .iter()
        .enumerate()
        .map(|(col_idx, name)| {
            let cells: Vec<&Data> = data_rows
                .iter()
                .map(|row| row.get(col_idx).unwrap_or(&Data::Empty))
                .collect();

            let numeric = cells
                .iter()
                .all(|c| matches!(c, Data::Int(_) | Data::Float(_) | Data::Empty))
                && cells.iter().any(|c| !matches!(c, Data::Empty));

            if numeric {
                let values: Vec<Option<f64>> = cells.iter().map(|c| c.as_f64()).collect();
                Column::new(name.as_str().into(), values)
            } else {
                let values: Vec<Option<String>> = cells
                    .iter()
                    .map(|c| match c {
                        Data::Empty => None,
                        other => Some(other.to_string().trim().to_string()),
                    })
                    .collect();
                Column::new(name.as_str().into(), values)
            }
        })
        .collect();

    DataFrame::new(columns).map_err(LoaderError::Csv)
}

/// Holds the loaded frame and its source path for the GUI shell.
pub struct DataLoader {
    df: Option<DataFrame>,
    file_path: Option<PathBuf>,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    pub fn new() -> Self {
        Self {
            df: None,
            file_path: None,
        }
    }

    /// Load a CSV or Excel file. The stored path only updates on success, so
    /// a failed load never leaves a stale path paired with no frame.
    pub fn load_file(&mut self, file_path: &Path) -> Result<&DataFrame, LoaderError> {
        let df = read_table(file_path)?;
        self.file_path = Some(file_path.to_path_buf());
        self.df = Some(df);
        self.df.as_ref().ok_or(LoaderError::NoData)
    }

    /// Get list of column names from the loaded frame.
    pub fn get_columns(&self) -> Vec<String> {
        self.df
            .as_ref()
            .map(|df| {
                df.get_column_names()
                    .iter()
                    .map(|s| s.to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Get the number of rows in the loaded frame.
    pub fn get_row_count(&self) -> usize {
        self.df.as_ref().map(|df| df.height()).unwrap_or(0)
    }

    /// Get a reference to the loaded frame.
    pub fn get_dataframe(&self) -> Option<&DataFrame> {
        self.df.as_ref()
    }

    /// Get file path.
    pub fn get_file_path(&self) -> Option<&PathBuf> {
        self.file_path.as_ref()
    }

    /// Set the frame directly (used for async loading)
    pub fn set_dataframe(&mut self, df: DataFrame) {
        self.df = Some(df);
    }
}

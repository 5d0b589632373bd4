//! Dataset Extraction Module
//! Turns a validated frame into typed readings, strict about numeric cells.

use crate::data::validator::{
    COL_CAPACITY_KVA, COL_GENERATION_KW, COL_LOAD_KW, COL_TIMESTAMP, COL_TRANSFORMER,
};
use crate::engine::Reading;
use polars::prelude::*;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
    #[error("column '{column}' contains a non-numeric or empty value at row {row}")]
    NonNumeric { column: String, row: usize },
    #[error("column '{column}' is empty at row {row}")]
    MissingValue { column: String, row: usize },
}

/// Extracts the typed reading columns from a validated frame.
///
/// Numeric columns must parse cleanly: a malformed cell fails the whole
/// dataset instead of being coerced to 0 or NaN, which would otherwise
/// surface downstream as a bogus "Underutilization" classification.
pub struct ReadingExtractor;

impl ReadingExtractor {
    /// Readings in input row order. Call after schema validation.
    pub fn readings(df: &DataFrame) -> Result<Vec<Reading>, ProcessorError> {
        let transformers = Self::string_column(df, COL_TRANSFORMER)?;
        let timestamps = Self::string_column(df, COL_TIMESTAMP)?;
        let loads = Self::numeric_column(df, COL_LOAD_KW)?;
        let generations = Self::numeric_column(df, COL_GENERATION_KW)?;
        let capacities = Self::numeric_column(df, COL_CAPACITY_KVA)?;

        let rows = transformers
            .into_iter()
            .zip(timestamps)
            .zip(loads.into_iter().zip(generations).zip(capacities))
            .map(
                |((transformer, timestamp), ((load_kw, generation_kw), capacity_kva))| Reading {
                    transformer,
                    timestamp,
                    load_kw,
                    generation_kw,
                    capacity_kva,
                },
            )
            .collect();

        Ok(rows)
    }

    /// Column as finite f64 values; any null, unparseable or non-finite cell
    /// is an error naming the column and row.
    fn numeric_column(df: &DataFrame, name: &str) -> Result<Vec<f64>, ProcessorError> {
        let cast = df.column(name)?.cast(&DataType::Float64)?;
        let ca = cast.f64()?;

        let mut values = Vec::with_capacity(ca.len());
        for (row, value) in ca.into_iter().enumerate() {
            match value {
                Some(v) if v.is_finite() => values.push(v),
                _ => {
                    return Err(ProcessorError::NonNumeric {
                        column: name.to_string(),
                        row,
                    })
                }
            }
        }
        Ok(values)
    }

    /// Column rendered as text labels; works for string and numeric dtypes
    /// (an hour column may well be inferred as integers).
    fn string_column(df: &DataFrame, name: &str) -> Result<Vec<String>, ProcessorError> {
        let series = df.column(name)?.as_materialized_series().clone();

        let mut values = Vec::with_capacity(series.len());
        for row in 0..series.len() {
            let value = series.get(row)?;
            if value.is_null() {
                return Err(ProcessorError::MissingValue {
                    column: name.to_string(),
                    row,
                });
            }
            values.push(value.to_string().trim_matches('"').to_string());
        }
        Ok(values)
    }
}

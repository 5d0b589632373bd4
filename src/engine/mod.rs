//! Engine module - loading computation, classification, grouping

mod grouping;
mod loading;

pub use grouping::TransformerGroups;
pub use loading::{
    classify, ComputationError, EnrichedReading, LoadingEngine, Reading, Status, BAND_BOUNDARIES,
    POWER_FACTOR,
};

use crate::data::{ProcessorError, ReadingExtractor, SchemaError, SchemaValidator};
use polars::prelude::DataFrame;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    Dataset(#[from] ProcessorError),
    #[error(transparent)]
    Computation(#[from] ComputationError),
}

/// Result of one validate-enrich-group pass over a loaded frame.
#[derive(Debug)]
pub struct Analysis {
    /// Enriched rows in input order, for the flattened CSV export.
    pub rows: Vec<EnrichedReading>,
    /// The same rows grouped per transformer, for chart rendering.
    pub groups: TransformerGroups,
}

/// Run the whole pipeline over a loaded frame.
///
/// One blocking call per upload: schema validation aborts before any
/// computation, and any row-level failure aborts the batch with no partial
/// output. Two calls on the same frame produce identical results.
pub fn analyze(df: &DataFrame) -> Result<Analysis, AnalysisError> {
    SchemaValidator::validate(df)?;
    let readings = ReadingExtractor::readings(df)?;
    let rows = LoadingEngine::enrich(&readings)?;
    let groups = TransformerGroups::from_rows(rows.iter().cloned());
    info!(
        rows = rows.len(),
        transformers = groups.len(),
        "analysis complete"
    );
    Ok(Analysis { rows, groups })
}

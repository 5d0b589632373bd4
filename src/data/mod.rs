//! Data module - file loading, schema validation and typed extraction

mod loader;
mod processor;
mod validator;

pub use loader::{read_table, DataLoader, LoaderError};
pub use processor::{ProcessorError, ReadingExtractor};
pub use validator::{
    SchemaError, SchemaValidator, COL_CAPACITY_KVA, COL_GENERATION_KW, COL_LOAD_KW, COL_TIMESTAMP,
    COL_TRANSFORMER, REQUIRED_COLUMNS,
};

//! Schema Validator Module
//! Checks column presence before any computation runs.

use polars::prelude::*;
use thiserror::Error;

/// Required input column headers. Exact, case-sensitive match; these are the
/// configuration constants to change for a different locale's spreadsheets.
pub const COL_TRANSFORMER: &str = "Transformador";
pub const COL_TIMESTAMP: &str = "Horário";
pub const COL_LOAD_KW: &str = "Carga (kW)";
pub const COL_GENERATION_KW: &str = "Geração (kW)";
pub const COL_CAPACITY_KVA: &str = "Capacidade (kVA)";

pub const REQUIRED_COLUMNS: [&str; 5] = [
    COL_TRANSFORMER,
    COL_TIMESTAMP,
    COL_LOAD_KW,
    COL_GENERATION_KW,
    COL_CAPACITY_KVA,
];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error(
    "the file must contain the columns: {}; missing: {}",
    REQUIRED_COLUMNS.join(", "),
    .missing.join(", ")
)]
pub struct SchemaError {
    /// Required columns absent from the input, in required-set order.
    pub missing: Vec<String>,
}

/// Confirms the input frame's column schema before the engine touches it.
pub struct SchemaValidator;

impl SchemaValidator {
    /// Ok when the required set is a subset of the frame's columns.
    ///
    /// Only column presence is inspected; extra columns pass through and row
    /// contents are not looked at here.
    pub fn validate(df: &DataFrame) -> Result<(), SchemaError> {
        let present: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|required| !present.iter().any(|c| c == *required))
            .map(|required| required.to_string())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(SchemaError { missing })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(names: &[&str]) -> DataFrame {
        let columns: Vec<Column> = names
            .iter()
            .map(|name| Column::new((*name).into(), vec!["x"]))
            .collect();
        DataFrame::new(columns).unwrap()
    }

    #[test]
    fn full_schema_passes() {
        let df = frame(&REQUIRED_COLUMNS);
        assert!(SchemaValidator::validate(&df).is_ok());
    }

    #[test]
    fn extra_columns_are_ignored() {
        let mut names = REQUIRED_COLUMNS.to_vec();
        names.push("Região");
        assert!(SchemaValidator::validate(&frame(&names)).is_ok());
    }

    #[test]
    fn missing_column_is_reported() {
        let names: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|c| *c != COL_CAPACITY_KVA)
            .collect();
        let err = SchemaValidator::validate(&frame(&names)).unwrap_err();
        assert_eq!(err.missing, vec![COL_CAPACITY_KVA.to_string()]);
    }

    #[test]
    fn error_names_the_full_required_set() {
        let err = SchemaValidator::validate(&frame(&["foo"])).unwrap_err();
        let message = err.to_string();
        for required in REQUIRED_COLUMNS {
            assert!(message.contains(required), "message misses {required}");
        }
    }

    #[test]
    fn missing_order_follows_required_set() {
        let err = SchemaValidator::validate(&frame(&[COL_TIMESTAMP, COL_LOAD_KW])).unwrap_err();
        assert_eq!(
            err.missing,
            vec![
                COL_TRANSFORMER.to_string(),
                COL_GENERATION_KW.to_string(),
                COL_CAPACITY_KVA.to_string(),
            ]
        );
    }
}

use std::fmt;

use crate::model::Side;

#[derive(Debug)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (empty key column, duplicate rounded field, etc.).
    ConfigValidation(String),
    /// Fatal: the designated key column is absent from one side's schema.
    /// Aborts the run with no partial output.
    SchemaMismatch { side: Side, key: String },
    /// A cell in a numeric-rounded field cannot be coerced to a number.
    /// Recovered per field unless the run is strict.
    Comparison { row: usize, field: String, value: String },
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::SchemaMismatch { side, key } => {
                write!(f, "{side} side: key column '{key}' not found")
            }
            Self::Comparison { row, field, value } => {
                write!(f, "row {row}, field '{field}': cannot coerce '{value}' to a number")
            }
        }
    }
}

impl std::error::Error for ReconError {}

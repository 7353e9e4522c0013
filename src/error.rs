use crate::kind::FieldKind;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Input must be a record or a list of records, got {shape}")]
    InputShape { shape: String },

    #[error("Field '{field}': kind '{kind}' cannot be built from defaults")]
    UnrecognizedKind { field: String, kind: FieldKind },

    #[error("Unknown record type: {0}")]
    UnknownRecord(String),

    #[error("Invalid catalog: {0}")]
    Catalog(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
}

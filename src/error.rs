//! Error types for example validation

use std::path::PathBuf;

use thiserror::Error;

/// Result type for validation operations
pub type Result<T> = std::result::Result<T, ValidatorError>;

/// Fatal errors that stop a run before any example is reported.
///
/// Problems with individual examples are not errors; they are recorded as
/// outcomes on the [`RunResult`](crate::runner::RunResult).
#[derive(Error, Debug)]
pub enum ValidatorError {
    #[error("No schemas found in {}/.", dir.display())]
    NoSchemas { dir: PathBuf },

    #[error("Failed to read schema {}: {source}", path.display())]
    SchemaRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Schema is not valid JSON: {}: {source}", path.display())]
    SchemaParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Schema failed to compile: {}: {message}", path.display())]
    SchemaCompile { path: PathBuf, message: String },

    #[error("Prefix registered more than once: {0}")]
    DuplicatePrefix(String),

    #[error("Invalid prefix in schema table: {0:?}")]
    InvalidPrefix(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config_crate::ConfigError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_schemas_message() {
        let err = ValidatorError::NoSchemas { dir: PathBuf::from("schemas") };
        assert_eq!(err.to_string(), "No schemas found in schemas/.");
    }
}

use thiserror::Error;

/// A single field could not be interpreted by the mutator responsible for it.
///
/// Never fatal: the corruptor logs it, counts it and leaves the field as it was.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Field '{field}' has malformed value '{value}': {reason}")]
pub struct FieldFormatError {
    pub field: String,
    pub value: String,
    pub reason: String,
}

impl FieldFormatError {
    pub fn new(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }
}

/// Error types for noise injection runs
#[derive(Error, Debug)]
pub enum NoiseError {
    /// Invalid settings, detected before any mutation starts
    #[error("Configuration error: {0}")]
    Config(String),

    /// Identifier collision, missing identifier or ragged dataset
    #[error("Dataset integrity violation: {0}")]
    DatasetIntegrity(String),

    /// Malformed field value
    #[error(transparent)]
    FieldFormat(#[from] FieldFormatError),

    /// Malformed tabular input
    #[error("Malformed TSV input: {0}")]
    Tsv(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to parse settings: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("Failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result alias used throughout the crate
pub type NoiseResult<T> = Result<T, NoiseError>;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum VerdantError {
    #[error("Unknown sensor kind '{0}'")]
    UnknownSensorKind(String),

    #[error("Unsupported file format for '{0}' (expected .json, .yaml, .yml or .csv)")]
    UnsupportedFormat(String),

    #[error("I/O error for file '{0}': {1}")]
    FileIO(String, #[source] std::io::Error),

    #[error("Failed to parse YAML from '{0}': {1}")]
    YamlParsing(String, #[source] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParsing(#[from] serde_json::Error),

    #[error("Failed to process CSV file '{0}': {1}")]
    CsvError(String, #[source] csv::Error),
}

impl From<verdant_schemas::sensor::UnknownSensorKind> for VerdantError {
    fn from(err: verdant_schemas::sensor::UnknownSensorKind) -> Self {
        VerdantError::UnknownSensorKind(err.0)
    }
}

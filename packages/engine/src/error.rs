//! Error types for the tracking number engine

use thiserror::Error;

/// Main error type for engine operations
#[derive(Error, Debug)]
pub enum EngineError {
    /// No tracking number was supplied to the record constructor
    #[error("Missing tracking number")]
    MissingInput,

    /// Malformed courier definition (bad descriptor, unsupported layout)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A pattern in a courier definition failed to compile
    #[error("Invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: Box<regex::Error>,
    },

    /// Failed to load a courier definition file
    #[error("Failed to load courier definition: {0}")]
    LoadError(String),

    /// YAML parsing error
    #[error("YAML parse error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// IO error (file operations)
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl EngineError {
    /// Whether this error indicates a broken courier registry rather than bad caller input.
    ///
    /// Parse failures count as configuration errors: unknown checksum names and
    /// uncompilable patterns inside a definition surface through the parser.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            EngineError::Configuration(_)
                | EngineError::InvalidPattern { .. }
                | EngineError::YamlError(_)
                | EngineError::JsonError(_)
        )
    }
}

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

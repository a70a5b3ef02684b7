use thiserror::Error;

/// Store-wide error type.
///
/// Missing collection files and mutations that match nothing are not errors; they
/// surface as empty results and zero counts. Everything listed here is propagated
/// to the caller as-is, the store never retries.
#[derive(Error, Debug)]
pub enum StoreError {
    /// File-system operation failed (anything other than a missing collection file)
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// A collection file could not be parsed or a value could not be serialized
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    /// Filter rejected while parsing
    #[error("Invalid filter on field '{field}': {reason}")]
    InvalidFilter {
        field:  String,
        reason: String,
    },

    /// `$regex` pattern does not compile
    #[error("Invalid regular expression '{pattern}': {source}")]
    InvalidRegex {
        pattern: String,
        #[source]
        source:  regex::Error,
    },

    /// Update argument rejected while parsing
    #[error("Invalid update: {reason}")]
    InvalidUpdate {
        reason: String,
    },

    /// Sort specification rejected while parsing
    #[error("Invalid sort specification: {reason}")]
    InvalidSort {
        reason: String,
    },

    /// Aggregation pipeline rejected while parsing
    #[error("Invalid pipeline: {reason}")]
    InvalidPipeline {
        reason: String,
    },

    /// Insert payload is not a JSON object
    #[error("Invalid document: {reason}")]
    InvalidDocument {
        reason: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        message: String,
    },
}

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

//! Error types and handling for thai-address.

/// Result type alias for thai-address operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for thai-address operations.
///
/// Only construction paths (loading data files and building a generation)
/// return these. Queries never fail: "not found" is an empty `Vec` or `None`.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Data management errors
    #[error("Data error: {message}")]
    DataError {
        /// Error message
        message: String,
    },

    /// Corrupt gazetteer or word table
    #[error("Malformed data: {message}")]
    MalformedData {
        /// Error message
        message: String,
    },

    /// Geo overlay slot count does not line up with the gazetteer
    #[error("Geo overlay misaligned: expected {expected} slots, found {actual}")]
    GeoMisaligned {
        /// Number of hierarchy nodes (provinces + districts + sub-districts)
        expected: usize,
        /// Number of slots in the overlay
        actual: usize,
    },

    /// JSON decoding errors
    #[error("JSON error: {source}")]
    Json {
        /// Source error
        #[from]
        source: serde_json::Error,
    },

    /// I/O errors
    #[error("I/O error: {source}")]
    IoError {
        /// Source error
        #[from]
        source: std::io::Error,
    },
}

impl Error {
    /// Create a new data error
    pub fn data_error(message: impl Into<String>) -> Self {
        Self::DataError {
            message: message.into(),
        }
    }

    /// Create a new malformed data error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedData {
            message: message.into(),
        }
    }
}

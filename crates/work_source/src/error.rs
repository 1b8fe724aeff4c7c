//! Work source error types

use thiserror::Error;

/// Source errors
#[derive(Debug, Error)]
pub enum SourceError {
    /// Malformed input document
    #[error("failed to decode document: {message}")]
    Decode {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// Document could not be read
    #[error("failed to read document '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl SourceError {
    pub fn decode(source: serde_json::Error) -> Self {
        Self::Decode {
            message: source.to_string(),
            source,
        }
    }

    pub fn read(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    /// True if the document itself was malformed
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }
}

/// Source Result alias
pub type Result<T> = std::result::Result<T, SourceError>;

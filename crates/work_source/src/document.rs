//! JSON document decoding

use std::path::Path;

use contracts::{Batch, InputDocument};
use tracing::{debug, instrument};

use crate::error::{Result, SourceError};

/// Decodes input documents into batches
///
/// Stateless; every call decodes independently.
pub struct DocumentSource;

impl DocumentSource {
    /// Decode the full document
    ///
    /// # Errors
    /// `SourceError::Decode` if the document is not valid JSON or a node is
    /// missing `name`/`url`.
    pub fn decode_document(content: &str) -> Result<InputDocument> {
        serde_json::from_str(content).map_err(SourceError::decode)
    }

    /// Decode a document straight into a batch
    #[instrument(name = "source_decode", skip(content), fields(bytes = content.len()))]
    pub fn decode(content: &str) -> Result<Batch> {
        let document = Self::decode_document(content)?;
        let batch = document.into_batch();
        debug!(items = batch.len(), "Document decoded");
        Ok(batch)
    }

    /// Read and decode a document file
    pub fn load_from_path(path: &Path) -> Result<InputDocument> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SourceError::read(path.display().to_string(), e))?;
        Self::decode_document(&content)
    }
}

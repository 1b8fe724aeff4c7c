//! Command implementations.

mod info;
mod run;
mod validate;

use std::path::Path;

use anyhow::{Context, Result};
use work_source::{DocumentSource, InputDocument, SAMPLE_DOCUMENT};

pub use info::run_info;
pub use run::run_batch;
pub use validate::run_validate;

/// Read the raw document, falling back to the built-in sample
fn read_document(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read document {}", path.display())),
        None => Ok(SAMPLE_DOCUMENT.to_string()),
    }
}

/// Read and decode the document, falling back to the built-in sample
fn load_document(path: Option<&Path>) -> Result<InputDocument> {
    let content = read_document(path)?;
    DocumentSource::decode_document(&content).context("Failed to decode document")
}

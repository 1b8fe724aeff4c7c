//! # Work Source
//!
//! WorkItem Source module.
//!
//! Responsibilities:
//! - Decode the input document (JSON)
//! - Extract `nodes[]` into an ordered `Batch` of `WorkItem`s
//! - Tolerate decorative fields, present or absent
//!
//! ## Usage Example
//!
//! ```ignore
//! use work_source::DocumentSource;
//!
//! let batch = DocumentSource::decode(json)?;
//! for item in &batch {
//!     println!("{} -> {}", item.label(), item.target());
//! }
//! ```

mod document;
mod error;
mod sample;

pub use contracts::{Batch, InputDocument, WorkItem};
pub use document::DocumentSource;
pub use error::{Result, SourceError};
pub use sample::SAMPLE_DOCUMENT;

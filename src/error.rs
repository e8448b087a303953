//! Error types for the Verst library.
//!
//! All failures are represented by the [`VerstError`] enum. Errors that can
//! be attributed to a single document carry the offending document id and
//! field so user-visible messages are distinct from "no results" and from
//! usage errors.
//!
//! # Examples
//!
//! ```
//! use verst::error::{Result, VerstError};
//!
//! fn example_operation() -> Result<()> {
//!     Err(VerstError::pagination("pagesize must be > 0"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for Verst operations.
#[derive(Error, Debug)]
pub enum VerstError {
    /// I/O errors (index file, query log, output stream)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed or missing stored attribute on a specific document
    #[error("parse error in document {doc_id}, field '{field}': {msg}")]
    Parse {
        /// Id of the offending document.
        doc_id: u64,
        /// Name of the stored attribute slot.
        field: String,
        /// What was wrong with the stored value.
        msg: String,
    },

    /// Value outside the sort key encoder's representable range
    #[error("range error: {0}")]
    Range(String),

    /// Invalid pagination input (negative offset, non-positive pagesize)
    #[error("invalid pagination: {0}")]
    Pagination(String),

    /// Invalid geographic coordinate
    #[error("geo error: {0}")]
    Geo(String),

    /// Query-related errors (empty query, no searchable terms)
    #[error("query error: {0}")]
    Query(String),

    /// Index-related errors (malformed lines, duplicate ids)
    #[error("index error: {0}")]
    Index(String),

    /// Generic anyhow error
    #[error("error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with VerstError.
pub type Result<T> = std::result::Result<T, VerstError>;

impl VerstError {
    /// Create a new parse error for a document's stored attribute.
    pub fn parse<F: Into<String>, M: Into<String>>(doc_id: u64, field: F, msg: M) -> Self {
        VerstError::Parse {
            doc_id,
            field: field.into(),
            msg: msg.into(),
        }
    }

    /// Create a new range error.
    pub fn range<S: Into<String>>(msg: S) -> Self {
        VerstError::Range(msg.into())
    }

    /// Create a new pagination error.
    pub fn pagination<S: Into<String>>(msg: S) -> Self {
        VerstError::Pagination(msg.into())
    }

    /// Create a new geo error.
    pub fn geo<S: Into<String>>(msg: S) -> Self {
        VerstError::Geo(msg.into())
    }

    /// Create a new query error.
    pub fn query<S: Into<String>>(msg: S) -> Self {
        VerstError::Query(msg.into())
    }

    /// Create a new index error.
    pub fn index<S: Into<String>>(msg: S) -> Self {
        VerstError::Index(msg.into())
    }
}

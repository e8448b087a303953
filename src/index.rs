//! Reading stored documents from a JSON-lines index file.
//!
//! This is the storage half of the external query-execution contract: a flat
//! file with one document per line. Each document has a positive integer
//! `id` unique within the index, a `values` map of stored attribute slots
//! (the coordinate attribute lives in one of these as `"lat,lon"` text), and
//! an opaque `data` payload that only the output formatter interprets.
//! Index construction and on-disk inverted-index formats are out of scope.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{Result, VerstError};

/// Default name of the stored attribute slot holding the coordinate text.
pub const COORDINATE_FIELD: &str = "coordinates";

/// A stored document: id, attribute slots, and opaque payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredDocument {
    /// Document id, positive and unique within the index.
    pub id: u64,
    /// Stored attribute slots (e.g. the serialized coordinate).
    #[serde(default)]
    pub values: AHashMap<String, String>,
    /// Opaque structured metadata used only by the formatter.
    #[serde(default)]
    pub data: serde_json::Value,
}

impl StoredDocument {
    /// Get the stored value at the given attribute slot.
    pub fn value(&self, slot: &str) -> Option<&str> {
        self.values.get(slot).map(String::as_str)
    }
}

/// An open index of stored documents.
#[derive(Debug)]
pub struct Index {
    docs: Vec<StoredDocument>,
    by_id: AHashMap<u64, usize>,
}

impl Index {
    /// Open an index from a JSON-lines file.
    ///
    /// Blank lines are skipped. A line that is not a valid document, a
    /// non-positive id, or a duplicate id is an index error naming the line.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Index> {
        let file = File::open(path.as_ref())?;
        let reader = BufReader::new(file);

        let mut docs = Vec::new();
        let mut by_id = AHashMap::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            let doc: StoredDocument = serde_json::from_str(&line).map_err(|e| {
                VerstError::index(format!("malformed document on line {}: {e}", line_num + 1))
            })?;

            if doc.id == 0 {
                return Err(VerstError::index(format!(
                    "document id must be positive (line {})",
                    line_num + 1
                )));
            }
            if by_id.contains_key(&doc.id) {
                return Err(VerstError::index(format!(
                    "duplicate document id {} (line {})",
                    doc.id,
                    line_num + 1
                )));
            }

            by_id.insert(doc.id, docs.len());
            docs.push(doc);
        }

        Ok(Index { docs, by_id })
    }

    /// Build an index from already-materialized documents. Used by tests
    /// and embedding callers that do not read from a file.
    pub fn from_documents(docs: Vec<StoredDocument>) -> Result<Index> {
        let mut by_id = AHashMap::with_capacity(docs.len());
        for (pos, doc) in docs.iter().enumerate() {
            if doc.id == 0 {
                return Err(VerstError::index("document id must be positive"));
            }
            if by_id.insert(doc.id, pos).is_some() {
                return Err(VerstError::index(format!("duplicate document id {}", doc.id)));
            }
        }
        Ok(Index { docs, by_id })
    }

    /// Look up a document by id.
    pub fn doc(&self, id: u64) -> Option<&StoredDocument> {
        self.by_id.get(&id).map(|&pos| &self.docs[pos])
    }

    /// Number of documents in the index.
    pub fn len(&self) -> usize {
        self.docs.len()
    }

    /// Whether the index holds no documents.
    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Iterate over all stored documents in file order.
    pub fn iter(&self) -> impl Iterator<Item = &StoredDocument> {
        self.docs.iter()
    }
}

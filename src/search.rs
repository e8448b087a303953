//! Free-text query execution over an open index.
//!
//! Deliberately thin: tokenize the query, score documents by term overlap
//! with their payload text, and return matches ordered by descending
//! relevance. The interesting ordering work (distance keys, tie-breaking,
//! pagination) happens in [`crate::ranking`], which consumes the matches
//! produced here.

use serde::{Deserialize, Serialize};

use crate::error::{Result, VerstError};
use crate::index::Index;

/// A matched document paired with its relevance score.
///
/// The position in the returned vector is the pre-reorder relevance rank.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Match {
    /// The document id.
    pub doc_id: u64,
    /// The relevance score (higher = more relevant).
    pub score: f32,
}

/// Executes free-text queries against an index.
#[derive(Debug)]
pub struct Searcher<'a> {
    index: &'a Index,
}

impl<'a> Searcher<'a> {
    /// Create a searcher over an open index.
    pub fn new(index: &'a Index) -> Self {
        Searcher { index }
    }

    /// Execute a free-text query and return matches in descending relevance
    /// order. Terms are combined with OR semantics; a document matches if it
    /// contains at least one term. Zero matches is an empty vector, not an
    /// error.
    pub fn search(&self, querystring: &str) -> Result<Vec<Match>> {
        let terms = tokenize(querystring);
        if terms.is_empty() {
            return Err(VerstError::query(format!(
                "query '{querystring}' contains no searchable terms"
            )));
        }

        let total_docs = self.index.len() as f32;

        // Document frequency per term, for idf weighting.
        let mut doc_freq = vec![0usize; terms.len()];
        let doc_tokens: Vec<(u64, Vec<String>)> = self
            .index
            .iter()
            .map(|doc| (doc.id, tokenize(&payload_text(&doc.data))))
            .collect();

        for (_, tokens) in &doc_tokens {
            for (i, term) in terms.iter().enumerate() {
                if tokens.iter().any(|t| t == term) {
                    doc_freq[i] += 1;
                }
            }
        }

        let mut matches = Vec::new();
        for (doc_id, tokens) in &doc_tokens {
            let mut score = 0.0f32;
            for (i, term) in terms.iter().enumerate() {
                let tf = tokens.iter().filter(|t| *t == term).count() as f32;
                if tf > 0.0 {
                    let idf = (1.0 + total_docs / (1.0 + doc_freq[i] as f32)).ln();
                    score += tf * idf;
                }
            }
            if score > 0.0 {
                matches.push(Match {
                    doc_id: *doc_id,
                    score,
                });
            }
        }

        // Descending score, doc id ascending for a deterministic order.
        matches.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.doc_id.cmp(&b.doc_id))
        });

        Ok(matches)
    }
}

/// Lowercased alphanumeric word tokens.
fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Concatenate every string leaf of the payload for term matching.
fn payload_text(data: &serde_json::Value) -> String {
    let mut out = String::new();
    collect_strings(data, &mut out);
    out
}

fn collect_strings(value: &serde_json::Value, out: &mut String) {
    match value {
        serde_json::Value::String(s) => {
            out.push_str(s);
            out.push(' ');
        }
        serde_json::Value::Array(items) => {
            for item in items {
                collect_strings(item, out);
            }
        }
        serde_json::Value::Object(map) => {
            for item in map.values() {
                collect_strings(item, out);
            }
        }
        _ => {}
    }
}

//! # Verst
//!
//! Geographic re-ranking for full-text search results.
//!
//! Verst takes the matches produced by a full-text query and re-orders them
//! by proximity to a fixed reference point, falling back to textual relevance
//! for ties, then serves a deterministic page of the ordered result set.
//!
//! ## Features
//!
//! - Haversine great-circle distance between coordinate pairs
//! - Fixed-width, lexicographically sortable distance keys
//! - Pluggable per-match key functions via the [`ranking::KeyMaker`] trait
//! - Top-k ranking with deterministic tie-breaking and 0-indexed pagination
//! - Thin JSON-lines index reader and term searcher for end-to-end use

pub mod cli;
pub mod error;
pub mod geo;
pub mod index;
pub mod ranking;
pub mod search;
pub mod sort_key;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

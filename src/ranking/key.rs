//! Per-match sort key extraction.
//!
//! The ranking engine is generic over a [`KeyMaker`]: a named, stateless
//! key function that maps a match to its primary [`SortKey`]. The shipped
//! implementation, [`DistanceKeyMaker`], keys each match by the great-circle
//! distance between the document's stored coordinate and a fixed reference
//! point.

use crate::error::{Result, VerstError};
use crate::geo::GeoPoint;
use crate::index::Index;
use crate::search::Match;
use crate::sort_key::SortKey;

/// Produces the primary sort key for a match.
///
/// Implementations must be read-only and safe to call concurrently for
/// different matches; the engine may apply them in parallel.
pub trait KeyMaker: Send + Sync {
    /// Compute the sort key for a single match.
    fn key_for(&self, m: &Match) -> Result<SortKey>;
}

impl<F> KeyMaker for F
where
    F: Fn(&Match) -> Result<SortKey> + Send + Sync,
{
    fn key_for(&self, m: &Match) -> Result<SortKey> {
        self(m)
    }
}

/// Policy for documents whose coordinate attribute is missing or malformed.
///
/// Chosen once per key maker and applied uniformly. Neither option ever
/// treats a bad coordinate as distance zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoordinateFallback {
    /// Rank the document after all documents with valid coordinates,
    /// regardless of its relevance score.
    #[default]
    RankLast,
    /// Abort the whole ranking call with a parse error naming the document.
    Fail,
}

/// Keys each match by distance from its stored coordinate to a reference
/// point.
#[derive(Debug)]
pub struct DistanceKeyMaker<'a> {
    index: &'a Index,
    field: String,
    reference: GeoPoint,
    fallback: CoordinateFallback,
}

impl<'a> DistanceKeyMaker<'a> {
    /// Create a key maker reading the coordinate from the given attribute
    /// slot, with the default rank-last fallback.
    pub fn new<F: Into<String>>(index: &'a Index, field: F, reference: GeoPoint) -> Self {
        DistanceKeyMaker {
            index,
            field: field.into(),
            reference,
            fallback: CoordinateFallback::default(),
        }
    }

    /// Set the missing/malformed-coordinate policy.
    pub fn with_fallback(mut self, fallback: CoordinateFallback) -> Self {
        self.fallback = fallback;
        self
    }

    /// The reference point matches are ranked against.
    pub fn reference(&self) -> GeoPoint {
        self.reference
    }

    fn fall_back(&self, doc_id: u64, msg: String) -> Result<SortKey> {
        match self.fallback {
            CoordinateFallback::RankLast => Ok(SortKey::MAX),
            CoordinateFallback::Fail => Err(VerstError::parse(doc_id, self.field.clone(), msg)),
        }
    }
}

impl KeyMaker for DistanceKeyMaker<'_> {
    fn key_for(&self, m: &Match) -> Result<SortKey> {
        let stored = self.index.doc(m.doc_id).and_then(|doc| doc.value(&self.field));

        let text = match stored {
            Some(text) => text,
            None => {
                return self.fall_back(m.doc_id, "missing coordinate attribute".to_string());
            }
        };

        match GeoPoint::parse(text) {
            Ok(point) => SortKey::encode(self.reference.distance_to(&point)),
            Err(e) => self.fall_back(m.doc_id, e.to_string()),
        }
    }
}

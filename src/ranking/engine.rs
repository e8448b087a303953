//! The ranking and pagination engine.
//!
//! [`rank_and_page`] imposes a strict total order on a match set and
//! returns one page of it: primary sort key ascending, relevance score
//! descending for equal keys, document id ascending for equal keys and
//! scores.
//! The total order means repeated calls over the same input produce
//! byte-identical output.
//!
//! The full ordering is never materialized: a bounded max-heap keeps the
//! best `offset + pagesize` entries, which is externally indistinguishable
//! from a full sort.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{Result, VerstError};
use crate::ranking::key::KeyMaker;
use crate::search::Match;
use crate::sort_key::SortKey;

/// Match sets at least this large have their keys computed in parallel.
/// Key makers are read-only, and the heap stage re-imposes a deterministic
/// order, so the split has no observable effect.
const PARALLEL_KEY_THRESHOLD: usize = 1024;

/// A validated pagination request.
///
/// Construction is the API boundary where a negative offset or non-positive
/// pagesize is representable; both are rejected here, before any ranking
/// work. Past this point the fields are plain `usize`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    offset: usize,
    size: usize,
}

impl Page {
    /// Create a page request. `offset` must be >= 0 and `size` must be > 0;
    /// invalid values are errors, never clamped to a default.
    pub fn new(offset: i64, size: i64) -> Result<Page> {
        if offset < 0 {
            return Err(VerstError::pagination(format!(
                "offset must be >= 0, got {offset}"
            )));
        }
        if size <= 0 {
            return Err(VerstError::pagination(format!(
                "pagesize must be > 0, got {size}"
            )));
        }
        Ok(Page {
            offset: offset as usize,
            size: size as usize,
        })
    }

    /// 0-indexed starting position within the full ordering.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Maximum number of matches in the window.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of leading entries of the full ordering this page depends on.
    pub fn limit(&self) -> usize {
        self.offset.saturating_add(self.size)
    }
}

impl Default for Page {
    /// The first page of ten results.
    fn default() -> Self {
        Page { offset: 0, size: 10 }
    }
}

/// A match in its final position: 1-indexed absolute rank, id, score, and
/// the sort key that placed it there.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedMatch {
    /// Absolute position in the full ordering (1-indexed).
    pub rank: usize,
    /// The document id.
    pub doc_id: u64,
    /// The relevance score.
    pub score: f32,
    /// The primary sort key.
    pub distance_key: SortKey,
}

/// One page of the ordered result set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultWindow {
    /// The matches in final order, at most `pagesize` of them.
    pub matches: Vec<RankedMatch>,
    /// Total number of matches in the full (unpaged) result set.
    pub total_matches: usize,
    /// The requested offset.
    pub offset: usize,
    /// The requested pagesize.
    pub pagesize: usize,
}

impl ResultWindow {
    /// Document ids in final order, the audit-log record.
    pub fn doc_ids(&self) -> Vec<u64> {
        self.matches.iter().map(|m| m.doc_id).collect()
    }
}

/// A keyed match inside the selection heap.
#[derive(Debug, Clone)]
struct Entry {
    key: SortKey,
    score: f32,
    doc_id: u64,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.score == other.score && self.doc_id == other.doc_id
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    /// `Less` means "ranks earlier": key ascending, then score descending,
    /// then doc id ascending. With this order a max-heap's root is the
    /// worst-ranked entry it holds.
    fn cmp(&self, other: &Self) -> Ordering {
        self.key
            .cmp(&other.key)
            .then_with(|| {
                other
                    .score
                    .partial_cmp(&self.score)
                    .unwrap_or(Ordering::Equal)
            })
            .then_with(|| self.doc_id.cmp(&other.doc_id))
    }
}

/// Order the match set by the key maker and return the requested window.
///
/// Ranks in the window are 1-indexed absolute positions in the full
/// ordering. An offset at or past the end yields an empty window and a
/// final page may be partial; neither is an error. Any key computation
/// failure aborts the whole call, so a partial or corrupt ordering is never
/// returned.
pub fn rank_and_page(
    matches: &[Match],
    key_maker: &dyn KeyMaker,
    page: Page,
) -> Result<ResultWindow> {
    let total_matches = matches.len();

    let entries: Vec<Entry> = if total_matches >= PARALLEL_KEY_THRESHOLD {
        matches
            .par_iter()
            .map(|m| keyed_entry(m, key_maker))
            .collect::<Result<_>>()?
    } else {
        matches
            .iter()
            .map(|m| keyed_entry(m, key_maker))
            .collect::<Result<_>>()?
    };

    let limit = page.limit();
    let mut heap = BinaryHeap::with_capacity(limit.min(total_matches).saturating_add(1));
    for entry in entries {
        if heap.len() < limit {
            heap.push(entry);
        } else if let Some(worst) = heap.peek() {
            if entry < *worst {
                heap.pop();
                heap.push(entry);
            }
        }
    }

    let matches = heap
        .into_sorted_vec()
        .into_iter()
        .skip(page.offset())
        .take(page.size())
        .enumerate()
        .map(|(i, entry)| RankedMatch {
            rank: page.offset() + i + 1,
            doc_id: entry.doc_id,
            score: entry.score,
            distance_key: entry.key,
        })
        .collect();

    Ok(ResultWindow {
        matches,
        total_matches,
        offset: page.offset(),
        pagesize: page.size(),
    })
}

fn keyed_entry(m: &Match, key_maker: &dyn KeyMaker) -> Result<Entry> {
    Ok(Entry {
        key: key_maker.key_for(m)?,
        score: m.score,
        doc_id: m.doc_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(doc_id: u64, score: f32) -> Match {
        Match { doc_id, score }
    }

    /// Key maker backed by a fixed (doc_id, distance) table.
    fn table_keys(table: &[(u64, f64)]) -> impl KeyMaker + '_ {
        move |m: &Match| {
            let distance = table
                .iter()
                .find(|(id, _)| *id == m.doc_id)
                .map(|(_, d)| *d)
                .unwrap_or(f64::MAX);
            SortKey::encode(distance)
        }
    }

    #[test]
    fn test_page_validation() {
        assert!(Page::new(0, 10).is_ok());
        assert!(Page::new(5, 1).is_ok());

        // Rejected before any ranking work
        assert!(matches!(
            Page::new(-1, 10),
            Err(VerstError::Pagination(_))
        ));
        assert!(matches!(Page::new(0, 0), Err(VerstError::Pagination(_))));
        assert!(matches!(Page::new(0, -3), Err(VerstError::Pagination(_))));
    }

    #[test]
    fn test_nearer_documents_rank_first() {
        let table = [(1, 50.0), (2, 10.0), (3, 30.0)];
        let matches = [hit(1, 0.9), hit(2, 0.1), hit(3, 0.5)];

        let window = rank_and_page(&matches, &table_keys(&table), Page::default()).unwrap();
        assert_eq!(window.doc_ids(), vec![2, 3, 1]);
        assert_eq!(window.matches[0].rank, 1);
        assert_eq!(window.matches[0].distance_key.decode().unwrap(), 10.0);
    }

    #[test]
    fn test_ties_broken_by_relevance_then_doc_id() {
        // Distances 10, 10, 50 with scores 0.9, 0.7, 0.99: the near group
        // comes first, ordered by score descending.
        let table = [(1, 10.0), (2, 10.0), (3, 50.0)];
        let matches = [hit(1, 0.9), hit(2, 0.7), hit(3, 0.99)];

        let window = rank_and_page(&matches, &table_keys(&table), Page::default()).unwrap();
        assert_eq!(window.doc_ids(), vec![1, 2, 3]);

        // Equal key and score: doc id ascending.
        let table = [(7, 10.0), (4, 10.0), (5, 10.0)];
        let matches = [hit(7, 0.5), hit(4, 0.5), hit(5, 0.5)];
        let window = rank_and_page(&matches, &table_keys(&table), Page::default()).unwrap();
        assert_eq!(window.doc_ids(), vec![4, 5, 7]);
    }

    #[test]
    fn test_partial_final_window() {
        // offset=5, pagesize=10, 7 matches -> 2 elements, ranks 6 and 7
        let table: Vec<(u64, f64)> = (1..=7).map(|id| (id, id as f64)).collect();
        let matches: Vec<Match> = (1..=7).map(|id| hit(id, 1.0)).collect();

        let window =
            rank_and_page(&matches, &table_keys(&table), Page::new(5, 10).unwrap()).unwrap();
        assert_eq!(window.matches.len(), 2);
        assert_eq!(window.matches[0].rank, 6);
        assert_eq!(window.matches[1].rank, 7);
        assert_eq!(window.total_matches, 7);
    }

    #[test]
    fn test_offset_past_end_is_empty_not_error() {
        let table: Vec<(u64, f64)> = (1..=7).map(|id| (id, id as f64)).collect();
        let matches: Vec<Match> = (1..=7).map(|id| hit(id, 1.0)).collect();

        let window =
            rank_and_page(&matches, &table_keys(&table), Page::new(20, 10).unwrap()).unwrap();
        assert!(window.matches.is_empty());
        assert_eq!(window.total_matches, 7);
    }

    #[test]
    fn test_empty_match_set() {
        let window = rank_and_page(&[], &table_keys(&[]), Page::default()).unwrap();
        assert!(window.matches.is_empty());
        assert_eq!(window.total_matches, 0);
    }

    #[test]
    fn test_window_length_property() {
        let table: Vec<(u64, f64)> = (1..=25).map(|id| (id, id as f64)).collect();
        let matches: Vec<Match> = (1..=25).map(|id| hit(id, 1.0)).collect();

        for offset in [0i64, 5, 20, 24, 25, 40] {
            for size in [1i64, 7, 10, 30] {
                let page = Page::new(offset, size).unwrap();
                let window = rank_and_page(&matches, &table_keys(&table), page).unwrap();
                let expected = (matches.len().saturating_sub(offset as usize)).min(size as usize);
                assert_eq!(window.matches.len(), expected);
            }
        }
    }

    #[test]
    fn test_repeated_runs_are_identical() {
        let table = [(3, 5.0), (1, 5.0), (2, 5.0), (4, 1.0)];
        let matches = [hit(3, 0.5), hit(1, 0.5), hit(2, 0.8), hit(4, 0.1)];
        let maker = table_keys(&table);

        let first = rank_and_page(&matches, &maker, Page::default()).unwrap();
        let second = rank_and_page(&matches, &maker, Page::default()).unwrap();
        assert_eq!(first.doc_ids(), second.doc_ids());
        assert_eq!(first.doc_ids(), vec![4, 2, 1, 3]);
    }

    #[test]
    fn test_heap_selection_matches_full_sort() {
        // Large enough to cross the parallel threshold.
        let n = 3000u64;
        let table: Vec<(u64, f64)> = (1..=n).map(|id| (id, ((id * 7919) % 101) as f64)).collect();
        let matches: Vec<Match> = (1..=n).map(|id| hit(id, (id % 13) as f32)).collect();
        let maker = table_keys(&table);

        let paged = rank_and_page(&matches, &maker, Page::new(10, 5).unwrap()).unwrap();

        // Reference: full ordering via a window as large as the input.
        let full = rank_and_page(&matches, &maker, Page::new(0, n as i64).unwrap()).unwrap();
        assert_eq!(paged.doc_ids(), full.doc_ids()[10..15].to_vec());
    }

    #[test]
    fn test_key_error_aborts_whole_call() {
        let failing = |m: &Match| {
            if m.doc_id == 2 {
                Err(VerstError::parse(2, "coordinates", "missing"))
            } else {
                SortKey::encode(1.0)
            }
        };
        let matches = [hit(1, 0.5), hit(2, 0.5), hit(3, 0.5)];

        assert!(rank_and_page(&matches, &failing, Page::default()).is_err());
    }
}

//! Ordering and pagination of search matches by a caller-supplied sort key.

pub mod engine;
pub mod key;

pub use self::engine::{Page, RankedMatch, ResultWindow, rank_and_page};
pub use self::key::{CoordinateFallback, DistanceKeyMaker, KeyMaker};

//! Command line argument parsing for the Verst CLI using clap.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::index::COORDINATE_FIELD;
use crate::ranking::CoordinateFallback;

/// Verst - search an index and rank matches by distance to a reference point
#[derive(Parser, Debug, Clone)]
#[command(name = "verst")]
#[command(about = "Search an index, ranking matches by distance to a reference point")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct VerstArgs {
    /// Path to the JSON-lines index file
    pub index_path: PathBuf,

    /// Free-text query terms
    #[arg(required = true)]
    pub terms: Vec<String>,

    /// Starting position within the ordered result set (0-indexed)
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub offset: i64,

    /// Number of records per page
    #[arg(long, default_value_t = 10, allow_negative_numbers = true)]
    pub pagesize: i64,

    /// Stored attribute slot holding the "lat,lon" coordinate text
    #[arg(long, default_value = COORDINATE_FIELD)]
    pub coordinate_field: String,

    /// Reference point as "lat,lon" (defaults to Washington, DC)
    #[arg(long)]
    pub reference_point: Option<String>,

    /// Policy for documents with a missing or malformed coordinate
    #[arg(long, value_enum, default_value_t = FallbackArg::RankLast)]
    pub fallback: FallbackArg,

    /// File the query audit log is appended to
    #[arg(long, default_value = "search.log")]
    pub log_file: PathBuf,
}

impl VerstArgs {
    /// The query terms joined into one free-text query string.
    pub fn query_string(&self) -> String {
        self.terms.join(" ")
    }
}

/// CLI-facing coordinate fallback policy.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackArg {
    /// Rank documents without a usable coordinate last
    RankLast,
    /// Fail the whole query on the first bad coordinate
    Fail,
}

impl From<FallbackArg> for CoordinateFallback {
    fn from(arg: FallbackArg) -> Self {
        match arg {
            FallbackArg::RankLast => CoordinateFallback::RankLast,
            FallbackArg::Fail => CoordinateFallback::Fail,
        }
    }
}

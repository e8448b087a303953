//! Command line interface for Verst.

pub mod args;
pub mod output;

use std::io;

use crate::error::Result;
use crate::geo::{self, GeoPoint};
use crate::index::Index;
use crate::ranking::{DistanceKeyMaker, Page, rank_and_page};
use crate::search::Searcher;

use self::args::VerstArgs;
use self::output::{QueryLog, print_window};

/// Run one query end to end: open the index, search, rank by distance,
/// print the window, and append the audit record.
pub fn run(args: VerstArgs) -> Result<()> {
    let index = Index::open(&args.index_path)?;
    let searcher = Searcher::new(&index);

    let querystring = args.query_string();
    let matches = searcher.search(&querystring)?;

    let reference = match &args.reference_point {
        Some(text) => GeoPoint::parse(text)?,
        None => geo::WASHINGTON_DC,
    };
    let key_maker = DistanceKeyMaker::new(&index, &args.coordinate_field, reference)
        .with_fallback(args.fallback.into());

    let page = Page::new(args.offset, args.pagesize)?;
    let window = rank_and_page(&matches, &key_maker, page)?;

    let stdout = io::stdout();
    print_window(&window, &index, &mut stdout.lock())?;

    QueryLog::new(&args.log_file).log_matches(
        &querystring,
        window.offset,
        window.pagesize,
        &window.doc_ids(),
    )?;

    Ok(())
}

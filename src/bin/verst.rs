//! Verst CLI binary.

use std::process;

use clap::Parser;
use verst::cli::{self, args::VerstArgs};

fn main() {
    // Parse command line arguments using clap; missing arguments exit
    // non-zero with a usage message.
    let args = VerstArgs::parse();

    if let Err(e) = cli::run(args) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

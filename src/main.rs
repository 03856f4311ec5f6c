//! # cBioHub
//!
//! Command-line tool that ingests cancer genomics studies, combines them into a single
//! columnar store and answers variant queries against it.
//!
//! ## Usage
//!
//! ```bash
//! # Convert raw studies to per-study Parquet tables
//! cbiohub ingest ~/datahub/public
//!
//! # Build the combined store
//! cbiohub combine
//!
//! # Which samples carry TP53 p.R175H?
//! cbiohub find TP53 R175H
//!
//! # How often does a variant occur per cancer type?
//! cbiohub variant-frequency 17 7675088 7675088 C T
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}

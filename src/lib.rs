//! # cBioHub - A Combined Columnar Store for Cancer Genomics Studies
//!
//! `cbiohub` ingests independently produced cancer genomics studies (mutation calls
//! plus clinical patient and sample attributes), merges them into one columnar
//! snapshot per table category, and answers variant queries against that snapshot.
//!
//! ## Key Features
//!
//! - **Schema Promotion**: Studies disagree about column sets and physical types; the
//!   combiner unions their columns and widens types to a least upper bound instead of
//!   failing or dropping data.
//!
//! - **Fault Isolation**: A broken study is left out of its category and reported; a
//!   broken category is reported while the others are still written.
//!
//! - **Atomic Snapshots**: Combined tables are written to a temporary file and renamed
//!   into place, so queries always see a complete table.
//!
//! - **Predicate Pushdown**: Lookups decode only the predicate columns to select rows and
//!   only the output columns for matching rows.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cbiohub::combine::Combiner;
//! use cbiohub::config::StorePaths;
//! use cbiohub::loader::Loader;
//! use cbiohub::query::{find_variant, GeneKey, VariantKey};
//! use cbiohub::store::CombinedStore;
//!
//! let paths = StorePaths::new("~/cbiohub");
//!
//! // Convert raw study folders to per-study Parquet tables
//! let ingested = Loader::new(&paths).ingest("datahub/public", |_| {})?;
//! println!("{}", ingested);
//!
//! // Build the combined store
//! let report = Combiner::new(&paths).run()?;
//! println!("{}", report);
//!
//! // Query it
//! let store = CombinedStore::open(&paths);
//! let key = VariantKey::Gene(GeneKey::new("TP53", "R175H")?);
//! let result = find_variant(&store, &key)?;
//! println!("found in {} samples", result.sample_ids.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! This creates a directory structure:
//! ```text
//! ~/cbiohub/
//! ├── studies/<study_id>/       # Per-study tables + study_manifest.json
//! └── combined/                 # combined_{mutations,clinical_patient,clinical_sample}.parquet
//! ```
//!
//! ## Architecture
//!
//! - [`config`]: explicit storage layout shared by every component
//! - [`schema`]: canonical mutation schema, table categories, study manifest
//! - [`loader`]: raw tab-separated study folders to per-study Parquet
//! - [`study`]: per-study tables as the combiner sees them
//! - [`normalize`]: projection of one study table onto its canonical schema
//! - [`combine`]: schema promotion, concatenation and the combine run
//! - [`store`]: Parquet I/O for the combined store (pushdown scans, atomic writes, lock)
//! - [`query`]: point lookup, frequency aggregation, coordinate resolution
//!
//! ## File Footer Metadata
//!
//! Every combined table carries key-value metadata:
//!
//! - `cbiohub:format_version`: Format version string
//! - `cbiohub:category`: Table category
//! - `cbiohub:studies`: JSON array of contributing study ids
//! - `cbiohub:created_at`: RFC 3339 timestamp

// Documentation lints - enforce complete documentation for publication
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod combine;
pub mod config;
pub mod loader;
pub mod normalize;
pub mod query;
pub mod schema;
pub mod store;
pub mod study;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::combine::{CategoryOutcome, CombineError, CombineReport, Combiner};
    pub use crate::config::StorePaths;
    pub use crate::loader::{IngestReport, Loader, LoaderError, Study};
    pub use crate::normalize::{normalize_table, NormalizeError};
    pub use crate::query::{
        find_variant, resolve_coordinates, variant_frequency, CoordinateCount, CoordinateKey,
        FrequencyRow, GeneKey, LookupResult, QueryError, VariantArgs, VariantKey,
    };
    pub use crate::schema::{columns, create_mutation_schema, TableCategory};
    pub use crate::store::{CombinedStore, StoreWriterConfig};
    pub use crate::study::{ProcessedStudy, StudyTable};
}

//! # Combined Store I/O
//!
//! Reading and writing the Parquet tables of the combined store.
//!
//! ## Features
//!
//! - **Predicate Pushdown**: scans evaluate equality predicates inside the Parquet
//!   reader (`RowFilter`) and decode output columns only for matching rows
//! - **Atomic Snapshots**: tables are written to a temporary file and renamed into
//!   place, so a reader never sees a partial table
//! - **Single Writer**: a lock file keeps two combine runs off the same directory
//!
//! ## Example
//!
//! ```rust,no_run
//! use cbiohub::config::StorePaths;
//! use cbiohub::schema::{columns, TableCategory};
//! use cbiohub::store::{ColumnEquals, CombinedStore};
//!
//! let store = CombinedStore::open(&StorePaths::new("~/cbiohub"));
//! let predicates = [ColumnEquals::new(columns::HUGO_SYMBOL, "TP53")];
//! for batch in store.scan(TableCategory::Mutations, &predicates, &[columns::STUDY_ID])? {
//!     println!("{} matching rows", batch?.num_rows());
//! }
//! # Ok::<(), cbiohub::store::StoreError>(())
//! ```

mod config;
mod error;
mod lock;
mod predicate;
mod reader;
mod writer;

#[cfg(test)]
mod tests;

pub use config::{CompressionType, ReaderConfig, StoreWriterConfig};
pub use error::StoreError;
pub use lock::{LockState, StoreLock, LOCK_FILE};
pub use predicate::{evaluate_conjunction, ColumnEquals};
pub(crate) use predicate::as_text;
pub use reader::{CombinedStore, ScanIterator};
pub use writer::{write_table_atomic, WriteStats};

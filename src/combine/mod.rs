//! # Combiner
//!
//! Rebuilds the combined store: for each category, every processed study's table is
//! normalized, the schemas are promoted to their least upper bound, the tables are
//! concatenated and the result replaces the previous combined table atomically.
//!
//! ## Type Promotion
//!
//! | Left | Right | Result |
//! |------|-------|--------|
//! | T | T | T |
//! | Null | T | T |
//! | signed int | signed int | wider signed int |
//! | unsigned int | unsigned int | wider unsigned int |
//! | signed int | unsigned int | Int64 |
//! | int / float | float | Float64 |
//! | other scalar | other scalar | Utf8 |
//! | nested | anything else | error |
//!
//! Every promoted field is nullable; a column an input lacks is null for its rows.

mod combiner;
mod error;
mod promote;
mod report;


pub use combiner::Combiner;
pub use error::CombineError;
pub use promote::{
    concat_tables, ensure_study_id, least_upper_bound, promote_schemas, CombinedTable,
};
pub use report::{CategoryOutcome, CategorySummary, CombineReport, StudyIssue, StudyIssueKind};

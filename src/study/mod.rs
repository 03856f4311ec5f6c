//! # Per-Study Tables
//!
//! A [`StudyTable`] is one category of one study, exactly as the study loader wrote
//! it: arbitrary columns, arbitrary physical types. [`ProcessedStudy`] locates those
//! tables inside `<processed_root>/studies/<study_id>/`.

mod error;
mod processed;
mod table;

#[cfg(test)]
mod tests;

pub use error::StudyError;
pub use processed::{discover_studies, ProcessedStudy};
pub use table::StudyTable;

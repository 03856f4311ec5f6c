//! # Combined Store Schema Definition
//!
//! This module defines the Apache Arrow schema shared by the combiner and every
//! query over the combined store.
//!
//! ## Design Rationale
//!
//! Studies are produced independently and disagree about physical types: one study
//! stores `Start_Position` as an integer, another as text with leading zeros, a third
//! as a float. The canonical mutation schema therefore types *every* column as text,
//! and queries compare coordinates by exact text.
//!
//! ## Mutation Columns
//!
//! | Column | Type | Description |
//! |--------|------|-------------|
//! | Chromosome | Utf8 | Chromosome |
//! | Start_Position | Utf8 | Start position |
//! | End_Position | Utf8 | End position |
//! | Reference_Allele | Utf8 | Reference allele |
//! | Tumor_Seq_Allele1 | Utf8 | Tumor allele 1 |
//! | Tumor_Seq_Allele2 | Utf8 | Tumor allele 2 (alternate) |
//! | t_ref_count | Utf8 | Tumor reference reads |
//! | t_alt_count | Utf8 | Tumor alternate reads |
//! | n_ref_count | Utf8 | Normal reference reads |
//! | n_alt_count | Utf8 | Normal alternate reads |
//! | Hugo_Symbol | Utf8 | Gene symbol |
//! | HGVSp_Short | Utf8 | Protein change |
//! | Tumor_Sample_Barcode | Utf8 | Sample barcode |
//! | study_id | Utf8 | Study identifier |
//!
//! Clinical tables have an open schema: whatever attributes a study supplies are
//! carried through and unioned at combine time.

mod builders;
mod category;
/// Mutation and clinical column name constants.
pub mod columns;
mod constants;
pub mod manifest;
mod validation;

#[cfg(test)]
mod tests;

pub use builders::{create_mutation_schema, create_mutation_schema_arc};
pub use category::{CanonicalSchema, TableCategory};
pub use columns::*;
pub use constants::*;
pub use manifest::{ManifestTable, StudyManifest};
pub use validation::{validate_mutation_schema, SchemaValidationError};

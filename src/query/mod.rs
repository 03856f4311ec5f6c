//! # Variant Queries
//!
//! Read-only queries over the combined store:
//!
//! - [`find_variant`]: which samples carry a variant (coordinate or gene mode)
//! - [`variant_frequency`]: how often a variant occurs per clinical attribute value
//! - [`resolve_coordinates`]: which genomic coordinates a gene-level variant maps to
//!
//! Every query is a predicate-pushdown scan: caller values become [`ColumnEquals`]
//! predicates evaluated by Arrow kernels and are never interpolated into query text.
//!
//! [`ColumnEquals`]: crate::store::ColumnEquals

mod error;
mod frequency;
mod lookup;
mod resolve;
mod variant;

#[cfg(test)]
mod tests;

use arrow::array::{Array, StringArray};
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;

pub use error::QueryError;
pub use frequency::{variant_frequency, FrequencyRow};
pub use lookup::{find_variant, LookupResult};
pub use resolve::{resolve_coordinates, CoordinateCount};
pub use variant::{normalize_protein_change, CoordinateKey, GeneKey, VariantArgs, VariantKey};

/// Text rendering of a projected column.
pub(crate) fn text_column(batch: &RecordBatch, name: &str) -> Result<StringArray, QueryError> {
    let column = batch
        .column_by_name(name)
        .ok_or_else(|| ArrowError::SchemaError(format!("column '{}' not projected", name)))?;
    let text = crate::store::as_text(column)?;
    text.as_any()
        .downcast_ref::<StringArray>()
        .cloned()
        .ok_or_else(|| {
            QueryError::ArrowError(ArrowError::CastError(format!(
                "column '{}' is not text",
                name
            )))
        })
}

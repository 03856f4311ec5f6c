use std::sync::Arc;

use arrow::array::{Array, ArrayRef, BooleanArray, StringArray};
use arrow::compute::kernels::cmp::eq;
use arrow::compute::{and, cast};
use arrow::datatypes::DataType;
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;

/// Exact text equality between a column and a bound value.
///
/// Values are never spliced into query text; they are compared by the Arrow
/// comparison kernel against a scalar. Non-text columns are compared through
/// their text rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnEquals {
    /// Column to compare
    pub column: String,
    /// Value the column must equal
    pub value: String,
}

impl ColumnEquals {
    /// Create an equality predicate
    pub fn new(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
        }
    }
}

/// Evaluate the conjunction of `predicates` over `batch`.
///
/// Null cells never match. An empty conjunction selects every row.
pub fn evaluate_conjunction(
    batch: &RecordBatch,
    predicates: &[ColumnEquals],
) -> Result<BooleanArray, ArrowError> {
    let mut selection: Option<BooleanArray> = None;

    for predicate in predicates {
        let column = batch.column_by_name(&predicate.column).ok_or_else(|| {
            ArrowError::SchemaError(format!("predicate column '{}' not in batch", predicate.column))
        })?;
        let column = as_text(column)?;
        let matches = eq(&column, &StringArray::new_scalar(predicate.value.as_str()))?;

        selection = Some(match selection {
            None => matches,
            Some(previous) => and(&previous, &matches)?,
        });
    }

    Ok(selection.unwrap_or_else(|| BooleanArray::from(vec![true; batch.num_rows()])))
}

/// Cast a column to `Utf8` unless it already is.
pub(crate) fn as_text(column: &ArrayRef) -> Result<ArrayRef, ArrowError> {
    if column.data_type() == &DataType::Utf8 {
        Ok(Arc::clone(column))
    } else {
        cast(column, &DataType::Utf8)
    }
}

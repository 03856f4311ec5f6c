//! # Schema Normalizer
//!
//! Projects one [`StudyTable`] onto the canonical schema of its category.
//!
//! For a fixed schema (mutations) only the canonical columns physically present in
//! the source are kept, in canonical order, each cast to its canonical type. Columns
//! the source lacks are *not* added here; the combiner backfills them with nulls.
//! For an open schema (clinical tables) the table passes through unchanged.
//!
//! Nested columns are rejected in both cases since they can neither be cast to text
//! nor promoted against other studies.

mod error;


use std::sync::Arc;

use arrow::array::ArrayRef;
use arrow::compute::{can_cast_types, cast};
use arrow::datatypes::{DataType, Field, FieldRef, Schema};
use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use log::debug;

use crate::schema::CanonicalSchema;
use crate::study::StudyTable;

pub use error::NormalizeError;

/// Normalize a table against its category's canonical schema.
pub fn normalize_table(table: StudyTable) -> Result<StudyTable, NormalizeError> {
    let canonical = table.category().canonical_schema();
    normalize_to(table, &canonical)
}

/// Normalize a table against an explicit canonical schema.
pub fn normalize_to(
    table: StudyTable,
    canonical: &CanonicalSchema,
) -> Result<StudyTable, NormalizeError> {
    reject_nested(&table)?;

    match canonical {
        CanonicalSchema::Open => Ok(table),
        CanonicalSchema::Fixed(target) => project_and_cast(table, target),
    }
}

fn reject_nested(table: &StudyTable) -> Result<(), NormalizeError> {
    let schema = table.schema();
    match schema.fields().iter().find(|f| f.data_type().is_nested()) {
        Some(field) => Err(NormalizeError::NestedColumn {
            study_id: table.study_id().to_string(),
            column: field.name().clone(),
            data_type: format!("{:?}", field.data_type()),
        }),
        None => Ok(()),
    }
}

fn project_and_cast(table: StudyTable, target: &Schema) -> Result<StudyTable, NormalizeError> {
    let source = table.schema();

    // (source index, canonical field) for every canonical column the source supplies
    let mut plan: Vec<(usize, FieldRef)> = Vec::new();
    for field in target.fields() {
        let Ok(idx) = source.index_of(field.name()) else {
            continue;
        };
        let from = source.field(idx).data_type();
        if !can_cast_types(from, field.data_type()) {
            return Err(NormalizeError::UnsupportedCast {
                study_id: table.study_id().to_string(),
                column: field.name().clone(),
                from: format!("{:?}", from),
                to: format!("{:?}", field.data_type()),
            });
        }
        plan.push((idx, Arc::clone(field)));
    }

    let fields: Vec<Field> = plan
        .iter()
        .map(|(_, f)| f.as_ref().clone().with_nullable(true))
        .collect();
    let schema = Arc::new(Schema::new_with_metadata(fields, target.metadata().clone()));

    let (study_id, category, _, batches) = table.into_parts();
    let mut normalized = Vec::with_capacity(batches.len());
    for batch in batches {
        let columns = plan
            .iter()
            .map(|(idx, field)| cast_column(batch.column(*idx), field.data_type()))
            .collect::<Result<Vec<_>, _>>()?;
        // Row count is explicit so tables with zero retained columns keep their length
        let options = RecordBatchOptions::new().with_row_count(Some(batch.num_rows()));
        normalized.push(RecordBatch::try_new_with_options(
            Arc::clone(&schema),
            columns,
            &options,
        )?);
    }

    debug!(
        "Normalized {} table of {}: kept {} of {} canonical columns",
        category,
        study_id,
        schema.fields().len(),
        target.fields().len()
    );

    Ok(StudyTable::new(study_id, category, schema, normalized)?)
}

fn cast_column(array: &ArrayRef, to: &DataType) -> Result<ArrayRef, NormalizeError> {
    if array.data_type() == to {
        return Ok(Arc::clone(array));
    }
    Ok(cast(array, to)?)
}

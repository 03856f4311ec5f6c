use std::collections::HashMap;
use std::sync::Arc;

use arrow::array::{new_null_array, Array, ArrayRef, StringArray};
use arrow::compute::{can_cast_types, cast};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::record_batch::{RecordBatch, RecordBatchOptions};

use crate::schema::{columns, CanonicalSchema, TableCategory};
use crate::study::StudyTable;

use super::CombineError;

/// Concatenation of every study table of one category
#[derive(Debug, Clone)]
pub struct CombinedTable {
    category: TableCategory,
    schema: SchemaRef,
    batches: Vec<RecordBatch>,
    studies: Vec<String>,
}

impl CombinedTable {
    /// Table category
    pub fn category(&self) -> TableCategory {
        self.category
    }

    /// Promoted schema (union of every input's columns)
    pub fn schema(&self) -> SchemaRef {
        SchemaRef::clone(&self.schema)
    }

    /// Aligned batches in input order
    pub fn batches(&self) -> &[RecordBatch] {
        &self.batches
    }

    /// Contributing study ids in input order
    pub fn studies(&self) -> &[String] {
        &self.studies
    }

    /// Total number of rows
    pub fn num_rows(&self) -> usize {
        self.batches.iter().map(|b| b.num_rows()).sum()
    }
}

fn integer_bits(data_type: &DataType) -> Option<(bool, u8)> {
    match data_type {
        DataType::Int8 => Some((true, 8)),
        DataType::Int16 => Some((true, 16)),
        DataType::Int32 => Some((true, 32)),
        DataType::Int64 => Some((true, 64)),
        DataType::UInt8 => Some((false, 8)),
        DataType::UInt16 => Some((false, 16)),
        DataType::UInt32 => Some((false, 32)),
        DataType::UInt64 => Some((false, 64)),
        _ => None,
    }
}

fn integer_type(signed: bool, bits: u8) -> DataType {
    match (signed, bits) {
        (true, 8) => DataType::Int8,
        (true, 16) => DataType::Int16,
        (true, 32) => DataType::Int32,
        (false, 8) => DataType::UInt8,
        (false, 16) => DataType::UInt16,
        (false, 32) => DataType::UInt32,
        (false, 64) => DataType::UInt64,
        _ => DataType::Int64,
    }
}

/// Least upper bound of two column types, or `None` if they cannot be reconciled.
///
/// - identical types and `Null` unify trivially
/// - integers widen within their signedness; mixed signedness widens to `Int64`
/// - integers and floats widen to `Float64`
/// - any other pair of scalar types meets at `Utf8`
/// - nested types only unify with an identical type
pub fn least_upper_bound(left: &DataType, right: &DataType) -> Option<DataType> {
    if left == right {
        return Some(left.clone());
    }
    match (left, right) {
        (DataType::Null, other) | (other, DataType::Null) => return Some(other.clone()),
        _ => {}
    }
    if left.is_nested() || right.is_nested() {
        return None;
    }

    if let (Some((ls, lb)), Some((rs, rb))) = (integer_bits(left), integer_bits(right)) {
        return Some(if ls == rs {
            integer_type(ls, lb.max(rb))
        } else {
            DataType::Int64
        });
    }
    if left.is_numeric() && right.is_numeric() {
        return Some(DataType::Float64);
    }

    if can_cast_types(left, &DataType::Utf8) && can_cast_types(right, &DataType::Utf8) {
        Some(DataType::Utf8)
    } else {
        None
    }
}

/// Union of `schemas` in first-seen column order with widened, nullable fields.
pub fn promote_schemas<'a, I>(schemas: I) -> Result<Schema, CombineError>
where
    I: IntoIterator<Item = &'a Schema>,
{
    let mut order: Vec<String> = Vec::new();
    let mut types: HashMap<String, DataType> = HashMap::new();

    for schema in schemas {
        for field in schema.fields() {
            match types.get_mut(field.name()) {
                None => {
                    order.push(field.name().clone());
                    types.insert(field.name().clone(), field.data_type().clone());
                }
                Some(current) => {
                    let widened = least_upper_bound(current, field.data_type()).ok_or_else(|| {
                        CombineError::SchemaPromotion {
                            column: field.name().clone(),
                            left: format!("{:?}", current),
                            right: format!("{:?}", field.data_type()),
                        }
                    })?;
                    *current = widened;
                }
            }
        }
    }

    let fields: Vec<Field> = order
        .into_iter()
        .map(|name| {
            let data_type = types.remove(&name).unwrap_or(DataType::Null);
            Field::new(name, data_type, true)
        })
        .collect();
    Ok(Schema::new(fields))
}

/// Reorder `schema` so canonical columns come first, in canonical order.
fn order_like(schema: Schema, canonical: &CanonicalSchema) -> Schema {
    let CanonicalSchema::Fixed(target) = canonical else {
        return schema;
    };
    let mut fields: Vec<Arc<Field>> = schema.fields().iter().cloned().collect();
    fields.sort_by_key(|f| target.index_of(f.name()).unwrap_or(usize::MAX));
    Schema::new_with_metadata(fields, target.metadata().clone())
}

fn align_batch(batch: &RecordBatch, schema: &SchemaRef) -> Result<RecordBatch, CombineError> {
    let rows = batch.num_rows();
    let columns = schema
        .fields()
        .iter()
        .map(|field| -> Result<ArrayRef, CombineError> {
            match batch.column_by_name(field.name()) {
                Some(column) if column.data_type() == field.data_type() => Ok(Arc::clone(column)),
                Some(column) => Ok(cast(column, field.data_type())?),
                None => Ok(new_null_array(field.data_type(), rows)),
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    let options = RecordBatchOptions::new().with_row_count(Some(rows));
    Ok(RecordBatch::try_new_with_options(
        SchemaRef::clone(schema),
        columns,
        &options,
    )?)
}

/// Stamp the owning study id onto mutation rows lacking one.
///
/// Adds a `study_id` column when absent and replaces null or empty values.
pub fn ensure_study_id(table: StudyTable) -> Result<StudyTable, CombineError> {
    let (study_id, category, schema, batches) = table.into_parts();

    let mut fields: Vec<Arc<Field>> = schema.fields().iter().cloned().collect();
    let existing = schema.index_of(columns::STUDY_ID).ok();
    match existing {
        Some(idx) => fields[idx] = Arc::new(Field::new(columns::STUDY_ID, DataType::Utf8, true)),
        None => fields.push(Arc::new(Field::new(columns::STUDY_ID, DataType::Utf8, true))),
    }
    let stamped_schema = Arc::new(Schema::new_with_metadata(fields, schema.metadata().clone()));

    let mut stamped = Vec::with_capacity(batches.len());
    for batch in batches {
        let rows = batch.num_rows();
        let ids: StringArray = match existing {
            Some(idx) => {
                let current = crate::store::as_text(batch.column(idx))?;
                let current = current
                    .as_any()
                    .downcast_ref::<StringArray>()
                    .cloned()
                    .unwrap_or_else(|| StringArray::from(vec![None::<&str>; rows]));
                current
                    .iter()
                    .map(|v| match v {
                        Some(v) if !v.is_empty() => Some(v.to_string()),
                        _ => Some(study_id.clone()),
                    })
                    .collect()
            }
            None => std::iter::repeat(Some(study_id.as_str())).take(rows).collect(),
        };

        let mut columns: Vec<ArrayRef> = batch.columns().to_vec();
        match existing {
            Some(idx) => columns[idx] = Arc::new(ids),
            None => columns.push(Arc::new(ids)),
        }
        let options = RecordBatchOptions::new().with_row_count(Some(rows));
        stamped.push(RecordBatch::try_new_with_options(
            Arc::clone(&stamped_schema),
            columns,
            &options,
        )?);
    }

    Ok(StudyTable::new(study_id, category, stamped_schema, stamped)?)
}

/// Concatenate normalized tables of one category under a promoted schema.
///
/// The result's columns are the union of the inputs' columns and its row count is the
/// sum of theirs; columns an input lacks are null for that input's rows.
pub fn concat_tables(
    category: TableCategory,
    tables: Vec<StudyTable>,
) -> Result<CombinedTable, CombineError> {
    let schemas: Vec<SchemaRef> = tables.iter().map(|t| t.schema()).collect();
    let promoted = promote_schemas(schemas.iter().map(|s| s.as_ref()))?;
    let schema = Arc::new(order_like(promoted, &category.canonical_schema()));

    let mut batches = Vec::new();
    let mut studies = Vec::with_capacity(tables.len());
    for table in &tables {
        for batch in table.batches() {
            batches.push(align_batch(batch, &schema)?);
        }
        studies.push(table.study_id().to_string());
    }

    Ok(CombinedTable {
        category,
        schema,
        batches,
        studies,
    })
}

use std::fs::File;
use std::path::Path;

use arrow::datatypes::SchemaRef;
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use crate::schema::TableCategory;
use crate::store::ReaderConfig;

use super::StudyError;

/// One per-study, per-category table.
///
/// Column set and physical types are whatever the producer wrote; the normalizer
/// and the combiner reconcile them. A table is immutable once built.
#[derive(Debug, Clone)]
pub struct StudyTable {
    study_id: String,
    category: TableCategory,
    schema: SchemaRef,
    batches: Vec<RecordBatch>,
}

impl StudyTable {
    /// Build a table from record batches sharing `schema`.
    pub fn new(
        study_id: impl Into<String>,
        category: TableCategory,
        schema: SchemaRef,
        batches: Vec<RecordBatch>,
    ) -> Result<Self, StudyError> {
        let study_id = study_id.into();
        for batch in &batches {
            if batch.schema().fields() != schema.fields() {
                return Err(StudyError::SchemaMismatch {
                    study_id,
                    message: format!(
                        "{} batch fields {:?} differ from table fields {:?}",
                        category,
                        batch.schema().fields(),
                        schema.fields()
                    ),
                });
            }
        }

        Ok(Self {
            study_id,
            category,
            schema,
            batches,
        })
    }

    /// Build a single-batch table, taking the schema from the batch.
    pub fn from_batch(
        study_id: impl Into<String>,
        category: TableCategory,
        batch: RecordBatch,
    ) -> Self {
        Self {
            study_id: study_id.into(),
            category,
            schema: batch.schema(),
            batches: vec![batch],
        }
    }

    /// Read a whole Parquet file into memory.
    pub fn read_parquet<P: AsRef<Path>>(
        path: P,
        study_id: impl Into<String>,
        category: TableCategory,
        config: &ReaderConfig,
    ) -> Result<Self, StudyError> {
        let file = File::open(path.as_ref())?;
        let builder = ParquetRecordBatchReaderBuilder::try_new(file)?
            .with_batch_size(config.batch_size);
        let schema = builder.schema().clone();
        let reader = builder.build()?;
        let batches = reader.collect::<Result<Vec<_>, _>>()?;

        Self::new(study_id, category, schema, batches)
    }

    /// Study identifier the table belongs to
    pub fn study_id(&self) -> &str {
        &self.study_id
    }

    /// Table category
    pub fn category(&self) -> TableCategory {
        self.category
    }

    /// Arrow schema of the table
    pub fn schema(&self) -> SchemaRef {
        SchemaRef::clone(&self.schema)
    }

    /// Record batches in storage order
    pub fn batches(&self) -> &[RecordBatch] {
        &self.batches
    }

    /// Total number of rows across batches
    pub fn num_rows(&self) -> usize {
        self.batches.iter().map(|b| b.num_rows()).sum()
    }

    /// Consume the table, returning its parts.
    pub fn into_parts(self) -> (String, TableCategory, SchemaRef, Vec<RecordBatch>) {
        (self.study_id, self.category, self.schema, self.batches)
    }
}

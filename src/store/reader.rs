use std::fs::File;
use std::path::{Path, PathBuf};

use arrow::datatypes::SchemaRef;
use log::debug;
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::{
    ArrowPredicateFn, ParquetRecordBatchReader, ParquetRecordBatchReaderBuilder, RowFilter,
};
use parquet::arrow::ProjectionMask;
use parquet::file::reader::{FileReader, SerializedFileReader};

use crate::config::StorePaths;
use crate::schema::{validate_mutation_schema, TableCategory};

use super::predicate::{evaluate_conjunction, ColumnEquals};
use super::{ReaderConfig, StoreError};

/// Read-only handle on a combined store directory.
///
/// The handle only holds paths; every scan opens its file afresh, so one handle can
/// serve concurrent queries from several threads.
#[derive(Debug, Clone)]
pub struct CombinedStore {
    dir: PathBuf,
    config: ReaderConfig,
}

impl CombinedStore {
    /// Open the canonical combined directory of `paths`
    pub fn open(paths: &StorePaths) -> Self {
        Self::open_dir(paths.combined_dir())
    }

    /// Open a combined store at an explicit directory
    pub fn open_dir<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            config: ReaderConfig::default(),
        }
    }

    /// Open the override directory when given, else the canonical one
    pub fn open_with_override(paths: &StorePaths, dir: Option<&Path>) -> Self {
        match dir {
            Some(dir) => Self::open_dir(dir),
            None => Self::open(paths),
        }
    }

    /// Replace the reader configuration
    pub fn with_config(mut self, config: ReaderConfig) -> Self {
        self.config = config;
        self
    }

    /// Store directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of a category's combined table
    pub fn table_path(&self, category: TableCategory) -> PathBuf {
        StorePaths::combined_file_in(&self.dir, category)
    }

    fn open_file(&self, category: TableCategory) -> Result<(PathBuf, File), StoreError> {
        let path = self.table_path(category);
        if !path.is_file() {
            return Err(StoreError::MissingTable(path));
        }
        let file = File::open(&path)?;
        Ok((path, file))
    }

    /// Arrow schema of a category's combined table (footer read only)
    pub fn schema(&self, category: TableCategory) -> Result<SchemaRef, StoreError> {
        let (_, file) = self.open_file(category)?;
        let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
        Ok(builder.schema().clone())
    }

    /// Number of rows in a category's combined table (footer read only)
    pub fn num_rows(&self, category: TableCategory) -> Result<i64, StoreError> {
        let (_, file) = self.open_file(category)?;
        let reader = SerializedFileReader::new(file)?;
        Ok(reader.metadata().file_metadata().num_rows())
    }

    /// Scan a combined table with predicate pushdown.
    ///
    /// Only the predicate columns are decoded to evaluate `predicates`; only the
    /// `projection` columns are materialized for matching rows. A predicate on a
    /// column the table lacks selects no rows; a missing projection column is an
    /// error. Batches keep
    /// storage order. Columns in output batches follow file order, so consumers
    /// should look them up by name.
    pub fn scan(
        &self,
        category: TableCategory,
        predicates: &[ColumnEquals],
        projection: &[&str],
    ) -> Result<ScanIterator, StoreError> {
        let (path, file) = self.open_file(category)?;
        let mut builder = ParquetRecordBatchReaderBuilder::try_new(file)?
            .with_batch_size(self.config.batch_size);

        if category == TableCategory::Mutations {
            validate_mutation_schema(builder.schema())?;
        }

        let index_of = |column: &str| {
            builder
                .schema()
                .index_of(column)
                .map_err(|_| StoreError::ColumnNotFound {
                    column: column.to_string(),
                    path: path.clone(),
                })
        };

        let output_roots = projection
            .iter()
            .map(|c| index_of(c))
            .collect::<Result<Vec<_>, _>>()?;

        // An absent column is all nulls, which equal nothing
        if let Some(missing) = predicates
            .iter()
            .find(|p| builder.schema().index_of(&p.column).is_err())
        {
            debug!(
                "{} has no {} column, scan selects no rows",
                path.display(),
                missing.column
            );
            return Ok(ScanIterator { inner: None });
        }
        let mut predicate_roots = predicates
            .iter()
            .map(|p| index_of(&p.column))
            .collect::<Result<Vec<_>, _>>()?;
        predicate_roots.sort_unstable();
        predicate_roots.dedup();

        let (predicate_mask, output_mask) = {
            let descr = builder.parquet_schema();
            (
                ProjectionMask::roots(descr, predicate_roots),
                ProjectionMask::roots(descr, output_roots),
            )
        };

        if !predicates.is_empty() {
            let predicates = predicates.to_vec();
            let filter = ArrowPredicateFn::new(predicate_mask, move |batch: RecordBatch| {
                evaluate_conjunction(&batch, &predicates)
            });
            builder = builder.with_row_filter(RowFilter::new(vec![Box::new(filter)]));
        }

        let reader = builder.with_projection(output_mask).build()?;
        Ok(ScanIterator {
            inner: Some(reader),
        })
    }
}

/// Streaming iterator over the batches selected by a scan
pub struct ScanIterator {
    inner: Option<ParquetRecordBatchReader>,
}

impl Iterator for ScanIterator {
    type Item = Result<RecordBatch, StoreError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .as_mut()?
            .next()
            .map(|r| r.map_err(StoreError::from))
    }
}

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

use arrow::datatypes::SchemaRef;
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

use super::{StoreError, StoreWriterConfig};

/// Statistics from a completed table write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteStats {
    /// Number of rows written
    pub rows_written: usize,
    /// Number of Parquet row groups written
    pub row_groups_written: usize,
    /// Final file size in bytes
    pub file_size_bytes: u64,
}

impl fmt::Display for WriteStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Wrote {} rows in {} row groups ({} bytes)",
            self.rows_written, self.row_groups_written, self.file_size_bytes
        )
    }
}

/// Write `batches` to `path` atomically.
///
/// The table is written to a temporary file in the destination directory and renamed
/// over `path` only after the Parquet footer is flushed, so readers see either the
/// previous table or the complete new one. On error the temporary file is removed and
/// any existing table at `path` is left untouched.
pub fn write_table_atomic(
    path: &Path,
    schema: SchemaRef,
    batches: &[RecordBatch],
    config: &StoreWriterConfig,
    metadata: &HashMap<String, String>,
) -> Result<WriteStats, StoreError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut tmp = tempfile::Builder::new()
        .prefix(".cbiohub-")
        .suffix(".parquet.tmp")
        .tempfile_in(dir)?;

    let props = config.to_writer_properties(metadata);
    let mut writer = ArrowWriter::try_new(tmp.as_file_mut(), schema, Some(props))?;
    let mut rows_written = 0;
    for batch in batches {
        writer.write(batch)?;
        rows_written += batch.num_rows();
    }
    let footer = writer.close()?;
    tmp.as_file().sync_all()?;

    tmp.persist(path).map_err(|e| StoreError::IoError(e.error))?;

    Ok(WriteStats {
        rows_written,
        row_groups_written: footer.row_groups.len(),
        file_size_bytes: fs::metadata(path)?.len(),
    })
}

use std::collections::HashMap;
use std::fs;
use std::sync::Arc;

use arrow::array::{Array, ArrayRef, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use tempfile::tempdir;

use super::*;
use crate::schema::{columns, TableCategory};

fn mutation_batch(rows: &[(&str, &str, &str, &str)]) -> RecordBatch {
    let schema = Arc::new(Schema::new(vec![
        Field::new(columns::CHROMOSOME, DataType::Utf8, true),
        Field::new(columns::HUGO_SYMBOL, DataType::Utf8, true),
        Field::new(columns::TUMOR_SAMPLE_BARCODE, DataType::Utf8, true),
        Field::new(columns::STUDY_ID, DataType::Utf8, true),
    ]));
    let col = |i: usize| -> ArrayRef {
        Arc::new(StringArray::from(
            rows.iter()
                .map(|r| match i {
                    0 => r.0,
                    1 => r.1,
                    2 => r.2,
                    _ => r.3,
                })
                .collect::<Vec<_>>(),
        ))
    };
    RecordBatch::try_new(schema, vec![col(0), col(1), col(2), col(3)]).unwrap()
}

fn collect_column(store: &CombinedStore, predicates: &[ColumnEquals], column: &str) -> Vec<String> {
    let mut values = Vec::new();
    for batch in store
        .scan(TableCategory::Mutations, predicates, &[column])
        .unwrap()
    {
        let batch = batch.unwrap();
        let array = batch
            .column_by_name(column)
            .unwrap()
            .as_any()
            .downcast_ref::<StringArray>()
            .unwrap()
            .clone();
        values.extend(array.iter().map(|v| v.unwrap_or_default().to_string()));
    }
    values
}

#[test]
fn test_scan_with_pushdown_preserves_order() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let store = CombinedStore::open_dir(dir.path()).with_config(ReaderConfig { batch_size: 2 });
    let batch = mutation_batch(&[
        ("17", "TP53", "S1", "A"),
        ("12", "KRAS", "S2", "A"),
        ("17", "TP53", "S3", "B"),
        ("17", "BRCA1", "S4", "B"),
        ("17", "TP53", "S1", "A"),
    ]);
    let stats = write_table_atomic(
        &store.table_path(TableCategory::Mutations),
        batch.schema(),
        &[batch],
        &StoreWriterConfig::default(),
        &HashMap::new(),
    )?;
    assert_eq!(stats.rows_written, 5);
    assert_eq!(store.num_rows(TableCategory::Mutations)?, 5);

    let predicates = [
        ColumnEquals::new(columns::CHROMOSOME, "17"),
        ColumnEquals::new(columns::HUGO_SYMBOL, "TP53"),
    ];
    let barcodes = collect_column(&store, &predicates, columns::TUMOR_SAMPLE_BARCODE);
    assert_eq!(barcodes, vec!["S1", "S3", "S1"]);

    // Empty conjunction selects everything
    assert_eq!(collect_column(&store, &[], columns::STUDY_ID).len(), 5);

    Ok(())
}

#[test]
fn test_scan_missing_table_and_column() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let store = CombinedStore::open_dir(dir.path());

    assert!(matches!(
        store.scan(TableCategory::Mutations, &[], &[columns::STUDY_ID]),
        Err(StoreError::MissingTable(_))
    ));

    let batch = mutation_batch(&[("1", "NRAS", "S1", "A")]);
    write_table_atomic(
        &store.table_path(TableCategory::Mutations),
        batch.schema(),
        &[batch],
        &StoreWriterConfig::fast_write(),
        &HashMap::new(),
    )?;

    // No study supplied a protein change column: nothing can match it
    let batches = store
        .scan(
            TableCategory::Mutations,
            &[ColumnEquals::new(columns::HGVSP_SHORT, "p.Q61K")],
            &[columns::STUDY_ID],
        )?
        .collect::<Result<Vec<_>, _>>()?;
    assert!(batches.is_empty());

    let result = store.scan(
        TableCategory::Mutations,
        &[ColumnEquals::new(columns::CHROMOSOME, "1")],
        &[columns::HGVSP_SHORT],
    );
    assert!(matches!(
        result,
        Err(StoreError::ColumnNotFound { ref column, .. }) if column == columns::HGVSP_SHORT
    ));

    Ok(())
}

#[test]
fn test_atomic_write_replaces_and_cleans_up() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("combined_mutations.parquet");
    let mut metadata = HashMap::new();
    metadata.insert("cbiohub:category".to_string(), "mutations".to_string());

    let first = mutation_batch(&[("1", "A", "S1", "X"), ("2", "B", "S2", "X")]);
    write_table_atomic(&path, first.schema(), &[first], &StoreWriterConfig::default(), &metadata)?;
    let second = mutation_batch(&[("3", "C", "S3", "Y")]);
    write_table_atomic(&path, second.schema(), &[second], &StoreWriterConfig::default(), &metadata)?;

    let store = CombinedStore::open_dir(dir.path());
    assert_eq!(store.num_rows(TableCategory::Mutations)?, 1);

    let leftovers: Vec<_> = fs::read_dir(dir.path())?
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty());

    Ok(())
}

#[test]
fn test_store_lock_is_exclusive() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let lock_dir = dir.path().join("combined");

    let guard = StoreLock::acquire(&lock_dir)?;
    assert!(guard.path().is_file());
    assert!(matches!(
        StoreLock::acquire(&lock_dir),
        Err(StoreError::Locked(_))
    ));

    drop(guard);
    assert!(!lock_dir.join(LOCK_FILE).exists());
    let _again = StoreLock::acquire(&lock_dir)?;

    Ok(())
}

#[cfg(unix)]
#[test]
fn test_stale_lock_is_reclaimed() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let lock_dir = dir.path().join("combined");
    fs::create_dir_all(&lock_dir)?;
    // Above any kernel pid_max, so no such process exists
    fs::write(lock_dir.join(LOCK_FILE), "999999999\n")?;
    assert_eq!(StoreLock::state(&lock_dir), LockState::Stale(999_999_999));

    let guard = StoreLock::acquire(&lock_dir)?;
    assert_eq!(
        fs::read_to_string(guard.path())?.trim(),
        std::process::id().to_string()
    );
    assert_eq!(
        StoreLock::state(&lock_dir),
        LockState::HeldBy(std::process::id())
    );

    drop(guard);
    assert_eq!(StoreLock::state(&lock_dir), LockState::Free);
    Ok(())
}

#[test]
fn test_unparseable_lock_is_kept() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    fs::write(dir.path().join(LOCK_FILE), "not a pid")?;

    assert_eq!(StoreLock::state(dir.path()), LockState::Unknown);
    assert!(matches!(
        StoreLock::acquire(dir.path()),
        Err(StoreError::Locked(_))
    ));
    assert!(dir.path().join(LOCK_FILE).exists());
    Ok(())
}

#[test]
fn test_evaluate_conjunction_ignores_nulls() {
    let schema = Arc::new(Schema::new(vec![Field::new("c", DataType::Utf8, true)]));
    let batch = RecordBatch::try_new(
        schema,
        vec![Arc::new(StringArray::from(vec![Some("x"), None, Some("y")]))],
    )
    .unwrap();

    let mask = evaluate_conjunction(&batch, &[ColumnEquals::new("c", "x")]).unwrap();
    let selected: Vec<bool> = (0..mask.len())
        .map(|i| mask.is_valid(i) && mask.value(i))
        .collect();
    assert_eq!(selected, vec![true, false, false]);
}

use std::fs::{self, File};
use std::sync::Arc;

use arrow::array::{ArrayRef, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use tempfile::tempdir;

use super::*;
use crate::schema::{StudyManifest, TableCategory, STUDY_MANIFEST_FILE};
use crate::store::ReaderConfig;

fn sample_batch() -> RecordBatch {
    let schema = Arc::new(Schema::new(vec![
        Field::new("SAMPLE_ID", DataType::Utf8, true),
        Field::new("AGE", DataType::Int64, true),
    ]));
    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from(vec!["S1", "S2", "S3"])),
        Arc::new(Int64Array::from(vec![Some(40), None, Some(61)])),
    ];
    RecordBatch::try_new(schema, columns).unwrap()
}

fn write_parquet(path: &std::path::Path, batch: &RecordBatch) {
    let file = File::create(path).unwrap();
    let mut writer = ArrowWriter::try_new(file, batch.schema(), None).unwrap();
    writer.write(batch).unwrap();
    writer.close().unwrap();
}

#[test]
fn test_read_parquet_table() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("data_clinical_sample.parquet");
    write_parquet(&path, &sample_batch());

    let table = StudyTable::read_parquet(
        &path,
        "study_a",
        TableCategory::ClinicalSample,
        &ReaderConfig { batch_size: 2 },
    )?;

    assert_eq!(table.study_id(), "study_a");
    assert_eq!(table.category(), TableCategory::ClinicalSample);
    assert_eq!(table.num_rows(), 3);
    assert_eq!(table.batches().len(), 2);
    assert_eq!(table.schema().field(1).data_type(), &DataType::Int64);

    Ok(())
}

#[test]
fn test_schema_mismatch_rejected() {
    let batch = sample_batch();
    let other = Arc::new(Schema::new(vec![Field::new(
        "SAMPLE_ID",
        DataType::Utf8,
        true,
    )]));

    let result = StudyTable::new("study_a", TableCategory::ClinicalSample, other, vec![batch]);
    assert!(matches!(result, Err(StudyError::SchemaMismatch { .. })));
}

#[test]
fn test_discover_studies_sorted_with_manifest() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let studies = dir.path().join("studies");
    fs::create_dir_all(studies.join("zeta"))?;
    fs::create_dir_all(studies.join("alpha"))?;
    fs::write(studies.join("README"), "not a study")?;

    let manifest = StudyManifest::new("alpha_renamed");
    fs::write(
        studies.join("alpha").join(STUDY_MANIFEST_FILE),
        serde_json::to_string(&manifest)?,
    )?;

    let found = discover_studies(&studies)?
        .into_iter()
        .collect::<Result<Vec<_>, _>>()?;
    assert_eq!(found.len(), 2);
    assert_eq!(found[0].study_id(), "alpha_renamed");
    assert!(found[0].is_processed());
    assert_eq!(found[1].study_id(), "zeta");
    assert!(!found[1].is_processed());

    Ok(())
}

#[test]
fn test_missing_table_is_none() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let study = ProcessedStudy::open(dir.path())?;
    let table = study.load_table(TableCategory::Mutations, &ReaderConfig::default())?;
    assert!(table.is_none());
    assert!(discover_studies(dir.path().join("does_not_exist"))?.is_empty());
    Ok(())
}

#[test]
fn test_corrupt_manifest_fails_only_its_study() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let studies = dir.path().join("studies");
    fs::create_dir_all(studies.join("bad"))?;
    fs::create_dir_all(studies.join("good"))?;
    fs::write(studies.join("bad").join(STUDY_MANIFEST_FILE), "{not json")?;
    fs::write(
        studies.join("good").join(STUDY_MANIFEST_FILE),
        serde_json::to_string(&StudyManifest::new("good"))?,
    )?;

    let found = discover_studies(&studies)?;
    assert_eq!(found.len(), 2);
    match &found[0] {
        Err(e @ StudyError::ManifestError { .. }) => assert_eq!(e.study_id(), Some("bad")),
        other => panic!("expected a manifest error, got {:?}", other),
    }
    let good = found[1].as_ref().map_err(|e| e.to_string())?;
    assert_eq!(good.study_id(), "good");
    assert!(good.is_processed());

    Ok(())
}

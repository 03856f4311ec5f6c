use super::*;
use arrow::datatypes::{DataType, Field, Schema};

#[test]
fn test_mutation_schema_creation() {
    let schema = create_mutation_schema();
    assert_eq!(schema.fields().len(), MUTATION_COLUMNS.len());

    for (field, expected) in schema.fields().iter().zip(MUTATION_COLUMNS) {
        assert_eq!(field.name(), expected);
        assert_eq!(field.data_type(), &DataType::Utf8);
        assert!(field.is_nullable());
    }
}

#[test]
fn test_mutation_schema_validation() {
    let schema = create_mutation_schema();
    assert!(validate_mutation_schema(&schema).is_ok());
}

#[test]
fn test_validation_requires_provenance_columns() {
    let schema = Schema::new(vec![
        Field::new(columns::CHROMOSOME, DataType::Utf8, true),
        Field::new(columns::STUDY_ID, DataType::Utf8, true),
    ]);
    assert!(matches!(
        validate_mutation_schema(&schema),
        Err(SchemaValidationError::MissingColumn(c)) if c == columns::TUMOR_SAMPLE_BARCODE
    ));
}

#[test]
fn test_validation_rejects_numeric_coordinates() {
    let schema = Schema::new(vec![
        Field::new(columns::START_POSITION, DataType::Int64, true),
        Field::new(columns::TUMOR_SAMPLE_BARCODE, DataType::Utf8, true),
        Field::new(columns::STUDY_ID, DataType::Utf8, true),
    ]);
    assert!(matches!(
        validate_mutation_schema(&schema),
        Err(SchemaValidationError::TypeMismatch { .. })
    ));
}

#[test]
fn test_category_file_names() {
    assert_eq!(
        TableCategory::Mutations.study_file_name(),
        "data_mutations.parquet"
    );
    assert_eq!(
        TableCategory::ClinicalSample.combined_file_name(),
        "combined_clinical_sample.parquet"
    );
    assert_eq!(
        TableCategory::ClinicalPatient.raw_file_names(),
        &["data_clinical_patient.txt"]
    );
}

#[test]
fn test_category_canonical_schema() {
    assert!(matches!(
        TableCategory::Mutations.canonical_schema(),
        CanonicalSchema::Fixed(_)
    ));
    assert!(matches!(
        TableCategory::ClinicalSample.canonical_schema(),
        CanonicalSchema::Open
    ));
}

#[test]
fn test_category_from_str() {
    assert_eq!(
        "clinical_sample".parse::<TableCategory>().unwrap(),
        TableCategory::ClinicalSample
    );
    assert_eq!(
        "MUTATIONS".parse::<TableCategory>().unwrap(),
        TableCategory::Mutations
    );
    assert!("samples".parse::<TableCategory>().is_err());
}

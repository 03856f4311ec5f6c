use arrow::datatypes::{DataType, Schema};

use super::columns;

/// Validates that a combined mutation table can serve queries.
///
/// Sample provenance columns are required; any canonical column that is present
/// must be text. Other canonical columns may be missing when no study supplied them.
pub fn validate_mutation_schema(schema: &Schema) -> Result<(), SchemaValidationError> {
    let required_columns = [columns::TUMOR_SAMPLE_BARCODE, columns::STUDY_ID];

    for name in required_columns {
        if schema.field_with_name(name).is_err() {
            return Err(SchemaValidationError::MissingColumn(name.to_string()));
        }
    }

    for name in columns::MUTATION_COLUMNS {
        if let Ok(field) = schema.field_with_name(name) {
            if !matches!(field.data_type(), DataType::Utf8 | DataType::Null) {
                return Err(SchemaValidationError::TypeMismatch {
                    column: name.to_string(),
                    expected: format!("{:?}", DataType::Utf8),
                    found: format!("{:?}", field.data_type()),
                });
            }
        }
    }

    Ok(())
}

/// Errors that can occur during schema validation
#[derive(Debug, thiserror::Error)]
pub enum SchemaValidationError {
    /// A required column is missing from the schema
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// A column has an incorrect data type
    #[error("Type mismatch for column '{column}': expected {expected}, found {found}")]
    TypeMismatch {
        /// Name of the column with the type mismatch
        column: String,
        /// Expected data type
        expected: String,
        /// Actual data type found
        found: String,
    },
}

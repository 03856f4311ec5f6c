use std::collections::HashMap;
use std::sync::Arc;

use arrow::datatypes::{DataType, Field, Schema, SchemaBuilder};

use super::columns;
use super::constants::{CBIOHUB_FORMAT_VERSION, KEY_FORMAT_VERSION};

/// Creates a text Field annotated with a human-readable description
fn text_field(name: &str, description: &str) -> Field {
    let mut metadata = HashMap::new();
    metadata.insert("description".to_string(), description.to_string());
    Field::new(name, DataType::Utf8, true).with_metadata(metadata)
}

/// Creates the canonical mutation schema.
///
/// Every column is nullable `Utf8`. Positions and read counts are kept as text so
/// that studies encoding them differently (`"07"`, `7`, `7.0`) never disagree on type;
/// comparisons against them are exact text comparisons.
///
/// # Example
///
/// ```
/// use cbiohub::schema::create_mutation_schema;
///
/// let schema = create_mutation_schema();
/// assert_eq!(schema.fields().len(), 14);
/// ```
pub fn create_mutation_schema() -> Schema {
    let mut builder = SchemaBuilder::new();

    // Genomic coordinate
    builder.push(text_field(columns::CHROMOSOME, "chromosome"));
    builder.push(text_field(columns::START_POSITION, "start position (text)"));
    builder.push(text_field(columns::END_POSITION, "end position (text)"));
    builder.push(text_field(columns::REFERENCE_ALLELE, "reference allele"));
    builder.push(text_field(columns::TUMOR_SEQ_ALLELE1, "tumor allele 1"));
    builder.push(text_field(columns::TUMOR_SEQ_ALLELE2, "tumor allele 2 (alternate)"));

    // Read support
    builder.push(text_field(columns::T_REF_COUNT, "tumor reference read count (text)"));
    builder.push(text_field(columns::T_ALT_COUNT, "tumor alternate read count (text)"));
    builder.push(text_field(columns::N_REF_COUNT, "normal reference read count (text)"));
    builder.push(text_field(columns::N_ALT_COUNT, "normal alternate read count (text)"));

    // Annotation
    builder.push(text_field(columns::HUGO_SYMBOL, "HUGO gene symbol"));
    builder.push(text_field(columns::HGVSP_SHORT, "short protein change"));

    // Provenance
    builder.push(text_field(columns::TUMOR_SAMPLE_BARCODE, "tumor sample barcode"));
    builder.push(text_field(columns::STUDY_ID, "study identifier"));

    let mut metadata = HashMap::new();
    metadata.insert(
        KEY_FORMAT_VERSION.to_string(),
        CBIOHUB_FORMAT_VERSION.to_string(),
    );

    builder.finish().with_metadata(metadata)
}

/// Creates the canonical mutation schema wrapped in an Arc
pub fn create_mutation_schema_arc() -> Arc<Schema> {
    Arc::new(create_mutation_schema())
}

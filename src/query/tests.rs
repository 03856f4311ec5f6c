use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{Array, ArrayRef, Int64Array, StringArray};
use arrow::datatypes::{Field, Schema};
use arrow::record_batch::RecordBatch;
use tempfile::tempdir;

use super::*;
use crate::config::StorePaths;
use crate::schema::{columns, create_mutation_schema_arc, TableCategory};
use crate::store::{write_table_atomic, CombinedStore, StoreWriterConfig};

struct Mutation<'a> {
    chrom: &'a str,
    start: &'a str,
    ref_allele: &'a str,
    alt_allele: &'a str,
    gene: &'a str,
    protein: &'a str,
    barcode: &'a str,
    study: &'a str,
}

#[allow(clippy::too_many_arguments)]
fn m<'a>(
    chrom: &'a str,
    start: &'a str,
    ref_allele: &'a str,
    alt_allele: &'a str,
    gene: &'a str,
    protein: &'a str,
    barcode: &'a str,
    study: &'a str,
) -> Mutation<'a> {
    Mutation {
        chrom,
        start,
        ref_allele,
        alt_allele,
        gene,
        protein,
        barcode,
        study,
    }
}

fn write_mutations(dir: &Path, rows: &[Mutation]) {
    let schema = create_mutation_schema_arc();
    let columns: Vec<ArrayRef> = schema
        .fields()
        .iter()
        .map(|field| {
            let values: Vec<Option<&str>> = rows
                .iter()
                .map(|r| match field.name().as_str() {
                    columns::CHROMOSOME => Some(r.chrom),
                    columns::START_POSITION | columns::END_POSITION => Some(r.start),
                    columns::REFERENCE_ALLELE => Some(r.ref_allele),
                    columns::TUMOR_SEQ_ALLELE2 => Some(r.alt_allele),
                    columns::HUGO_SYMBOL => Some(r.gene),
                    columns::HGVSP_SHORT => Some(r.protein),
                    columns::TUMOR_SAMPLE_BARCODE => Some(r.barcode),
                    columns::STUDY_ID => Some(r.study),
                    _ => None,
                })
                .collect();
            Arc::new(StringArray::from(values)) as ArrayRef
        })
        .collect();
    let batch = RecordBatch::try_new(Arc::clone(&schema), columns).unwrap();
    write_table_atomic(
        &StorePaths::combined_file_in(dir, TableCategory::Mutations),
        schema,
        &[batch],
        &StoreWriterConfig::default(),
        &HashMap::new(),
    )
    .unwrap();
}

fn write_clinical(dir: &Path, columns: Vec<(&str, ArrayRef)>) {
    let fields: Vec<Field> = columns
        .iter()
        .map(|(name, array)| Field::new(*name, array.data_type().clone(), true))
        .collect();
    let schema = Arc::new(Schema::new(fields));
    let batch = RecordBatch::try_new(
        Arc::clone(&schema),
        columns.into_iter().map(|(_, a)| a).collect(),
    )
    .unwrap();
    write_table_atomic(
        &StorePaths::combined_file_in(dir, TableCategory::ClinicalSample),
        schema,
        &[batch],
        &StoreWriterConfig::fast_write(),
        &HashMap::new(),
    )
    .unwrap();
}

fn text(values: &[Option<&str>]) -> ArrayRef {
    Arc::new(StringArray::from(values.to_vec()))
}

fn tp53_key() -> VariantKey {
    VariantKey::Coordinate(CoordinateKey::new("chr17", 7675088, 7675088, "C", "T").unwrap())
}

fn scenario_store() -> (tempfile::TempDir, CombinedStore) {
    let dir = tempdir().unwrap();
    write_mutations(
        dir.path(),
        &[m("chr17", "7675088", "C", "T", "TP53", "p.R175H", "SAMPLE_1", "STUDY_A")],
    );
    write_clinical(
        dir.path(),
        vec![
            ("SAMPLE_ID", text(&[Some("SAMPLE_1")])),
            ("CANCER_TYPE", text(&[Some("Breast")])),
        ],
    );
    let store = CombinedStore::open_dir(dir.path());
    (dir, store)
}

#[test]
fn test_lookup_and_frequency_scenario() {
    let (_dir, store) = scenario_store();

    let result = find_variant(&store, &tp53_key()).unwrap();
    assert!(result.found);
    assert_eq!(result.sample_ids, vec!["STUDY_A:SAMPLE_1".to_string()]);

    let VariantKey::Coordinate(key) = tp53_key() else {
        unreachable!()
    };
    let rows = variant_frequency(&store, &key, columns::CANCER_TYPE).unwrap();
    assert_eq!(
        rows,
        vec![FrequencyRow {
            value: Some("Breast".to_string()),
            count: 1
        }]
    );
}

#[test]
fn test_lookup_absent_variant() {
    let (_dir, store) = scenario_store();
    let key = VariantKey::Coordinate(CoordinateKey::new("chr17", 1, 1, "A", "G").unwrap());
    assert_eq!(find_variant(&store, &key).unwrap(), LookupResult::default());
}

#[test]
fn test_lookup_gene_mode_preserves_order_and_duplicates() {
    let dir = tempdir().unwrap();
    write_mutations(
        dir.path(),
        &[
            m("17", "7675088", "C", "T", "TP53", "p.R175H", "S2", "B"),
            m("12", "25245350", "C", "A", "KRAS", "p.G12V", "S9", "B"),
            m("17", "7675088", "C", "T", "TP53", "p.R175H", "S1", "A"),
            m("17", "7675088", "C", "T", "TP53", "p.R175H", "S2", "B"),
        ],
    );
    let store = CombinedStore::open_dir(dir.path());
    let key = VariantKey::Gene(GeneKey::new("TP53", "R175H").unwrap());

    let first = find_variant(&store, &key).unwrap();
    assert_eq!(first.sample_ids, vec!["B:S2", "A:S1", "B:S2"]);
    assert_eq!(first.studies().into_iter().collect::<Vec<_>>(), vec!["A", "B"]);

    let second = find_variant(&store, &key).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_protein_change_prefix() {
    assert_eq!(normalize_protein_change("R175H"), "p.R175H");
    assert_eq!(normalize_protein_change("p.R175H"), "p.R175H");
    assert_eq!(normalize_protein_change(" G12V "), "p.G12V");
    assert_eq!(
        GeneKey::new("TP53", "R175H").unwrap(),
        GeneKey::new("TP53", "p.R175H").unwrap()
    );
}

#[test]
fn test_variant_args_modes() {
    let coordinate = VariantArgs {
        chromosome: Some("17".into()),
        start: Some("7675088".into()),
        end: Some("7675088".into()),
        reference: Some("C".into()),
        alternate: Some("T".into()),
        ..Default::default()
    };
    assert!(matches!(
        VariantKey::try_from(coordinate.clone()),
        Ok(VariantKey::Coordinate(_))
    ));

    let gene = VariantArgs {
        gene: Some("TP53".into()),
        protein_change: Some("R175H".into()),
        ..Default::default()
    };
    match VariantKey::try_from(gene.clone()) {
        Ok(VariantKey::Gene(key)) => assert_eq!(key.protein_change, "p.R175H"),
        other => panic!("expected gene key, got {:?}", other),
    }

    let both = VariantArgs {
        gene: Some("TP53".into()),
        protein_change: Some("R175H".into()),
        ..coordinate.clone()
    };
    let partial = VariantArgs {
        alternate: None,
        ..coordinate
    };
    let gene_only = VariantArgs {
        protein_change: Some("  ".into()),
        ..gene
    };
    for args in [both, partial, gene_only, VariantArgs::default()] {
        assert!(matches!(
            VariantKey::try_from(args),
            Err(QueryError::InvalidArgument(_))
        ));
    }

    assert!(matches!(
        CoordinateKey::new("17", 1, 1, "", "T"),
        Err(QueryError::InvalidArgument(_))
    ));
}

#[test]
fn test_missing_store() {
    let dir = tempdir().unwrap();
    let store = CombinedStore::open_dir(dir.path().join("nothing"));
    assert!(matches!(
        find_variant(&store, &tp53_key()),
        Err(QueryError::MissingStore(_))
    ));
}

#[test]
fn test_frequency_unknown_attribute_without_matches() {
    let (_dir, store) = scenario_store();
    let key = CoordinateKey::new("chr1", 1, 1, "A", "G").unwrap();
    match variant_frequency(&store, &key, "ONCOTREE_CODE") {
        Err(QueryError::UnknownAttribute { attribute, .. }) => assert_eq!(attribute, "ONCOTREE_CODE"),
        other => panic!("expected unknown attribute, got {:?}", other),
    }
}

#[test]
fn test_frequency_ordering_and_join() {
    let dir = tempdir().unwrap();
    let v = |barcode: &'static str, study: &'static str| m("7", "140753336", "A", "T", "BRAF", "p.V600E", barcode, study);
    write_mutations(
        dir.path(),
        &[
            v("S1", "A"),
            v("S2", "A"),
            v("S3", "A"),
            v("S4", "A"),
            v("S5", "A"),
            v("S6", "A"),
            v("S7", "A"),
            // No clinical row: not counted
            v("ORPHAN", "A"),
        ],
    );
    write_clinical(
        dir.path(),
        vec![
            (
                "SAMPLE_ID",
                text(&[
                    Some("S1"),
                    Some("S2"),
                    Some("S3"),
                    Some("S4"),
                    Some("S5"),
                    Some("S6"),
                    Some("S7"),
                    Some("UNRELATED"),
                ]),
            ),
            (
                "CANCER_TYPE",
                text(&[
                    Some("Melanoma"),
                    Some("Melanoma"),
                    Some("Colorectal"),
                    Some("Thyroid"),
                    None,
                    Some("Colorectal"),
                    None,
                    Some("Melanoma"),
                ]),
            ),
            (
                "AGE",
                Arc::new(Int64Array::from(vec![50, 61, 50, 72, 50, 61, 50, 80])) as ArrayRef,
            ),
        ],
    );
    let store = CombinedStore::open_dir(dir.path());
    let key = CoordinateKey::new("7", "140753336", "140753336", "A", "T").unwrap();

    let rows = variant_frequency(&store, &key, "CANCER_TYPE").unwrap();
    let flat: Vec<(Option<&str>, u64)> = rows.iter().map(|r| (r.value.as_deref(), r.count)).collect();
    assert_eq!(
        flat,
        vec![
            (Some("Colorectal"), 2),
            (Some("Melanoma"), 2),
            (None, 2),
            (Some("Thyroid"), 1),
        ]
    );
    let total: u64 = rows.iter().map(|r| r.count).sum();
    assert_eq!(total, 7);

    // Non-text attributes group by their text rendering
    let ages = variant_frequency(&store, &key, "AGE").unwrap();
    assert_eq!(ages[0], FrequencyRow { value: Some("50".to_string()), count: 4 });
}

#[test]
fn test_frequency_joins_on_study_when_available() {
    let dir = tempdir().unwrap();
    write_mutations(
        dir.path(),
        &[m("17", "7675088", "C", "T", "TP53", "p.R175H", "S1", "A")],
    );
    write_clinical(
        dir.path(),
        vec![
            ("SAMPLE_ID", text(&[Some("S1"), Some("S1")])),
            ("CANCER_TYPE", text(&[Some("Breast"), Some("Lung")])),
            ("study_id", text(&[Some("A"), Some("B")])),
        ],
    );
    let store = CombinedStore::open_dir(dir.path());
    let key = CoordinateKey::new("17", "7675088", "7675088", "C", "T").unwrap();

    let rows = variant_frequency(&store, &key, "CANCER_TYPE").unwrap();
    assert_eq!(
        rows,
        vec![FrequencyRow {
            value: Some("Breast".to_string()),
            count: 1
        }]
    );
}

#[test]
fn test_resolve_coordinates() {
    let dir = tempdir().unwrap();
    write_mutations(
        dir.path(),
        &[
            m("17", "7675088", "C", "T", "TP53", "p.R175H", "S1", "A"),
            m("17", "7675089", "G", "A", "TP53", "p.R175H", "S2", "A"),
            m("17", "7675088", "C", "T", "TP53", "p.R175H", "S3", "B"),
            m("17", "7675000", "C", "A", "TP53", "p.R175H", "S4", "B"),
            m("17", "7670000", "C", "G", "TP53", "p.R248Q", "S5", "B"),
        ],
    );
    let store = CombinedStore::open_dir(dir.path());

    let rows = resolve_coordinates(&store, &GeneKey::new("TP53", "R175H").unwrap()).unwrap();
    let flat: Vec<(&str, &str, u64)> = rows
        .iter()
        .map(|r| (r.start.as_str(), r.alternate.as_str(), r.count))
        .collect();
    assert_eq!(
        flat,
        vec![("7675088", "T", 2), ("7675000", "A", 1), ("7675089", "A", 1)]
    );
    assert_eq!(
        rows,
        resolve_coordinates(&store, &GeneKey::new("TP53", "p.R175H").unwrap()).unwrap()
    );
    assert!(resolve_coordinates(&store, &GeneKey::new("KRAS", "G12D").unwrap())
        .unwrap()
        .is_empty());
}

#[test]
fn test_frequency_joins_integer_sample_ids() {
    let dir = tempdir().unwrap();
    write_mutations(dir.path(), &[m("1", "100", "A", "G", "NRAS", "p.Q61R", "42", "A")]);
    write_clinical(
        dir.path(),
        vec![
            ("SAMPLE_ID", Arc::new(Int64Array::from(vec![42])) as ArrayRef),
            ("CANCER_TYPE", text(&[Some("Melanoma")])),
        ],
    );
    let store = CombinedStore::open_dir(dir.path());
    let key = CoordinateKey::new("1", 100, 100, "A", "G").unwrap();
    let rows = variant_frequency(&store, &key, "CANCER_TYPE").unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].count, 1);
}

#[test]
fn test_gene_mode_without_protein_column_matches_nothing() {
    let dir = tempdir().unwrap();
    let canonical = create_mutation_schema_arc();
    let fields: Vec<Field> = canonical
        .fields()
        .iter()
        .filter(|f| f.name() != columns::HGVSP_SHORT)
        .map(|f| f.as_ref().clone())
        .collect();
    let schema = Arc::new(Schema::new(fields));
    let arrays: Vec<ArrayRef> = schema
        .fields()
        .iter()
        .map(|f| match f.name().as_str() {
            columns::HUGO_SYMBOL => text(&[Some("TP53")]),
            columns::CHROMOSOME => text(&[Some("17")]),
            columns::TUMOR_SAMPLE_BARCODE => text(&[Some("S1")]),
            columns::STUDY_ID => text(&[Some("study_a")]),
            _ => text(&[None]),
        })
        .collect();
    let batch = RecordBatch::try_new(Arc::clone(&schema), arrays).unwrap();
    write_table_atomic(
        &StorePaths::combined_file_in(dir.path(), TableCategory::Mutations),
        schema,
        &[batch],
        &StoreWriterConfig::fast_write(),
        &HashMap::new(),
    )
    .unwrap();
    let store = CombinedStore::open_dir(dir.path());

    let gene = GeneKey::new("TP53", "R175H").unwrap();
    let result = find_variant(&store, &VariantKey::Gene(gene.clone())).unwrap();
    assert_eq!(result, LookupResult::default());
    assert!(resolve_coordinates(&store, &gene).unwrap().is_empty());
}

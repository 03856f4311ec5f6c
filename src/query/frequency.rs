use std::cmp::Ordering;
use std::collections::HashMap;

use arrow::array::Array;
use log::debug;

use crate::schema::{columns, TableCategory};
use crate::store::CombinedStore;

use super::{text_column, CoordinateKey, QueryError};

/// Number of matching mutation rows sharing one clinical attribute value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyRow {
    /// Attribute value as text; `None` for samples without a value
    pub value: Option<String>,
    /// Number of joined rows
    pub count: u64,
}

/// (study, barcode); the study part is only set when joining on study
type SampleKey = (Option<String>, String);

/// Count the rows carrying a variant per value of a clinical sample attribute.
///
/// Mutation rows are joined to clinical sample rows on `Tumor_Sample_Barcode = SAMPLE_ID`,
/// and also on `study_id` when the clinical table has one. Rows are ordered by count
/// descending, then by value ascending with the null group last. Rows without a clinical
/// match are not counted.
pub fn variant_frequency(
    store: &CombinedStore,
    key: &CoordinateKey,
    attribute: &str,
) -> Result<Vec<FrequencyRow>, QueryError> {
    if attribute.trim().is_empty() {
        return Err(QueryError::InvalidArgument(
            "clinical attribute must not be empty".to_string(),
        ));
    }

    let clinical = store.schema(TableCategory::ClinicalSample)?;
    if clinical.index_of(attribute).is_err() {
        return Err(QueryError::UnknownAttribute {
            attribute: attribute.to_string(),
            path: store.table_path(TableCategory::ClinicalSample),
        });
    }
    let join_on_study = clinical.index_of(columns::STUDY_ID).is_ok();

    let mut samples: HashMap<SampleKey, u64> = HashMap::new();
    let projection = [columns::STUDY_ID, columns::TUMOR_SAMPLE_BARCODE];
    for batch in store.scan(TableCategory::Mutations, &key.predicates(), &projection)? {
        let batch = batch?;
        let studies = text_column(&batch, columns::STUDY_ID)?;
        let barcodes = text_column(&batch, columns::TUMOR_SAMPLE_BARCODE)?;
        for (study, barcode) in studies.iter().zip(barcodes.iter()) {
            let Some(barcode) = barcode else {
                continue;
            };
            let study = study.filter(|_| join_on_study).map(str::to_string);
            *samples.entry((study, barcode.to_string())).or_insert(0) += 1;
        }
    }
    debug!(
        "Variant {} found in {} distinct samples",
        key,
        samples.len()
    );
    if samples.is_empty() {
        return Ok(Vec::new());
    }

    let mut projection = vec![columns::SAMPLE_ID, attribute];
    if join_on_study {
        projection.push(columns::STUDY_ID);
    }

    let mut groups: HashMap<Option<String>, u64> = HashMap::new();
    for batch in store.scan(TableCategory::ClinicalSample, &[], &projection)? {
        let batch = batch?;
        let ids = text_column(&batch, columns::SAMPLE_ID)?;
        let values = text_column(&batch, attribute)?;
        let studies = if join_on_study {
            Some(text_column(&batch, columns::STUDY_ID)?)
        } else {
            None
        };

        for row in 0..batch.num_rows() {
            if ids.is_null(row) {
                continue;
            }
            let study = studies
                .as_ref()
                .filter(|s| s.is_valid(row))
                .map(|s| s.value(row).to_string());
            let Some(&count) = samples.get(&(study, ids.value(row).to_string())) else {
                continue;
            };
            let value = values.is_valid(row).then(|| values.value(row).to_string());
            *groups.entry(value).or_insert(0) += count;
        }
    }

    let mut rows: Vec<FrequencyRow> = groups
        .into_iter()
        .map(|(value, count)| FrequencyRow { value, count })
        .collect();
    rows.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| match (&a.value, &b.value) {
                (Some(x), Some(y)) => x.cmp(y),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            })
    });
    Ok(rows)
}

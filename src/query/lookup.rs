use std::collections::BTreeSet;

use log::debug;

use crate::schema::{columns, TableCategory};
use crate::store::CombinedStore;

use super::{text_column, QueryError, VariantKey};

/// Outcome of a point lookup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupResult {
    /// Whether any mutation row matched
    pub found: bool,
    /// `study_id:barcode` per matching row, in storage order, duplicates kept
    pub sample_ids: Vec<String>,
}

impl LookupResult {
    /// Distinct study ids among the matches
    pub fn studies(&self) -> BTreeSet<&str> {
        self.sample_ids
            .iter()
            .map(|id| id.split_once(':').map_or(id.as_str(), |(study, _)| study))
            .collect()
    }
}

/// Find the samples carrying a variant.
pub fn find_variant(store: &CombinedStore, key: &VariantKey) -> Result<LookupResult, QueryError> {
    let predicates = key.predicates();
    let projection = [columns::STUDY_ID, columns::TUMOR_SAMPLE_BARCODE];

    let mut sample_ids = Vec::new();
    for batch in store.scan(TableCategory::Mutations, &predicates, &projection)? {
        let batch = batch?;
        let studies = text_column(&batch, columns::STUDY_ID)?;
        let barcodes = text_column(&batch, columns::TUMOR_SAMPLE_BARCODE)?;
        sample_ids.extend(
            studies
                .iter()
                .zip(barcodes.iter())
                .map(|(study, barcode)| {
                    format!("{}:{}", study.unwrap_or_default(), barcode.unwrap_or_default())
                }),
        );
    }

    debug!("Lookup {} matched {} rows", key, sample_ids.len());
    Ok(LookupResult {
        found: !sample_ids.is_empty(),
        sample_ids,
    })
}

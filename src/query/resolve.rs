use std::collections::HashMap;

use crate::schema::{columns, TableCategory};
use crate::store::CombinedStore;

use super::{text_column, GeneKey, QueryError};

/// Genomic coordinate observed for a gene-level variant, with its row count
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordinateCount {
    /// Chromosome
    pub chromosome: String,
    /// Start position
    pub start: String,
    /// End position
    pub end: String,
    /// Reference allele
    pub reference: String,
    /// Alternate allele
    pub alternate: String,
    /// Number of mutation rows with this coordinate
    pub count: u64,
}

/// Resolve a gene-level variant to the genomic coordinates it was called at.
///
/// Ordered by count descending, ties by ascending coordinate text. Null coordinate
/// fields are reported as empty strings.
pub fn resolve_coordinates(
    store: &CombinedStore,
    key: &GeneKey,
) -> Result<Vec<CoordinateCount>, QueryError> {
    let mut counts: HashMap<[String; 5], u64> = HashMap::new();

    for batch in store.scan(
        TableCategory::Mutations,
        &key.predicates(),
        &columns::COORDINATE_COLUMNS,
    )? {
        let batch = batch?;
        let arrays = columns::COORDINATE_COLUMNS
            .iter()
            .map(|c| text_column(&batch, c))
            .collect::<Result<Vec<_>, _>>()?;

        for row in 0..batch.num_rows() {
            let coordinate: [String; 5] = std::array::from_fn(|i| {
                let array = &arrays[i];
                if arrow::array::Array::is_valid(array, row) {
                    array.value(row).to_string()
                } else {
                    String::new()
                }
            });
            *counts.entry(coordinate).or_insert(0) += 1;
        }
    }

    let mut rows: Vec<([String; 5], u64)> = counts.into_iter().collect();
    rows.sort_by(|(a, ca), (b, cb)| cb.cmp(ca).then_with(|| a.cmp(b)));

    Ok(rows
        .into_iter()
        .map(|([chromosome, start, end, reference, alternate], count)| CoordinateCount {
            chromosome,
            start,
            end,
            reference,
            alternate,
            count,
        })
        .collect())
}

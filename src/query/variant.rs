use std::fmt;

use crate::schema::columns;
use crate::store::ColumnEquals;

use super::QueryError;

/// Ensure a protein change carries the `p.` prefix.
///
/// ```
/// use cbiohub::query::normalize_protein_change;
///
/// assert_eq!(normalize_protein_change("R175H"), "p.R175H");
/// assert_eq!(normalize_protein_change("p.R175H"), "p.R175H");
/// ```
pub fn normalize_protein_change(protein_change: &str) -> String {
    let trimmed = protein_change.trim();
    if trimmed.starts_with("p.") {
        trimmed.to_string()
    } else {
        format!("p.{}", trimmed)
    }
}

fn required(name: &str, value: String) -> Result<String, QueryError> {
    let value = value.trim().to_string();
    if value.is_empty() {
        Err(QueryError::InvalidArgument(format!("{} must not be empty", name)))
    } else {
        Ok(value)
    }
}

/// Variant addressed by genomic coordinate.
///
/// Start and end are kept as text and compared exactly against the stored text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CoordinateKey {
    /// Chromosome
    pub chromosome: String,
    /// Start position
    pub start: String,
    /// End position
    pub end: String,
    /// Reference allele
    pub reference: String,
    /// Alternate allele (`Tumor_Seq_Allele2`)
    pub alternate: String,
}

impl CoordinateKey {
    /// Build a coordinate key; every field must be non-empty.
    pub fn new(
        chromosome: impl Into<String>,
        start: impl ToString,
        end: impl ToString,
        reference: impl Into<String>,
        alternate: impl Into<String>,
    ) -> Result<Self, QueryError> {
        Ok(Self {
            chromosome: required("chromosome", chromosome.into())?,
            start: required("start", start.to_string())?,
            end: required("end", end.to_string())?,
            reference: required("reference allele", reference.into())?,
            alternate: required("alternate allele", alternate.into())?,
        })
    }

    /// Equality predicates over the coordinate columns
    pub fn predicates(&self) -> Vec<ColumnEquals> {
        let values = [
            &self.chromosome,
            &self.start,
            &self.end,
            &self.reference,
            &self.alternate,
        ];
        columns::COORDINATE_COLUMNS
            .iter()
            .zip(values)
            .map(|(column, value)| ColumnEquals::new(*column, value.as_str()))
            .collect()
    }
}

impl fmt::Display for CoordinateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}-{} {}>{}",
            self.chromosome, self.start, self.end, self.reference, self.alternate
        )
    }
}

/// Variant addressed by gene symbol and protein change.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GeneKey {
    /// HUGO gene symbol
    pub gene: String,
    /// Protein change, always `p.`-prefixed
    pub protein_change: String,
}

impl GeneKey {
    /// Build a gene key, adding the `p.` prefix when missing.
    pub fn new(gene: impl Into<String>, protein_change: impl Into<String>) -> Result<Self, QueryError> {
        let gene = required("gene", gene.into())?;
        let protein_change = required("protein change", protein_change.into())?;
        Ok(Self {
            gene,
            protein_change: normalize_protein_change(&protein_change),
        })
    }

    /// Equality predicates over gene symbol and protein change
    pub fn predicates(&self) -> Vec<ColumnEquals> {
        vec![
            ColumnEquals::new(columns::HUGO_SYMBOL, self.gene.as_str()),
            ColumnEquals::new(columns::HGVSP_SHORT, self.protein_change.as_str()),
        ]
    }
}

impl fmt::Display for GeneKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.gene, self.protein_change)
    }
}

/// A validated variant address in one of the two lookup modes
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VariantKey {
    /// Coordinate mode
    Coordinate(CoordinateKey),
    /// Gene mode
    Gene(GeneKey),
}

impl VariantKey {
    /// Equality predicates for the key's mode
    pub fn predicates(&self) -> Vec<ColumnEquals> {
        match self {
            VariantKey::Coordinate(key) => key.predicates(),
            VariantKey::Gene(key) => key.predicates(),
        }
    }
}

impl fmt::Display for VariantKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariantKey::Coordinate(key) => write!(f, "{}", key),
            VariantKey::Gene(key) => write!(f, "{}", key),
        }
    }
}

/// Loosely specified lookup arguments, as they arrive from a caller.
///
/// Converting into a [`VariantKey`] selects the mode: all five coordinate fields, or
/// gene and protein change. Anything else (including both) is rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariantArgs {
    /// Chromosome
    pub chromosome: Option<String>,
    /// Start position
    pub start: Option<String>,
    /// End position
    pub end: Option<String>,
    /// Reference allele
    pub reference: Option<String>,
    /// Alternate allele
    pub alternate: Option<String>,
    /// Gene symbol
    pub gene: Option<String>,
    /// Protein change
    pub protein_change: Option<String>,
}

fn present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

impl TryFrom<VariantArgs> for VariantKey {
    type Error = QueryError;

    fn try_from(args: VariantArgs) -> Result<Self, Self::Error> {
        let coordinate = [
            &args.chromosome,
            &args.start,
            &args.end,
            &args.reference,
            &args.alternate,
        ];
        let coordinate_given = coordinate.iter().filter(|v| present(v)).count();
        let gene_given = [&args.gene, &args.protein_change]
            .iter()
            .filter(|v| present(v))
            .count();

        match (coordinate_given, gene_given) {
            (5, 0) => Ok(VariantKey::Coordinate(CoordinateKey::new(
                args.chromosome.unwrap_or_default(),
                args.start.unwrap_or_default(),
                args.end.unwrap_or_default(),
                args.reference.unwrap_or_default(),
                args.alternate.unwrap_or_default(),
            )?)),
            (0, 2) => Ok(VariantKey::Gene(GeneKey::new(
                args.gene.unwrap_or_default(),
                args.protein_change.unwrap_or_default(),
            )?)),
            (0, 0) => Err(QueryError::InvalidArgument(
                "provide either chromosome, start, end, reference and alternate, or gene and protein change".to_string(),
            )),
            (c, g) if c > 0 && g > 0 => Err(QueryError::InvalidArgument(
                "coordinate and gene arguments are mutually exclusive".to_string(),
            )),
            (c, 0) => Err(QueryError::InvalidArgument(format!(
                "coordinate mode needs all 5 fields, got {}",
                c
            ))),
            _ => Err(QueryError::InvalidArgument(
                "gene mode needs both gene and protein change".to_string(),
            )),
        }
    }
}

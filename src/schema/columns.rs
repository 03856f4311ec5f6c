/// Column names as constants for type safety
/// Chromosome of the variant (e.g. `17` or `chr17`)
pub const CHROMOSOME: &str = "Chromosome";
/// 1-based start position, stored as text
pub const START_POSITION: &str = "Start_Position";
/// 1-based end position, stored as text
pub const END_POSITION: &str = "End_Position";
/// Reference allele
pub const REFERENCE_ALLELE: &str = "Reference_Allele";
/// First tumor allele
pub const TUMOR_SEQ_ALLELE1: &str = "Tumor_Seq_Allele1";
/// Second tumor allele, used as the alternate allele in coordinate lookups
pub const TUMOR_SEQ_ALLELE2: &str = "Tumor_Seq_Allele2";
/// Tumor reference read count, stored as text
pub const T_REF_COUNT: &str = "t_ref_count";
/// Tumor alternate read count, stored as text
pub const T_ALT_COUNT: &str = "t_alt_count";
/// Normal reference read count, stored as text
pub const N_REF_COUNT: &str = "n_ref_count";
/// Normal alternate read count, stored as text
pub const N_ALT_COUNT: &str = "n_alt_count";
/// HUGO gene symbol
pub const HUGO_SYMBOL: &str = "Hugo_Symbol";
/// Short protein change notation (e.g. `p.R175H`)
pub const HGVSP_SHORT: &str = "HGVSp_Short";
/// Tumor sample barcode
pub const TUMOR_SAMPLE_BARCODE: &str = "Tumor_Sample_Barcode";
/// Study identifier stamped on every row
pub const STUDY_ID: &str = "study_id";

// Clinical columns

/// Sample identifier in the clinical sample table (joins to `Tumor_Sample_Barcode`)
pub const SAMPLE_ID: &str = "SAMPLE_ID";
/// Patient identifier in both clinical tables
pub const PATIENT_ID: &str = "PATIENT_ID";
/// Default clinical attribute for frequency queries
pub const CANCER_TYPE: &str = "CANCER_TYPE";

/// The five columns that address a variant by genomic coordinate, in key order.
pub const COORDINATE_COLUMNS: [&str; 5] = [
    CHROMOSOME,
    START_POSITION,
    END_POSITION,
    REFERENCE_ALLELE,
    TUMOR_SEQ_ALLELE2,
];

/// Canonical mutation columns in storage order.
pub const MUTATION_COLUMNS: [&str; 14] = [
    CHROMOSOME,
    START_POSITION,
    END_POSITION,
    REFERENCE_ALLELE,
    TUMOR_SEQ_ALLELE1,
    TUMOR_SEQ_ALLELE2,
    T_REF_COUNT,
    T_ALT_COUNT,
    N_REF_COUNT,
    N_ALT_COUNT,
    HUGO_SYMBOL,
    HGVSP_SHORT,
    TUMOR_SAMPLE_BARCODE,
    STUDY_ID,
];

//! Typed errors for malformed input.

use crate::pathways::Database;

/// Problems with the genotype matrix.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("invalid SNP label {label:?} in column {column} (expected rs<digits>)")]
    InvalidSnpLabel { column: usize, label: String },
    #[error("genotype matrix has no SNP columns")]
    NoSnpColumns,
    #[error("SNP {0} occurs in more than one column")]
    DuplicateSnp(String),
    #[error("patient {0} occurs in more than one row")]
    DuplicatePatient(String),
    #[error("row {row} has {actual} fields but header has {expected}")]
    RowLength {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("invalid allele count {value:?} for patient {patient} at {snp} (expected 0, 1, or 2)")]
    InvalidAlleleCount {
        patient: String,
        snp: String,
        value: String,
    },
}

/// Problems with the pathway membership artifacts.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MappingError {
    #[error("{database} mapping record #{index} lacks field {field}")]
    MissingField {
        database: Database,
        index: usize,
        field: &'static str,
    },
    #[error("{database} mapping record #{index} has namespace {namespace:?}")]
    NamespaceMismatch {
        database: Database,
        index: usize,
        namespace: String,
    },
}

/// Problems with obtaining annotations.
#[derive(thiserror::Error, Debug)]
pub enum AnnotationError {
    #[error("fetching annotations for {count} SNPs failed: {message}")]
    Fetch { count: usize, message: String },
    #[error("annotation cache: {0}")]
    Cache(String),
}

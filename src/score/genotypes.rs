//! The patient-by-SNP genotype matrix.

use std::{collections::BTreeSet, io::Read, path::Path};

use indexmap::IndexSet;

use crate::{
    common::{io::open_read_maybe_gz, is_dbsnp_id},
    err::InputError,
};

/// Allele counts by patient (rows) and SNP (columns).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenotypeMatrix {
    patients: IndexSet<String>,
    snps: IndexSet<String>,
    /// Row-major allele counts, one row per patient.
    counts: Vec<Vec<u8>>,
}

/// Check the header and return the SNP column labels.
///
/// The first column is the patient identifier, every further label must be an rs
/// identifier.  Fails on the first invalid label.
fn parse_header(header: &csv::StringRecord) -> Result<IndexSet<String>, InputError> {
    let mut snps = IndexSet::new();
    for (column, label) in header.iter().enumerate().skip(1) {
        if !is_dbsnp_id(label) {
            return Err(InputError::InvalidSnpLabel {
                column,
                label: label.to_string(),
            });
        }
        if !snps.insert(label.to_string()) {
            return Err(InputError::DuplicateSnp(label.to_string()));
        }
    }
    if snps.is_empty() {
        Err(InputError::NoSnpColumns)
    } else {
        Ok(snps)
    }
}

fn parse_count(patient: &str, snp: &str, value: &str) -> Result<u8, InputError> {
    match value.parse::<u8>() {
        Ok(count) if count <= 2 => Ok(count),
        _ => Err(InputError::InvalidAlleleCount {
            patient: patient.to_string(),
            snp: snp.to_string(),
            value: value.to_string(),
        }),
    }
}

impl GenotypeMatrix {
    /// Parse a delimited genotype table from `reader`.
    pub fn from_reader<R: Read>(reader: R, delimiter: u8) -> Result<Self, anyhow::Error> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let snps = parse_header(reader.headers()?)?;
        let expected = snps.len() + 1;

        let mut patients = IndexSet::new();
        let mut counts = Vec::new();
        for (row, result) in reader.records().enumerate() {
            let record = result?;
            if record.len() != expected {
                return Err(InputError::RowLength {
                    row: row + 1,
                    expected,
                    actual: record.len(),
                }
                .into());
            }
            let patient = &record[0];
            let row_counts = record
                .iter()
                .skip(1)
                .zip(snps.iter())
                .map(|(value, snp)| parse_count(patient, snp, value))
                .collect::<Result<Vec<_>, _>>()?;
            if !patients.insert(patient.to_string()) {
                return Err(InputError::DuplicatePatient(patient.to_string()).into());
            }
            counts.push(row_counts);
        }

        Ok(Self {
            patients,
            snps,
            counts,
        })
    }

    /// Load the genotype table at `path` (possibly gzip-compressed).
    pub fn from_path<P: AsRef<Path>>(path: P, delimiter: u8) -> Result<Self, anyhow::Error> {
        let path = path.as_ref();
        let reader = open_read_maybe_gz(path)
            .map_err(|e| anyhow::anyhow!("could not open {} for reading: {}", path.display(), e))?;
        Self::from_reader(reader, delimiter)
            .map_err(|e| anyhow::anyhow!("problem parsing {}: {}", path.display(), e))
    }

    /// SNP column labels in file order.
    pub fn snps(&self) -> &IndexSet<String> {
        &self.snps
    }

    /// The SNP universe, i.e., all column labels.
    pub fn universe(&self) -> BTreeSet<String> {
        self.snps.iter().cloned().collect()
    }

    /// Column index of `snp`.
    pub fn column(&self, snp: &str) -> Option<usize> {
        self.snps.get_index_of(snp)
    }

    /// Number of patients (rows).
    pub fn num_patients(&self) -> usize {
        self.patients.len()
    }

    /// Iterate over `(patient, allele counts)` in file order.
    pub fn rows(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.patients
            .iter()
            .map(String::as_str)
            .zip(self.counts.iter().map(Vec::as_slice))
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;

    fn parse(text: &str) -> Result<GenotypeMatrix, anyhow::Error> {
        GenotypeMatrix::from_reader(text.as_bytes(), b',')
    }

    fn input_error(text: &str) -> InputError {
        match parse(text) {
            Ok(matrix) => panic!("expected error, got {:?}", matrix),
            Err(e) => e.downcast::<InputError>().expect("must be an InputError"),
        }
    }

    #[test]
    fn from_path_fixture() -> Result<(), anyhow::Error> {
        let matrix = GenotypeMatrix::from_path("tests/score/genotypes.csv", b',')?;

        assert_eq!(
            vec!["rs1", "rs2", "rs3", "rs4"],
            matrix.snps().iter().collect::<Vec<_>>()
        );
        assert_eq!(3, matrix.num_patients());
        assert_eq!(
            vec![
                ("P1", &[2u8, 0, 1, 0][..]),
                ("P2", &[0, 1, 2, 1][..]),
                ("P3", &[1, 1, 0, 2][..]),
            ],
            matrix.rows().collect::<Vec<_>>()
        );
        assert_eq!(Some(2), matrix.column("rs3"));
        assert_eq!(None, matrix.column("rs5"));

        Ok(())
    }

    #[test]
    fn tab_separated_with_whitespace() -> Result<(), anyhow::Error> {
        let matrix = GenotypeMatrix::from_reader("id\trs10\trs2\nA\t 1\t2 \n".as_bytes(), b'\t')?;

        assert_eq!(vec![("A", &[1u8, 2][..])], matrix.rows().collect::<Vec<_>>());

        Ok(())
    }

    #[test]
    fn fixture_with_invalid_label() {
        let err = GenotypeMatrix::from_path("tests/score/genotypes_bad_label.csv", b',')
            .expect_err("must fail");
        assert!(err.to_string().contains("chr1_12345"), "{}", err);
    }

    #[rstest::rstest]
    #[case::position_label(
        "patient,rs1,chr1_12345\nP1,0,1\n",
        InputError::InvalidSnpLabel { column: 2, label: "chr1_12345".into() }
    )]
    #[case::first_violation_wins(
        "patient,x1,rs1,y2\n",
        InputError::InvalidSnpLabel { column: 1, label: "x1".into() }
    )]
    #[case::no_snps("patient\nP1\n", InputError::NoSnpColumns)]
    #[case::duplicate_snp("patient,rs1,rs1\nP1,0,1\n", InputError::DuplicateSnp("rs1".into()))]
    #[case::duplicate_patient(
        "patient,rs1\nP1,0\nP1,1\n",
        InputError::DuplicatePatient("P1".into())
    )]
    #[case::short_row(
        "patient,rs1,rs2\nP1,0,1\nP2,1\n",
        InputError::RowLength { row: 2, expected: 3, actual: 2 }
    )]
    #[case::count_out_of_range(
        "patient,rs1\nP1,3\n",
        InputError::InvalidAlleleCount { patient: "P1".into(), snp: "rs1".into(), value: "3".into() }
    )]
    #[case::count_not_a_number(
        "patient,rs1\nP1,NA\n",
        InputError::InvalidAlleleCount { patient: "P1".into(), snp: "rs1".into(), value: "NA".into() }
    )]
    #[case::count_negative(
        "patient,rs1\nP1,-1\n",
        InputError::InvalidAlleleCount { patient: "P1".into(), snp: "rs1".into(), value: "-1".into() }
    )]
    fn malformed(#[case] text: &str, #[case] expected: InputError) {
        assert_eq!(expected, input_error(text));
    }
}

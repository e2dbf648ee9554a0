//! Code for reading (and writing) the pathway membership artifacts.
//!
//! Two equivalent shapes exist.  The JSON artifact holds one record per pathway:
//!
//! ```text
//! [{"pathway": {"namespace": "kegg", "identifier": "hsa00010", "name": "..."},
//!   "snps": [{"namespace": "dbsnp", "identifier": "rs1"}, ...]}, ...]
//! ```
//!
//! The TSV artifact has the columns `pathway_namespace`, `pathway_identifier`,
//! `pathway_name`, and `snps` (comma-separated, possibly empty).  Pathway fields are
//! optional on reading so that missing values can be reported precisely when merging.

use std::{io::Write, path::Path};

use serde::{Deserialize, Serialize};

use crate::common::io::{open_read_maybe_gz, open_write_maybe_gz};

/// Namespace used for SNP blocks.
pub const DBSNP_NAMESPACE: &str = "dbsnp";

/// The pathway block of a record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathwayBlock {
    pub namespace: Option<String>,
    pub identifier: Option<String>,
    pub name: Option<String>,
}

/// One SNP block of a record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnpBlock {
    pub namespace: Option<String>,
    pub identifier: Option<String>,
}

impl SnpBlock {
    /// Construct a dbSNP block for `identifier`.
    pub fn dbsnp(identifier: &str) -> Self {
        Self {
            namespace: Some(DBSNP_NAMESPACE.to_string()),
            identifier: Some(identifier.to_string()),
        }
    }
}

/// One pathway with its SNPs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub pathway: Option<PathwayBlock>,
    pub snps: Option<Vec<SnpBlock>>,
}

/// Row of the TSV artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TsvRecord {
    pub pathway_namespace: Option<String>,
    pub pathway_identifier: Option<String>,
    pub pathway_name: Option<String>,
    /// Comma-separated SNPs; an empty cell is an empty list.
    pub snps: String,
}

impl From<TsvRecord> for Record {
    fn from(val: TsvRecord) -> Self {
        Record {
            pathway: Some(PathwayBlock {
                namespace: val.pathway_namespace,
                identifier: val.pathway_identifier,
                name: val.pathway_name,
            }),
            snps: Some(
                val.snps
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(SnpBlock::dbsnp)
                    .collect(),
            ),
        }
    }
}

impl From<&Record> for TsvRecord {
    fn from(val: &Record) -> Self {
        let pathway = val.pathway.clone().unwrap_or_default();
        TsvRecord {
            pathway_namespace: pathway.namespace,
            pathway_identifier: pathway.identifier,
            pathway_name: pathway.name,
            snps: val
                .snps
                .iter()
                .flatten()
                .filter_map(|snp| snp.identifier.as_deref())
                .collect::<Vec<_>>()
                .join(","),
        }
    }
}

/// Whether `path` names a TSV artifact (possibly gzip-compressed).
fn is_tsv(path: &Path) -> bool {
    let name = path.to_string_lossy();
    name.ends_with(".tsv") || name.ends_with(".tsv.gz")
}

/// Read the records from a JSON or TSV artifact, depending on the file name.
pub fn load_records<P: AsRef<Path>>(path: P) -> Result<Vec<Record>, anyhow::Error> {
    let path = path.as_ref();
    let reader = open_read_maybe_gz(path)
        .map_err(|e| anyhow::anyhow!("could not open {} for reading: {}", path.display(), e))?;
    if is_tsv(path) {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(true)
            .from_reader(reader);
        let mut records = Vec::new();
        for result in reader.deserialize() {
            let record: TsvRecord =
                result.map_err(|e| anyhow::anyhow!("problem parsing {}: {}", path.display(), e))?;
            records.push(record.into());
        }
        Ok(records)
    } else {
        serde_json::from_reader(reader)
            .map_err(|e| anyhow::anyhow!("problem parsing {}: {}", path.display(), e))
    }
}

/// Write `records` as a JSON artifact.
pub fn write_json<P: AsRef<Path>>(path: P, records: &[Record]) -> Result<(), anyhow::Error> {
    let path = path.as_ref();
    let mut writer = open_write_maybe_gz(path)
        .map_err(|e| anyhow::anyhow!("could not open {} for writing: {}", path.display(), e))?;
    serde_json::to_writer_pretty(&mut writer, records)?;
    writer.flush()?;
    Ok(())
}

/// Write `records` as a TSV artifact.
pub fn write_tsv<P: AsRef<Path>>(path: P, records: &[Record]) -> Result<(), anyhow::Error> {
    let path = path.as_ref();
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .from_writer(open_write_maybe_gz(path).map_err(|e| {
            anyhow::anyhow!("could not open {} for writing: {}", path.display(), e)
        })?);
    for record in records {
        writer.serialize(TsvRecord::from(record))?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn load_json() -> Result<(), anyhow::Error> {
        let records = load_records("tests/pathways/kegg.json")?;

        assert_eq!(2, records.len());
        assert_eq!(
            Some(PathwayBlock {
                namespace: Some("kegg".into()),
                identifier: Some("hsa00010".into()),
                name: Some("Glycolysis / Gluconeogenesis".into()),
            }),
            records[0].pathway
        );
        assert_eq!(
            Some(vec![
                SnpBlock::dbsnp("rs1"),
                SnpBlock::dbsnp("rs2"),
                SnpBlock::dbsnp("rs99")
            ]),
            records[0].snps
        );

        Ok(())
    }

    #[test]
    fn load_tsv() -> Result<(), anyhow::Error> {
        let records = load_records("tests/pathways/reactome.tsv")?;

        assert_eq!(2, records.len());
        assert_eq!(
            Some("R-HSA-1640170".to_string()),
            records[0].pathway.as_ref().and_then(|p| p.identifier.clone())
        );
        assert_eq!(
            Some(vec![SnpBlock::dbsnp("rs1"), SnpBlock::dbsnp("rs3")]),
            records[0].snps
        );

        Ok(())
    }

    #[test]
    fn tsv_missing_identifier_is_none() -> Result<(), anyhow::Error> {
        let records = load_records("tests/pathways/malformed/kegg.tsv")?;

        assert_eq!(
            None,
            records[0].pathway.as_ref().and_then(|p| p.identifier.clone())
        );

        Ok(())
    }

    #[test]
    fn tsv_empty_snps_is_empty_list() -> Result<(), anyhow::Error> {
        let records = load_records("tests/pathways/empty_snps/kegg.tsv")?;

        assert_eq!(Some(vec![]), records[1].snps);

        Ok(())
    }

    #[test]
    fn tsv_without_snps_column_fails() -> Result<(), anyhow::Error> {
        let tmp_dir = temp_testdir::TempDir::default();
        let path = tmp_dir.join("kegg.tsv");
        std::fs::write(
            &path,
            "pathway_namespace\tpathway_identifier\tpathway_name\nkegg\thsa00010\tx\n",
        )?;

        assert!(load_records(&path).is_err());

        Ok(())
    }

    #[rstest::rstest]
    #[case("out.json.gz")]
    #[case("out.tsv")]
    fn write_and_reload(#[case] filename: &str) -> Result<(), anyhow::Error> {
        let tmp_dir = temp_testdir::TempDir::default();
        let records = load_records("tests/pathways/kegg.json")?;

        let path = tmp_dir.join(filename);
        if is_tsv(&path) {
            write_tsv(&path, &records)?;
        } else {
            write_json(&path, &records)?;
        }

        assert_eq!(records, load_records(&path)?);

        Ok(())
    }

    #[test]
    fn write_tsv_snapshot() -> Result<(), anyhow::Error> {
        let tmp_dir = temp_testdir::TempDir::default();
        let records = load_records("tests/pathways/kegg.json")?;

        write_tsv(tmp_dir.join("kegg.tsv"), &records)?;

        let output = std::fs::read_to_string(tmp_dir.join("kegg.tsv"))?;
        insta::assert_snapshot!(output, @r###"
        pathway_namespace	pathway_identifier	pathway_name	snps
        kegg	hsa00010	Glycolysis / Gluconeogenesis	rs1,rs2,rs99
        kegg	hsa04110	Cell cycle	rs100,rs101
        "###);

        Ok(())
    }
}

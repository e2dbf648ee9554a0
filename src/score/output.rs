//! Writing of the score table and the impactful-SNP side artifact.

use std::io::Write;

use serde::Serialize;

use crate::pathways::input::{PathwayBlock, Record, SnpBlock};

use super::{impact::ImpactMap, relevant::RelevantMembership};

/// One row of the score table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreRow {
    /// Patient identifier.
    pub patient: String,
    /// Pathway as `database:identifier`.
    pub pathway: String,
    /// Burden score in `[0, 2]`.
    pub score: f64,
}

/// Write `rows` with a header line, separated by `delimiter`.
pub fn write_scores<W: Write>(
    writer: W,
    delimiter: u8,
    rows: &[ScoreRow],
) -> Result<(), anyhow::Error> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .from_writer(writer);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Surviving pathways with their relevant impactful SNPs, as membership records.
pub fn impactful_records(relevant: &RelevantMembership, impact: &ImpactMap) -> Vec<Record> {
    relevant
        .iter()
        .map(|(key, snps)| Record {
            pathway: Some(PathwayBlock {
                namespace: Some(key.database.to_string()),
                identifier: Some(key.identifier.clone()),
                name: Some(key.name.clone()),
            }),
            snps: Some(
                snps.iter()
                    .filter(|snp| impact.get(*snp).copied().unwrap_or(false))
                    .map(SnpBlock::dbsnp)
                    .collect(),
            ),
        })
        .collect()
}

//! Merging of per-database mapping records into one membership.

use indexmap::IndexSet;

use crate::err::MappingError;

use super::{
    input::{Record, DBSNP_NAMESPACE},
    Database, Membership, PathwayKey,
};

/// Convert one record into its key and SNP set.
fn convert(
    database: Database,
    index: usize,
    record: Record,
) -> Result<(PathwayKey, IndexSet<String>), MappingError> {
    let missing = |field| MappingError::MissingField {
        database,
        index,
        field,
    };

    let pathway = record.pathway.ok_or_else(|| missing("pathway"))?;
    if let Some(namespace) = pathway.namespace {
        if !namespace.eq_ignore_ascii_case(&database.to_string()) {
            return Err(MappingError::NamespaceMismatch {
                database,
                index,
                namespace,
            });
        }
    }
    let identifier = pathway
        .identifier
        .filter(|s| !s.is_empty())
        .ok_or_else(|| missing("pathway.identifier"))?;

    let mut snps = IndexSet::new();
    for snp in record.snps.ok_or_else(|| missing("snps"))? {
        if let Some(namespace) = snp.namespace {
            if namespace != DBSNP_NAMESPACE {
                return Err(MappingError::NamespaceMismatch {
                    database,
                    index,
                    namespace,
                });
            }
        }
        snps.insert(
            snp.identifier
                .filter(|s| !s.is_empty())
                .ok_or_else(|| missing("snps.identifier"))?,
        );
    }

    Ok((
        PathwayKey {
            database,
            identifier,
            name: pathway.name.unwrap_or_default(),
        },
        snps,
    ))
}

/// Flatten the mapping records of each database into one membership.
///
/// Databases are merged in the order given and records in file order.  The same
/// SNP may well appear in pathways of several databases.
pub fn merge<I>(mappings: I) -> Result<Membership, MappingError>
where
    I: IntoIterator<Item = (Database, Vec<Record>)>,
{
    let mut result = Membership::new();
    for (database, records) in mappings {
        for (index, record) in records.into_iter().enumerate() {
            let (key, snps) = convert(database, index, record)?;
            result.entry(key).or_default().extend(snps);
        }
    }
    Ok(result)
}

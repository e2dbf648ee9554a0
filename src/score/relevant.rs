//! Restriction of pathway membership to the SNPs observed in the genotype matrix.

use std::num::NonZeroUsize;

use enum_map::EnumMap;
use indexmap::{IndexMap, IndexSet};

use crate::pathways::{Database, Membership, PathwayKey};

/// The SNPs of one pathway that occur in the dataset; never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelevantSnps {
    snps: IndexSet<String>,
    count: NonZeroUsize,
}

impl RelevantSnps {
    /// Wrap `snps`, `None` if empty.
    pub fn new(snps: IndexSet<String>) -> Option<Self> {
        NonZeroUsize::new(snps.len()).map(|count| Self { snps, count })
    }

    /// Number of relevant SNPs, the score denominator.
    pub fn count(&self) -> NonZeroUsize {
        self.count
    }

    /// Iterate over the SNPs in membership order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.snps.iter().map(String::as_str)
    }
}

/// Pathways surviving the restriction, in membership order.
pub type RelevantMembership = IndexMap<PathwayKey, RelevantSnps>;

/// Intersect each pathway's SNPs with `universe`, dropping empty intersections.
///
/// Returns the surviving pathways and the number of dropped pathways per database.
pub fn restrict(
    membership: &Membership,
    universe: &IndexSet<String>,
) -> (RelevantMembership, EnumMap<Database, usize>) {
    let mut dropped: EnumMap<Database, usize> = EnumMap::default();
    let mut relevant = RelevantMembership::new();
    for (key, snps) in membership {
        let observed = snps
            .iter()
            .filter(|snp| universe.contains(*snp))
            .cloned()
            .collect::<IndexSet<_>>();
        match RelevantSnps::new(observed) {
            Some(observed) => {
                relevant.insert(key.clone(), observed);
            }
            None => {
                tracing::debug!(
                    "dropping pathway {} ({}) without observed SNPs",
                    key.curie(),
                    &key.name
                );
                dropped[key.database] += 1;
            }
        }
    }
    (relevant, dropped)
}

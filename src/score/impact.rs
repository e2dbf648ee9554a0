//! Resolution of per-SNP impactfulness from annotation records.

use std::collections::{BTreeMap, BTreeSet};

use thousands::Separable;

use crate::annos::{classify::is_impactful, rsid_of, AnnotationSource};

/// Impactfulness by rs identifier; SNPs without records are absent.
pub type ImpactMap = BTreeMap<String, bool>;

/// Fetch the records for `universe` in one call and classify them.
///
/// A SNP with several records is impactful if any of them is.
pub fn resolve(
    universe: &BTreeSet<String>,
    source: &dyn AnnotationSource,
) -> Result<ImpactMap, anyhow::Error> {
    let records = source.fetch(universe)?;

    let mut impact = ImpactMap::new();
    for record in &records {
        let Some(rsid) = rsid_of(record) else {
            tracing::warn!("skipping annotation record without rs identifier");
            continue;
        };
        *impact.entry(rsid.to_string()).or_default() |= is_impactful(record);
    }

    tracing::info!(
        "{} of {} SNPs annotated, {} impactful",
        impact.len().separate_with_commas(),
        universe.len().separate_with_commas(),
        impact.values().filter(|v| **v).count().separate_with_commas()
    );
    Ok(impact)
}

//! Computation of the per-patient burden score of one pathway.

use super::{genotypes::GenotypeMatrix, impact::ImpactMap, relevant::RelevantSnps};

/// Score every patient of `matrix` for one pathway.
///
/// The score is the sum of allele counts at the relevant SNPs marked impactful,
/// divided by the number of all relevant SNPs.  It therefore lies in `[0, 2]`.
pub fn score<'a>(
    relevant: &RelevantSnps,
    impact: &ImpactMap,
    matrix: &'a GenotypeMatrix,
) -> Vec<(&'a str, f64)> {
    let columns = relevant
        .iter()
        .filter(|snp| impact.get(*snp).copied().unwrap_or(false))
        .filter_map(|snp| matrix.column(snp))
        .collect::<Vec<_>>();
    let denominator = relevant.count().get() as f64;

    matrix
        .rows()
        .map(|(patient, counts)| {
            let burden: u32 = columns.iter().map(|i| u32::from(counts[*i])).sum();
            (patient, f64::from(burden) / denominator)
        })
        .collect()
}

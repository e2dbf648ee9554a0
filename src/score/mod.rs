//! Implementation of the `score` sub command.

pub mod calc;
pub mod genotypes;
pub mod impact;
pub mod output;
pub mod relevant;

use std::{path::Path, time::Instant};

use clap::Parser;
use itertools::Itertools;
use rayon::prelude::*;
use thousands::Separable;

use crate::{
    annos::{fetch::SourceArgs, AnnotationSource},
    common::{
        expand_path,
        io::{open_write_maybe_gz, parse_delimiter},
    },
    pathways::{self, Database},
};

use self::{genotypes::GenotypeMatrix, output::ScoreRow};

/// Command line arguments for `score` sub command.
#[derive(Parser, Debug)]
#[command(author, version, about = "Compute pathway impact scores per patient", long_about = None)]
pub struct Args {
    /// Path to genotype table (patient column, then one column per rs identifier).
    #[arg(long, required = true)]
    pub path_input: String,
    /// Path to output score table.
    #[arg(long, required = true)]
    pub path_output: String,
    /// Directory with the `<database>.json` or `<database>.tsv` mapping artifacts.
    #[arg(long, required = true)]
    pub path_mappings: String,
    /// Databases to use, merged in the order given.
    #[arg(
        long = "database",
        value_enum,
        default_values_t = [Database::Kegg, Database::Wikipathways, Database::Reactome]
    )]
    pub databases: Vec<Database>,
    /// Delimiter of input and output tables.
    #[arg(long, default_value = ",")]
    pub sep: String,
    /// Optional path to write the impactful relevant SNPs per pathway to (JSON).
    #[arg(long)]
    pub path_impactful: Option<String>,
    /// Optional number of threads to use for scoring.
    #[arg(long)]
    pub num_threads: Option<usize>,

    #[command(flatten)]
    pub source: SourceArgs,
}

/// Score all patients of `matrix` against the pathways of `databases`.
///
/// The annotation source is queried once for the whole SNP universe before the
/// membership is loaded.  Rows are ordered pathway-major, patient-minor.
pub fn run_pipeline(
    matrix: &GenotypeMatrix,
    source: &dyn AnnotationSource,
    path_mappings: &str,
    databases: &[Database],
    path_impactful: Option<&Path>,
) -> Result<Vec<ScoreRow>, anyhow::Error> {
    let universe = matrix.universe();
    tracing::info!(
        "Resolving impact of {} SNPs...",
        universe.len().separate_with_commas()
    );
    let before_resolve = Instant::now();
    let impact = impact::resolve(&universe, source)?;
    tracing::info!("... done in {:?}", before_resolve.elapsed());

    let membership = pathways::load_membership(path_mappings, databases)?;
    let (relevant, dropped) = relevant::restrict(&membership, matrix.snps());
    for (database, count) in dropped.iter().filter(|(_, count)| **count > 0) {
        tracing::info!(
            "Dropped {} {} pathways without observed SNPs",
            count.separate_with_commas(),
            database
        );
    }
    tracing::info!(
        "Scoring {} of {} pathways",
        relevant.len().separate_with_commas(),
        membership.len().separate_with_commas()
    );

    if let Some(path_impactful) = path_impactful {
        tracing::info!("Writing impactful SNPs to {}", path_impactful.display());
        pathways::input::write_json(
            path_impactful,
            &output::impactful_records(&relevant, &impact),
        )?;
    }

    let before_scoring = Instant::now();
    let rows = relevant
        .iter()
        .collect::<Vec<_>>()
        .par_iter()
        .map(|(key, snps)| {
            let pathway = key.curie();
            calc::score(snps, &impact, matrix)
                .into_iter()
                .map(|(patient, score)| ScoreRow {
                    patient: patient.to_string(),
                    pathway: pathway.clone(),
                    score,
                })
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>()
        .into_iter()
        .flatten()
        .collect::<Vec<_>>();
    tracing::info!(
        "Computed {} scores in {:?}",
        rows.len().separate_with_commas(),
        before_scoring.elapsed()
    );

    Ok(rows)
}

/// Run the whole sub command against the given annotation source.
pub fn run_with_source(args: &Args, source: &dyn AnnotationSource) -> Result<usize, anyhow::Error> {
    let delimiter = parse_delimiter(&args.sep)?;
    let databases = args.databases.iter().copied().unique().collect::<Vec<_>>();

    tracing::info!("Loading genotypes...");
    let before_loading = Instant::now();
    let matrix = GenotypeMatrix::from_path(expand_path(&args.path_input), delimiter)?;
    tracing::info!(
        "... done loading {} patients x {} SNPs in {:?}",
        matrix.num_patients().separate_with_commas(),
        matrix.snps().len().separate_with_commas(),
        before_loading.elapsed()
    );

    let path_impactful = args.path_impactful.as_deref().map(expand_path);
    let rows = run_pipeline(
        &matrix,
        source,
        &expand_path(&args.path_mappings),
        &databases,
        path_impactful.as_ref().map(Path::new),
    )?;

    let path_output = expand_path(&args.path_output);
    let writer = open_write_maybe_gz(&path_output)
        .map_err(|e| anyhow::anyhow!("could not open {} for writing: {}", &path_output, e))?;
    output::write_scores(writer, delimiter, &rows)?;

    Ok(rows.len())
}

/// Main entry point for `score` sub command.
pub fn run(args_common: &crate::common::Args, args: &Args) -> Result<(), anyhow::Error> {
    let before_anything = Instant::now();
    tracing::info!("args_common = {:?}", &args_common);
    tracing::info!("args = {:?}", &args);

    if let Some(num_threads) = args.num_threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .map_err(|e| anyhow::anyhow!("building global Rayon thread pool failed: {}", e))?;
    }

    let source = args.source.build()?;
    let count = run_with_source(args, source.as_ref())?;
    tracing::info!(
        "Wrote {} rows to {}",
        count.separate_with_commas(),
        &args.path_output
    );

    tracing::info!(
        "All of `score` completed in {:?}",
        before_anything.elapsed()
    );
    Ok(())
}

//! Implementation of the `mappings build` sub command.
//!
//! Pathways are related to SNPs through genes: a pathway's SNPs are the union of
//! the catalog SNPs of all its member genes.

use std::{path::PathBuf, time::Instant};

use clap::Parser;
use indexmap::{IndexMap, IndexSet};
use thousands::Separable;

use crate::common::{expand_path, io::open_read_maybe_gz};

use super::{
    input::{write_json, write_tsv, PathwayBlock, Record, SnpBlock},
    Database,
};

/// Command line arguments for `mappings build` sub command.
#[derive(Parser, Debug)]
#[command(author, version, about = "Build pathway to SNP mappings", long_about = None)]
pub struct Args {
    /// Path to the gene/SNP catalog TSV with columns `snp` and `gene_name`.
    #[arg(long, required = true)]
    pub path_catalog: String,
    /// Pathway/gene TSV for one database, given as `<database>=<path>`.
    #[arg(long = "pathway-genes", required = true, value_parser = parse_database_path)]
    pub pathway_genes: Vec<(Database, String)>,
    /// Directory to write `<database>.json` and `<database>.tsv` to.
    #[arg(long, required = true)]
    pub path_out_dir: String,
}

/// Parse a `<database>=<path>` command line value.
fn parse_database_path(s: &str) -> Result<(Database, String), String> {
    let (database, path) = s
        .split_once('=')
        .ok_or_else(|| format!("expected <database>=<path>, got {:?}", s))?;
    let database = database
        .parse::<Database>()
        .map_err(|e| format!("invalid database {:?}: {}", database, e))?;
    Ok((database, path.to_string()))
}

/// Row of the gene/SNP catalog; additional columns are ignored.
#[derive(Debug, Clone, serde::Deserialize)]
struct CatalogRecord {
    snp: String,
    gene_name: Option<String>,
}

/// Row of a pathway/gene table.
#[derive(Debug, Clone, serde::Deserialize)]
struct PathwayGeneRecord {
    pathway_identifier: String,
    pathway_name: String,
    gene_symbol: String,
}

/// Load mapping from gene symbol to its SNPs, skipping rows without gene.
fn load_gene_to_snps(path: &str) -> Result<IndexMap<String, IndexSet<String>>, anyhow::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .from_reader(open_read_maybe_gz(path)?);
    let mut result: IndexMap<String, IndexSet<String>> = IndexMap::new();
    for record in reader.deserialize() {
        let record: CatalogRecord =
            record.map_err(|e| anyhow::anyhow!("problem parsing {}: {}", path, e))?;
        if let Some(gene_name) = record.gene_name.filter(|s| !s.is_empty()) {
            result.entry(gene_name).or_default().insert(record.snp);
        }
    }
    Ok(result)
}

/// Load mapping from `(identifier, name)` to gene symbols.
fn load_pathway_to_genes(
    path: &str,
) -> Result<IndexMap<(String, String), IndexSet<String>>, anyhow::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .from_reader(open_read_maybe_gz(path)?);
    let mut result: IndexMap<(String, String), IndexSet<String>> = IndexMap::new();
    for record in reader.deserialize() {
        let record: PathwayGeneRecord =
            record.map_err(|e| anyhow::anyhow!("problem parsing {}: {}", path, e))?;
        result
            .entry((record.pathway_identifier, record.pathway_name))
            .or_default()
            .insert(record.gene_symbol);
    }
    Ok(result)
}

/// Combine pathway/gene and gene/SNP mappings into mapping records.
///
/// Pathways without any SNP are omitted.
pub fn pathway_records(
    database: Database,
    pathway_to_genes: &IndexMap<(String, String), IndexSet<String>>,
    gene_to_snps: &IndexMap<String, IndexSet<String>>,
) -> Vec<Record> {
    pathway_to_genes
        .iter()
        .filter_map(|((identifier, name), genes)| {
            let snps = genes
                .iter()
                .filter_map(|gene| gene_to_snps.get(gene))
                .flatten()
                .collect::<IndexSet<_>>();
            if snps.is_empty() {
                None
            } else {
                Some(Record {
                    pathway: Some(PathwayBlock {
                        namespace: Some(database.to_string()),
                        identifier: Some(identifier.clone()),
                        name: Some(name.clone()),
                    }),
                    snps: Some(snps.into_iter().map(|snp| SnpBlock::dbsnp(snp)).collect()),
                })
            }
        })
        .collect()
}

/// Main entry point for `mappings build` sub command.
pub fn run(args_common: &crate::common::Args, args: &Args) -> Result<(), anyhow::Error> {
    let before_anything = Instant::now();
    tracing::info!("args_common = {:?}", &args_common);
    tracing::info!("args = {:?}", &args);

    tracing::info!("Loading gene to SNP catalog...");
    let gene_to_snps = load_gene_to_snps(&expand_path(&args.path_catalog))?;
    tracing::info!(
        "... done loading SNPs for {} genes",
        gene_to_snps.len().separate_with_commas()
    );

    let out_dir = PathBuf::from(expand_path(&args.path_out_dir));
    std::fs::create_dir_all(&out_dir)
        .map_err(|e| anyhow::anyhow!("could not create {}: {}", out_dir.display(), e))?;

    for (database, path) in &args.pathway_genes {
        tracing::info!("Generating pathway/SNP mapping for {}", database);
        let pathway_to_genes = load_pathway_to_genes(&expand_path(path))?;
        let records = pathway_records(*database, &pathway_to_genes, &gene_to_snps);
        tracing::info!(
            "  {} of {} pathways have SNPs",
            records.len().separate_with_commas(),
            pathway_to_genes.len().separate_with_commas()
        );

        write_tsv(out_dir.join(format!("{}.tsv", database)), &records)?;
        write_json(out_dir.join(format!("{}.json", database)), &records)?;
    }

    tracing::info!(
        "All of `mappings build` completed in {:?}",
        before_anything.elapsed()
    );
    Ok(())
}

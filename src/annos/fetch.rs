//! Implementation of the `annos fetch` sub command.

use std::{
    collections::BTreeSet,
    io::Write,
    path::{Path, PathBuf},
    time::Instant,
};

use clap::Parser;
use thousands::Separable;

use crate::{
    common::{expand_path, io::open_write_maybe_gz},
    pathways::{load_membership, Database},
};

use super::{
    cache::{AnnotationCache, CachedSource},
    client::{MyVariantClient, DEFAULT_API_URL, MAX_BATCH_SIZE},
    AnnotationSource,
};

/// Options for building the annotation source, shared with `score`.
#[derive(Parser, Debug, Clone)]
pub struct SourceArgs {
    /// Base URL of the MyVariant.info API.
    #[arg(long, default_value = DEFAULT_API_URL)]
    pub api_url: String,
    /// Number of identifiers per request.
    #[arg(long, default_value_t = MAX_BATCH_SIZE)]
    pub batch_size: usize,
    /// Optional path to RocksDB directory for caching annotation records.
    #[arg(long)]
    pub path_cache: Option<String>,
}

impl SourceArgs {
    /// Build the client, wrapped in the cache if configured.
    pub fn build(&self) -> Result<Box<dyn AnnotationSource>, anyhow::Error> {
        let client = MyVariantClient::new(&self.api_url, self.batch_size)?;
        Ok(match self.path_cache.as_ref() {
            Some(path_cache) => {
                let path_cache = expand_path(path_cache);
                tracing::info!("Using annotation cache at {}", &path_cache);
                Box::new(CachedSource::new(client, AnnotationCache::open(path_cache)?))
            }
            None => Box::new(client),
        })
    }
}

/// Command line arguments for `annos fetch` sub command.
#[derive(Parser, Debug)]
#[command(author, version, about = "Fetch annotations for the SNPs of a pathway mapping", long_about = None)]
pub struct Args {
    /// Directory with the mapping artifacts.
    #[arg(long, required = true)]
    pub path_mappings: String,
    /// Database whose SNPs to look up.
    #[arg(long, value_enum)]
    pub database: Database,
    /// Path to output JSON; defaults to `<database>_snp_scores.json` in the mappings directory.
    #[arg(long)]
    pub path_output: Option<String>,

    #[command(flatten)]
    pub source: SourceArgs,
}

/// Look up all SNPs of `database` in `source` and write the records to `path_output`.
pub fn fetch_for_database(
    source: &dyn AnnotationSource,
    path_mappings: &str,
    database: Database,
    path_output: &Path,
) -> Result<usize, anyhow::Error> {
    let membership = load_membership(path_mappings, &[database])?;
    let ids = membership
        .values()
        .flatten()
        .cloned()
        .collect::<BTreeSet<_>>();
    tracing::info!(
        "Got {} SNPs from {}",
        ids.len().separate_with_commas(),
        database
    );

    let records = source.fetch(&ids)?;

    let mut writer = open_write_maybe_gz(path_output).map_err(|e| {
        anyhow::anyhow!("could not open {} for writing: {}", path_output.display(), e)
    })?;
    serde_json::to_writer_pretty(&mut writer, &records)?;
    writer.flush()?;

    Ok(records.len())
}

/// Main entry point for `annos fetch` sub command.
pub fn run(args_common: &crate::common::Args, args: &Args) -> Result<(), anyhow::Error> {
    let before_anything = Instant::now();
    tracing::info!("args_common = {:?}", &args_common);
    tracing::info!("args = {:?}", &args);

    let path_mappings = expand_path(&args.path_mappings);
    let path_output = match args.path_output.as_ref() {
        Some(path_output) => PathBuf::from(expand_path(path_output)),
        None => PathBuf::from(&path_mappings).join(format!("{}_snp_scores.json", args.database)),
    };

    let source = args.source.build()?;
    let count = fetch_for_database(source.as_ref(), &path_mappings, args.database, &path_output)?;
    tracing::info!(
        "Wrote {} records to {}",
        count.separate_with_commas(),
        path_output.display()
    );

    tracing::info!(
        "All of `annos fetch` completed in {:?}",
        before_anything.elapsed()
    );
    Ok(())
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::annos::{load_records, rsid_of, testing::FixedSource};

    #[test]
    fn fetch_for_database_writes_records() -> Result<(), anyhow::Error> {
        let tmp_dir = temp_testdir::TempDir::default();
        let source = FixedSource::from_path("tests/annos/records.json");
        let path_output = tmp_dir.join("kegg_snp_scores.json");

        let count = fetch_for_database(&source, "tests/pathways", Database::Kegg, &path_output)?;

        // kegg has rs1, rs2, rs99, rs100, rs101; rs1 has two records
        assert_eq!(3, count);
        assert_eq!(1, source.calls());
        assert_eq!(5, source.requested());
        let written = load_records(&path_output)?;
        assert_eq!(
            vec!["rs1", "rs1", "rs2"],
            written.iter().filter_map(rsid_of).collect::<Vec<_>>()
        );

        Ok(())
    }

    #[test]
    fn source_args_with_cache() -> Result<(), anyhow::Error> {
        let tmp_dir = temp_testdir::TempDir::default();
        let args = SourceArgs {
            api_url: DEFAULT_API_URL.into(),
            batch_size: 10,
            path_cache: Some(tmp_dir.join("cache").to_string_lossy().to_string()),
        };

        args.build()?;
        assert!(tmp_dir.join("cache").exists());

        Ok(())
    }
}

//! Pathway databases and pathway-to-SNP membership.

pub mod build;
pub mod input;
pub mod merge;

use std::path::{Path, PathBuf};

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use strum::EnumString;

/// Enum for the supported pathway databases.
///
/// The declaration order is the order in which the databases are merged.
#[derive(
    Serialize,
    Deserialize,
    enum_map::Enum,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Clone,
    Copy,
    Debug,
    EnumString,
    clap::ValueEnum,
    strum::Display,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Database {
    /// KEGG
    Kegg,
    /// WikiPathways
    Wikipathways,
    /// Reactome
    Reactome,
}

/// Identify a pathway across all supported databases.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PathwayKey {
    /// Source database.
    pub database: Database,
    /// Identifier within `database`.
    pub identifier: String,
    /// Human-readable label.
    pub name: String,
}

impl PathwayKey {
    /// Compact URI `database:identifier` as used in the score table.
    pub fn curie(&self) -> String {
        format!("{}:{}", self.database, self.identifier)
    }
}

/// Pathway membership, in merge order.
pub type Membership = IndexMap<PathwayKey, IndexSet<String>>;

/// Locate the mapping artifact for `database` in `dir`.
///
/// JSON artifacts take precedence over TSV ones; gzip-compressed files are accepted.
pub fn find_artifact<P: AsRef<Path>>(dir: P, database: Database) -> Result<PathBuf, anyhow::Error> {
    let candidates = ["json", "json.gz", "tsv", "tsv.gz"]
        .iter()
        .map(|ext| dir.as_ref().join(format!("{}.{}", database, ext)))
        .collect::<Vec<_>>();
    candidates
        .iter()
        .find(|path| path.exists())
        .cloned()
        .ok_or_else(|| {
            anyhow::anyhow!(
                "no {} mapping found in {} (tried {:?})",
                database,
                dir.as_ref().display(),
                &candidates
            )
        })
}

/// Load and merge the mapping artifacts of `databases` from `dir`.
pub fn load_membership<P: AsRef<Path>>(
    dir: P,
    databases: &[Database],
) -> Result<Membership, anyhow::Error> {
    let mut mappings = Vec::new();
    for database in databases {
        let path = find_artifact(dir.as_ref(), *database)?;
        tracing::info!("Loading {} mappings from {}", database, path.display());
        mappings.push((*database, input::load_records(&path)?));
    }
    Ok(merge::merge(mappings)?)
}

//! On-disk RocksDB cache for annotation records.
//!
//! The `annos` column family maps each rs identifier to the JSON array of its
//! records.  An empty array records that the service knows nothing about the SNP,
//! so it is not queried again.

use std::{collections::BTreeSet, path::Path};

use indexmap::IndexMap;
use serde_json::Value;
use thousands::Separable;

use crate::{
    common::{rocksdb_utils::fetch_meta, worker_version},
    err::AnnotationError,
};

use super::{rsid_of, AnnotationSource};

/// Column family holding the records.
pub const CF_ANNOS: &str = "annos";

/// Key-value store of annotation records by rs identifier.
pub struct AnnotationCache {
    db: rocksdb::DBWithThreadMode<rocksdb::MultiThreaded>,
}

impl std::fmt::Debug for AnnotationCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnnotationCache")
            .field("path", &self.db.path())
            .finish()
    }
}

impl AnnotationCache {
    /// Open the cache at `path`, creating it if necessary.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, anyhow::Error> {
        let mut options = rocksdb_utils_lookup::tune_options(rocksdb::Options::default(), None);
        options.create_if_missing(true);
        options.create_missing_column_families(true);
        let cf_names = &["meta", CF_ANNOS];
        let db = rocksdb::DBWithThreadMode::<rocksdb::MultiThreaded>::open_cf_with_opts(
            &options,
            path.as_ref(),
            cf_names
                .iter()
                .map(|name| (name.to_string(), options.clone()))
                .collect::<Vec<_>>(),
        )
        .map_err(|e| {
            AnnotationError::Cache(format!("opening {}: {}", path.as_ref().display(), e))
        })?;

        if let Some(version) = fetch_meta(&db, "snppis-version")? {
            tracing::debug!("annotation cache last written by snppis {}", version);
        }
        let cf_meta = db
            .cf_handle("meta")
            .ok_or_else(|| AnnotationError::Cache("unknown column family: meta".into()))?;
        db.put_cf(&cf_meta, "snppis-version", worker_version())?;
        drop(cf_meta);

        Ok(Self { db })
    }

    /// Return the cached records for `rsid`, `None` if the SNP was never fetched.
    pub fn get(&self, rsid: &str) -> Result<Option<Vec<Value>>, anyhow::Error> {
        let cf_annos = self.cf_annos()?;
        self.db
            .get_cf(&cf_annos, rsid.as_bytes())?
            .map(|raw| {
                serde_json::from_slice(&raw).map_err(|e| {
                    anyhow::Error::from(AnnotationError::Cache(format!(
                        "decoding entry for {}: {}",
                        rsid, e
                    )))
                })
            })
            .transpose()
    }

    /// Store `records` for `rsid`.
    pub fn put(&self, rsid: &str, records: &[Value]) -> Result<(), anyhow::Error> {
        let cf_annos = self.cf_annos()?;
        self.db
            .put_cf(&cf_annos, rsid.as_bytes(), serde_json::to_vec(records)?)?;
        Ok(())
    }

    fn cf_annos(&self) -> Result<std::sync::Arc<rocksdb::BoundColumnFamily<'_>>, AnnotationError> {
        self.db
            .cf_handle(CF_ANNOS)
            .ok_or_else(|| AnnotationError::Cache(format!("unknown column family: {}", CF_ANNOS)))
    }
}

/// Wrap an annotation source with presence-check, fetch, then store semantics.
#[derive(Debug)]
pub struct CachedSource<S> {
    inner: S,
    cache: AnnotationCache,
}

impl<S> CachedSource<S> {
    pub fn new(inner: S, cache: AnnotationCache) -> Self {
        Self { inner, cache }
    }
}

impl<S: AnnotationSource> AnnotationSource for CachedSource<S> {
    fn fetch(&self, ids: &BTreeSet<String>) -> Result<Vec<Value>, anyhow::Error> {
        let mut result = Vec::new();
        let mut missing = BTreeSet::new();
        for id in ids {
            match self.cache.get(id)? {
                Some(records) => result.extend(records),
                None => {
                    missing.insert(id.clone());
                }
            }
        }
        tracing::info!(
            "{} of {} SNPs found in annotation cache",
            (ids.len() - missing.len()).separate_with_commas(),
            ids.len().separate_with_commas()
        );

        if !missing.is_empty() {
            let fetched = self.inner.fetch(&missing)?;
            let mut by_id: IndexMap<&str, Vec<Value>> =
                missing.iter().map(|id| (id.as_str(), Vec::new())).collect();
            for record in &fetched {
                if let Some(records) = rsid_of(record).and_then(|id| by_id.get_mut(id)) {
                    records.push(record.clone());
                }
            }
            for (id, records) in &by_id {
                self.cache.put(id, records)?;
            }
            result.extend(fetched);
        }

        Ok(result)
    }
}

//! Variant annotation records: obtaining them and classifying their impact.

pub mod cache;
pub mod classify;
pub mod client;
pub mod fetch;
pub mod report;

use std::collections::BTreeSet;

use serde_json::Value;

/// A source of raw per-SNP annotation records.
///
/// Implementations handle batching and caching internally; callers invoke `fetch`
/// once with all identifiers of interest.  Identifiers without annotation are simply
/// absent from the result.
pub trait AnnotationSource {
    /// Fetch the raw annotation records for `ids`.
    fn fetch(&self, ids: &BTreeSet<String>) -> Result<Vec<Value>, anyhow::Error>;
}

impl<S: AnnotationSource + ?Sized> AnnotationSource for Box<S> {
    fn fetch(&self, ids: &BTreeSet<String>) -> Result<Vec<Value>, anyhow::Error> {
        (**self).fetch(ids)
    }
}

/// Return the reference SNP identifier that `record` describes.
///
/// This is `dbsnp.rsid` if present and the echoed query term otherwise.
pub fn rsid_of(record: &Value) -> Option<&str> {
    record
        .get("dbsnp")
        .and_then(|dbsnp| dbsnp.get("rsid"))
        .and_then(Value::as_str)
        .or_else(|| record.get("query").and_then(Value::as_str))
}

/// Load records previously written by `annos fetch`.
pub fn load_records<P: AsRef<std::path::Path>>(path: P) -> Result<Vec<Value>, anyhow::Error> {
    let path = path.as_ref();
    let reader = crate::common::io::open_read_maybe_gz(path)
        .map_err(|e| anyhow::anyhow!("could not open {} for reading: {}", path.display(), e))?;
    serde_json::from_reader(reader)
        .map_err(|e| anyhow::anyhow!("problem parsing {}: {}", path.display(), e))
}

/// Fixed in-memory annotation source for tests.
#[cfg(test)]
pub mod testing {
    use std::{
        collections::BTreeSet,
        sync::atomic::{AtomicUsize, Ordering},
    };

    use serde_json::Value;

    /// Serves records from a fixed list, counting calls and requested identifiers.
    #[derive(Debug, Default)]
    pub struct FixedSource {
        pub records: Vec<Value>,
        pub calls: AtomicUsize,
        pub requested: AtomicUsize,
    }

    impl FixedSource {
        pub fn new(records: Vec<Value>) -> Self {
            Self {
                records,
                ..Default::default()
            }
        }

        pub fn from_path(path: &str) -> Self {
            Self::new(super::load_records(path).expect("fixture must load"))
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub fn requested(&self) -> usize {
            self.requested.load(Ordering::SeqCst)
        }
    }

    impl super::AnnotationSource for FixedSource {
        fn fetch(&self, ids: &BTreeSet<String>) -> Result<Vec<Value>, anyhow::Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.requested.fetch_add(ids.len(), Ordering::SeqCst);
            Ok(self
                .records
                .iter()
                .filter(|record| super::rsid_of(record).map_or(false, |id| ids.contains(id)))
                .cloned()
                .collect())
        }
    }

    /// Fails on every call.
    #[derive(Debug, Default)]
    pub struct FailingSource;

    impl super::AnnotationSource for FailingSource {
        fn fetch(&self, ids: &BTreeSet<String>) -> Result<Vec<Value>, anyhow::Error> {
            Err(crate::err::AnnotationError::Fetch {
                count: ids.len(),
                message: "service unavailable".into(),
            }
            .into())
        }
    }
}

//! Client for the MyVariant.info annotation service.

use std::{collections::BTreeSet, time::Duration};

use serde_json::Value;
use thousands::Separable;

use crate::err::AnnotationError;

use super::AnnotationSource;

/// Default service endpoint.
pub const DEFAULT_API_URL: &str = "https://myvariant.info/v1";
/// Maximal number of identifiers per request accepted by the service.
pub const MAX_BATCH_SIZE: usize = 1000;
/// Scope that the query identifiers are matched against.
pub const SCOPES: &str = "dbsnp.rsid";
/// Fields to request for each hit.
pub const FIELDS: &str = "dbsnp.rsid,cadd.polyphen,cadd.sift";

/// Blocking client that queries identifiers in fixed-size batches.
#[derive(Debug, Clone)]
pub struct MyVariantClient {
    client: reqwest::blocking::Client,
    api_url: String,
    batch_size: usize,
}

impl MyVariantClient {
    /// Construct a new client for `api_url` (without trailing `/query`).
    pub fn new(api_url: &str, batch_size: usize) -> Result<Self, anyhow::Error> {
        if batch_size == 0 || batch_size > MAX_BATCH_SIZE {
            anyhow::bail!(
                "batch size must be between 1 and {}, got {}",
                MAX_BATCH_SIZE,
                batch_size
            );
        }
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(300))
            .user_agent(format!("snppis/{}", crate::common::VERSION))
            .build()?;
        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            batch_size,
        })
    }

    /// Form fields for querying `batch`.
    fn form(batch: &[&str]) -> [(&'static str, String); 3] {
        [
            ("q", batch.join(",")),
            ("scopes", SCOPES.to_string()),
            ("fields", FIELDS.to_string()),
        ]
    }

    /// Query one batch, failing on any transport, HTTP, or decoding error.
    fn query_batch(&self, batch: &[&str]) -> Result<Vec<Value>, AnnotationError> {
        let fail = |message: String| AnnotationError::Fetch {
            count: batch.len(),
            message,
        };
        let response = self
            .client
            .post(format!("{}/query", &self.api_url))
            .form(&Self::form(batch))
            .send()
            .and_then(|response| response.error_for_status())
            .map_err(|e| fail(e.to_string()))?;
        let hits: Vec<Value> = response.json().map_err(|e| fail(e.to_string()))?;
        Ok(drop_not_found(hits))
    }
}

/// Remove the placeholder hits for identifiers the service does not know.
fn drop_not_found(hits: Vec<Value>) -> Vec<Value> {
    hits.into_iter()
        .filter(|hit| hit.get("notfound").and_then(Value::as_bool) != Some(true))
        .collect()
}

impl AnnotationSource for MyVariantClient {
    fn fetch(&self, ids: &BTreeSet<String>) -> Result<Vec<Value>, anyhow::Error> {
        let ids = ids.iter().map(String::as_str).collect::<Vec<_>>();
        let mut result = Vec::new();
        for (i, batch) in ids.chunks(self.batch_size).enumerate() {
            tracing::debug!(
                "querying batch #{} ({} identifiers)",
                i + 1,
                batch.len().separate_with_commas()
            );
            result.extend(self.query_batch(batch)?);
        }
        tracing::info!(
            "received {} annotation records for {} SNPs",
            result.len().separate_with_commas(),
            ids.len().separate_with_commas()
        );
        Ok(result)
    }
}

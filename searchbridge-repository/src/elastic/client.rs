//! Elasticsearch client implementation.
//!
//! Concrete [`SearchEngineClient`] backed by the official Elasticsearch
//! Rust client. Wire payloads are built and parsed here; everything above
//! this module works with the trait.

use async_trait::async_trait;
use elasticsearch::{
    http::request::JsonBody,
    http::response::Response,
    http::transport::{SingleNodeConnectionPool, TransportBuilder},
    indices::{
        IndicesCreateParts, IndicesDeleteParts, IndicesExistsParts, IndicesGetMappingParts,
        IndicesPutMappingParts,
    },
    BulkParts, CountParts, Elasticsearch, MsearchParts,
};
use serde_json::{json, Value};
use tracing::{debug, info, warn};
use url::Url;

use crate::errors::SearchError;
use crate::interfaces::SearchEngineClient;
use crate::types::{BulkItemFailure, BulkOperation, BulkSummary, CountStats, EngineInfo};

/// Elasticsearch client.
pub struct ElasticsearchClient {
    client: Elasticsearch,
}

impl ElasticsearchClient {
    /// Create a new client connected to the given URL.
    pub fn new(url: &str) -> Result<Self, SearchError> {
        let parsed_url = Url::parse(url).map_err(|e| SearchError::connection(e.to_string()))?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let transport = TransportBuilder::new(conn_pool)
            .disable_proxy()
            .build()
            .map_err(|e| SearchError::connection(e.to_string()))?;

        info!(url = %url, "Created Elasticsearch client");

        Ok(Self {
            client: Elasticsearch::new(transport),
        })
    }

    /// Alternating action/document lines for a bulk request body.
    fn bulk_lines(operations: &[BulkOperation]) -> Vec<Value> {
        let mut lines = Vec::with_capacity(operations.len() * 2);
        for op in operations {
            lines.push(json!({
                "index": {
                    "_index": op.index,
                    "_id": op.doc_id,
                }
            }));
            lines.push(op.document.clone());
        }
        lines
    }

    /// Fold a bulk response body into a per-item summary.
    fn parse_bulk(total: usize, body: &Value) -> BulkSummary {
        let mut failures = Vec::new();

        if body["errors"].as_bool().unwrap_or(false) {
            if let Some(items) = body["items"].as_array() {
                for item in items {
                    let detail = &item["index"];
                    if detail["error"].is_object() {
                        failures.push(BulkItemFailure {
                            doc_id: detail["_id"].as_str().unwrap_or("?").to_string(),
                            status: detail["status"].as_u64().unwrap_or(0) as u16,
                            reason: detail["error"]["reason"]
                                .as_str()
                                .or_else(|| detail["error"]["type"].as_str())
                                .unwrap_or("unknown")
                                .to_string(),
                        });
                    }
                }
            }
        }

        let failed = failures.len();
        BulkSummary {
            total,
            succeeded: total.saturating_sub(failed),
            failed,
            failures,
        }
    }

    fn parse_info(body: &Value) -> Result<EngineInfo, SearchError> {
        let version = body["version"]["number"]
            .as_str()
            .ok_or_else(|| SearchError::parse("info response missing version.number"))?;
        let lucene_version = body["version"]["lucene_version"]
            .as_str()
            .ok_or_else(|| SearchError::parse("info response missing version.lucene_version"))?;
        Ok(EngineInfo {
            version: version.to_string(),
            lucene_version: lucene_version.to_string(),
        })
    }

    fn parse_count(body: &Value) -> Result<CountStats, SearchError> {
        let count = body["count"]
            .as_u64()
            .ok_or_else(|| SearchError::parse("count response missing count"))?;
        Ok(CountStats {
            count,
            shards_successful: body["_shards"]["successful"].as_u64().unwrap_or(0),
            shards_total: body["_shards"]["total"].as_u64().unwrap_or(0),
        })
    }

    /// Live index names from a get-mapping response, system indices
    /// excluded, sorted.
    fn parse_indices(body: &Value) -> Vec<String> {
        let mut indices: Vec<String> = body
            .as_object()
            .map(|map| {
                map.keys()
                    .filter(|name| !name.starts_with('.'))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        indices.sort();
        indices
    }

    fn parse_msearch(body: &Value) -> Result<Vec<Value>, SearchError> {
        body["responses"]
            .as_array()
            .map(|responses| responses.to_vec())
            .ok_or_else(|| SearchError::parse("msearch response missing responses"))
    }
}

/// Read a response body as JSON, surfacing non-success statuses as errors.
async fn read_json(response: Response, context: &str) -> Result<Value, SearchError> {
    let status = response.status_code();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(SearchError::response(status.as_u16(), body));
    }
    response
        .json::<Value>()
        .await
        .map_err(|e| SearchError::parse(format!("{}: {}", context, e)))
}

#[async_trait]
impl SearchEngineClient for ElasticsearchClient {
    async fn ping(&self) -> Result<bool, SearchError> {
        let response = self
            .client
            .ping()
            .send()
            .await
            .map_err(|e| SearchError::connection(e.to_string()))?;
        Ok(response.status_code().is_success())
    }

    async fn info(&self) -> Result<EngineInfo, SearchError> {
        let response = self
            .client
            .info()
            .send()
            .await
            .map_err(|e| SearchError::request(e.to_string()))?;
        let body = read_json(response, "info").await?;
        Self::parse_info(&body)
    }

    async fn bulk_write(&self, operations: &[BulkOperation]) -> Result<BulkSummary, SearchError> {
        if operations.is_empty() {
            return Ok(BulkSummary::default());
        }

        let body: Vec<JsonBody<Value>> = Self::bulk_lines(operations)
            .into_iter()
            .map(Into::into)
            .collect();

        debug!(count = operations.len(), "Submitting bulk write");

        let response = self
            .client
            .bulk(BulkParts::None)
            .body(body)
            .send()
            .await
            .map_err(|e| SearchError::request(e.to_string()))?;
        let body = read_json(response, "bulk").await?;

        let summary = Self::parse_bulk(operations.len(), &body);
        if summary.failed > 0 {
            warn!(
                failed = summary.failed,
                total = summary.total,
                "Bulk write had per-item rejections"
            );
            for failure in summary.failures.iter().take(5) {
                warn!(
                    doc_id = %failure.doc_id,
                    status = failure.status,
                    reason = %failure.reason,
                    "Rejected bulk item"
                );
            }
        }
        Ok(summary)
    }

    async fn index_exists(&self, index: &str) -> Result<bool, SearchError> {
        let response = self
            .client
            .indices()
            .exists(IndicesExistsParts::Index(&[index]))
            .send()
            .await
            .map_err(|e| SearchError::request(e.to_string()))?;
        Ok(response.status_code().is_success())
    }

    async fn create_index(&self, index: &str) -> Result<(), SearchError> {
        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(index))
            .send()
            .await
            .map_err(|e| SearchError::request(e.to_string()))?;
        let body = read_json(response, "create index").await?;

        if !body["acknowledged"].as_bool().unwrap_or(false) {
            return Err(SearchError::NotAcknowledged(body.to_string()));
        }
        info!(index = %index, "Created index");
        Ok(())
    }

    async fn delete_index(&self, index: &str) -> Result<(), SearchError> {
        let response = self
            .client
            .indices()
            .delete(IndicesDeleteParts::Index(&[index]))
            .send()
            .await
            .map_err(|e| SearchError::request(e.to_string()))?;
        read_json(response, "delete index").await?;
        info!(index = %index, "Deleted index");
        Ok(())
    }

    async fn put_mapping(&self, index: &str, mapping: &Value) -> Result<(), SearchError> {
        let response = self
            .client
            .indices()
            .put_mapping(IndicesPutMappingParts::Index(&[index]))
            .body(mapping.clone())
            .send()
            .await
            .map_err(|e| SearchError::request(e.to_string()))?;
        let body = read_json(response, "put mapping").await?;

        if !body["acknowledged"].as_bool().unwrap_or(false) {
            return Err(SearchError::NotAcknowledged(body.to_string()));
        }
        debug!(index = %index, "Applied mapping");
        Ok(())
    }

    async fn live_indices(&self) -> Result<Vec<String>, SearchError> {
        let response = self
            .client
            .indices()
            .get_mapping(IndicesGetMappingParts::None)
            .send()
            .await
            .map_err(|e| SearchError::request(e.to_string()))?;
        let body = read_json(response, "get mapping").await?;
        Ok(Self::parse_indices(&body))
    }

    async fn count(&self, index: &str) -> Result<CountStats, SearchError> {
        let response = self
            .client
            .count(CountParts::Index(&[index]))
            .send()
            .await
            .map_err(|e| SearchError::request(e.to_string()))?;
        let body = read_json(response, "count").await?;
        Self::parse_count(&body)
    }

    async fn multi_search(&self, searches: &[(String, Value)]) -> Result<Vec<Value>, SearchError> {
        let mut body: Vec<JsonBody<Value>> = Vec::with_capacity(searches.len() * 2);
        for (index, query) in searches {
            body.push(json!({ "index": index }).into());
            body.push(query.clone().into());
        }

        let response = self
            .client
            .msearch(MsearchParts::None)
            .body(body)
            .send()
            .await
            .map_err(|e| SearchError::request(e.to_string()))?;
        let body = read_json(response, "msearch").await?;
        Self::parse_msearch(&body)
    }
}

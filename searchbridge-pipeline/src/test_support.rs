//! Mock collaborators shared by the pipeline component tests.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use searchbridge_repository::{
    BulkItemFailure, BulkOperation, BulkSummary, CountStats, EngineInfo, RecordStore, SearchEngineClient,
    SearchError, StoreError,
};
use searchbridge_shared::{EntityDescriptor, EntityMapping, FieldDef, FieldMap, FieldType, Record};

use crate::progress::ProgressSink;

/// A `BlogPost` entity used throughout the pipeline tests.
pub fn entity_fixture() -> EntityDescriptor {
    let mut fields = FieldMap::new();
    fields.insert("id".to_string(), FieldDef::new(FieldType::Long));
    fields.insert("title".to_string(), FieldDef::new(FieldType::Text));
    fields.insert("body".to_string(), FieldDef::new(FieldType::Text));
    fields.insert("status".to_string(), FieldDef::new(FieldType::Keyword));
    EntityDescriptor {
        name: "BlogPost".to_string(),
        table: None,
        fields,
    }
}

/// A second entity with no text fields, for dispatcher tests.
pub fn keyword_entity_fixture() -> EntityDescriptor {
    let mut fields = FieldMap::new();
    fields.insert("id".to_string(), FieldDef::new(FieldType::Long));
    fields.insert("label".to_string(), FieldDef::new(FieldType::Keyword));
    EntityDescriptor {
        name: "Category".to_string(),
        table: None,
        fields,
    }
}

/// Generate `count` records with sequential integer ids.
pub fn records_fixture(count: usize) -> Vec<Record> {
    (1..=count)
        .map(|i| {
            let mut record = Record::new();
            record.insert("id".to_string(), json!(i));
            record.insert("title".to_string(), json!(format!("Post {}", i)));
            record
        })
        .collect()
}

/// Scriptable mock search engine.
///
/// Records every call in order; bulk failures and per-item rejections can
/// be queued up front.
#[derive(Default)]
pub struct MockEngine {
    calls: Mutex<Vec<String>>,
    existing_indices: Mutex<HashSet<String>>,
    bulk_sizes: Mutex<Vec<usize>>,
    bulk_errors: Mutex<VecDeque<SearchError>>,
    reject_ids: Mutex<HashSet<String>>,
    last_mapping: Mutex<Option<Value>>,
    captured_searches: Mutex<Vec<(String, Value)>>,
    msearch_responses: Mutex<Option<Vec<Value>>>,
    counts: Mutex<HashMap<String, CountStats>>,
}

impl MockEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_existing_index(self, index: &str) -> Self {
        self.existing_indices
            .lock()
            .unwrap()
            .insert(index.to_string());
        self
    }

    /// Queue errors returned by successive `bulk_write` calls before any
    /// call succeeds.
    pub fn with_bulk_errors(self, errors: Vec<SearchError>) -> Self {
        *self.bulk_errors.lock().unwrap() = errors.into();
        self
    }

    /// Reject the given doc ids inside otherwise-successful bulk writes.
    pub fn with_rejected_ids(self, ids: &[&str]) -> Self {
        *self.reject_ids.lock().unwrap() = ids.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_count(self, index: &str, stats: CountStats) -> Self {
        self.counts.lock().unwrap().insert(index.to_string(), stats);
        self
    }

    /// Replace the default msearch responses (one empty response per
    /// submitted search).
    pub fn with_msearch_responses(self, responses: Vec<Value>) -> Self {
        *self.msearch_responses.lock().unwrap() = Some(responses);
        self
    }

    pub fn call_log(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn bulk_sizes(&self) -> Vec<usize> {
        self.bulk_sizes.lock().unwrap().clone()
    }

    pub fn last_mapping(&self) -> Option<Value> {
        self.last_mapping.lock().unwrap().clone()
    }

    pub fn captured_searches(&self) -> Vec<(String, Value)> {
        self.captured_searches.lock().unwrap().clone()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }
}

#[async_trait]
impl SearchEngineClient for MockEngine {
    async fn ping(&self) -> Result<bool, SearchError> {
        self.record("ping");
        Ok(true)
    }

    async fn info(&self) -> Result<EngineInfo, SearchError> {
        self.record("info");
        Ok(EngineInfo {
            version: "8.17.0".to_string(),
            lucene_version: "9.12.0".to_string(),
        })
    }

    async fn bulk_write(&self, operations: &[BulkOperation]) -> Result<BulkSummary, SearchError> {
        self.record(format!("bulk_write {}", operations.len()));

        if let Some(error) = self.bulk_errors.lock().unwrap().pop_front() {
            return Err(error);
        }

        self.bulk_sizes.lock().unwrap().push(operations.len());

        let reject_ids = self.reject_ids.lock().unwrap();
        let failures: Vec<BulkItemFailure> = operations
            .iter()
            .filter(|op| reject_ids.contains(&op.doc_id))
            .map(|op| BulkItemFailure {
                doc_id: op.doc_id.clone(),
                status: 400,
                reason: "mapper_parsing_exception".to_string(),
            })
            .collect();

        let failed = failures.len();
        Ok(BulkSummary {
            total: operations.len(),
            succeeded: operations.len() - failed,
            failed,
            failures,
        })
    }

    async fn index_exists(&self, index: &str) -> Result<bool, SearchError> {
        self.record(format!("index_exists {}", index));
        Ok(self.existing_indices.lock().unwrap().contains(index))
    }

    async fn create_index(&self, index: &str) -> Result<(), SearchError> {
        self.record(format!("create_index {}", index));
        self.existing_indices
            .lock()
            .unwrap()
            .insert(index.to_string());
        Ok(())
    }

    async fn delete_index(&self, index: &str) -> Result<(), SearchError> {
        self.record(format!("delete_index {}", index));
        self.existing_indices.lock().unwrap().remove(index);
        Ok(())
    }

    async fn put_mapping(&self, index: &str, mapping: &Value) -> Result<(), SearchError> {
        self.record(format!("put_mapping {}", index));
        *self.last_mapping.lock().unwrap() = Some(mapping.clone());
        Ok(())
    }

    async fn live_indices(&self) -> Result<Vec<String>, SearchError> {
        self.record("live_indices");
        let mut indices: Vec<String> = self.existing_indices.lock().unwrap().iter().cloned().collect();
        indices.sort();
        Ok(indices)
    }

    async fn count(&self, index: &str) -> Result<CountStats, SearchError> {
        self.record(format!("count {}", index));
        Ok(self
            .counts
            .lock()
            .unwrap()
            .get(index)
            .cloned()
            .unwrap_or(CountStats {
                count: 0,
                shards_successful: 1,
                shards_total: 1,
            }))
    }

    async fn multi_search(&self, searches: &[(String, Value)]) -> Result<Vec<Value>, SearchError> {
        self.record(format!("multi_search {}", searches.len()));
        *self.captured_searches.lock().unwrap() = searches.to_vec();

        if let Some(responses) = self.msearch_responses.lock().unwrap().clone() {
            return Ok(responses);
        }
        Ok(searches
            .iter()
            .map(|_| json!({ "hits": { "total": { "value": 0 }, "hits": [] } }))
            .collect())
    }
}

/// Mock record store serving a fixed set of rows.
pub struct MockStore {
    records: Vec<Record>,
}

impl MockStore {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }
}

#[async_trait]
impl RecordStore for MockStore {
    async fn fetch_records(
        &self,
        _entity: &dyn EntityMapping,
        limit: usize,
    ) -> Result<Vec<Record>, StoreError> {
        Ok(self.records.iter().take(limit).cloned().collect())
    }
}

/// Progress sink that records every callback.
#[derive(Default)]
pub struct RecordingProgress {
    pub events: Mutex<Vec<String>>,
}

impl ProgressSink for RecordingProgress {
    fn begin(&self, total: u64) {
        self.events.lock().unwrap().push(format!("begin {}", total));
    }

    fn advance(&self, done: u64, total: u64) {
        self.events
            .lock()
            .unwrap()
            .push(format!("advance {}/{}", done, total));
    }

    fn finish(&self) {
        self.events.lock().unwrap().push("finish".to_string());
    }
}

//! # Searchbridge Repository
//!
//! This crate provides the traits and implementations for talking to the
//! two external collaborators of the searchbridge system: the search
//! engine and the relational backing store. It includes definitions for
//! errors, interfaces, request/response types, a concrete Elasticsearch
//! client, and a concrete Postgres record store.

pub mod elastic;
pub mod errors;
pub mod interfaces;
pub mod postgres;
pub mod types;

pub use elastic::ElasticsearchClient;
pub use errors::{SearchError, StoreError};
pub use interfaces::{RecordStore, SearchEngineClient};
pub use postgres::PgRecordStore;
pub use types::{BulkItemFailure, BulkOperation, BulkSummary, CountStats, EngineInfo};

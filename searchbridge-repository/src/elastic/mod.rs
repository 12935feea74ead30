//! Elasticsearch implementation of the search engine client.

mod client;
pub mod queries;

pub use client::ElasticsearchClient;

//! Interface definitions for the external collaborators.
//!
//! These traits allow dependency injection and swappable implementations:
//! pipeline components receive `Arc<dyn SearchEngineClient>` and
//! `Arc<dyn RecordStore>` handles instead of reaching for globals.

mod record_store;
mod search_engine_client;

pub use record_store::RecordStore;
pub use search_engine_client::SearchEngineClient;

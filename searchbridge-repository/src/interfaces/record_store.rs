//! Record store trait definition.

use async_trait::async_trait;

use searchbridge_shared::{EntityMapping, Record};

use crate::errors::StoreError;

/// Read-only access to the relational backing store.
///
/// The store's single obligation is "select the entity's declared columns
/// from its table, as rows, capped at a limit". Implementations must
/// include the unique `id` column in every returned record.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetch up to `limit` records for the entity.
    async fn fetch_records(
        &self,
        entity: &dyn EntityMapping,
        limit: usize,
    ) -> Result<Vec<Record>, StoreError>;
}

//! Postgres record store implementation.
//!
//! Reads an entity's declared columns from its backing table as JSON rows.
//! Table and column names come from entity configuration, not user input,
//! but are still validated and quoted before being spliced into SQL.

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::{debug, info};

use searchbridge_shared::{EntityMapping, Record};

use crate::errors::StoreError;
use crate::interfaces::RecordStore;

/// Postgres-backed record store.
pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    /// Connect lazily to the given database URL.
    ///
    /// Connections are established on first use, so commands that never
    /// touch the backing store work without a reachable database.
    pub fn connect_lazy(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect_lazy(database_url)
            .map_err(|e| StoreError::connection(e.to_string()))?;

        info!("Created Postgres pool");
        Ok(Self { pool })
    }

    /// Quote a table or column name, rejecting unsafe identifiers.
    fn quote_identifier(name: &str) -> Result<String, StoreError> {
        if name.is_empty() || name.contains('"') || name.chars().any(|c| c.is_control()) {
            return Err(StoreError::invalid_identifier(name));
        }
        Ok(format!("\"{}\"", name))
    }

    /// SELECT statement fetching the entity's columns as one JSON object
    /// per row; the row cap binds as `$1`.
    fn select_sql(table: &str, columns: &[String]) -> Result<String, StoreError> {
        let quoted_columns = columns
            .iter()
            .map(|c| Self::quote_identifier(c))
            .collect::<Result<Vec<_>, _>>()?
            .join(", ");

        Ok(format!(
            "SELECT to_jsonb(t) FROM (SELECT {} FROM {} LIMIT $1) AS t",
            quoted_columns,
            Self::quote_identifier(table)?,
        ))
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn fetch_records(
        &self,
        entity: &dyn EntityMapping,
        limit: usize,
    ) -> Result<Vec<Record>, StoreError> {
        let sql = Self::select_sql(&entity.table(), &entity.attributes())?;

        debug!(table = %entity.table(), limit = limit, "Fetching records");

        let rows: Vec<Json<Record>> = sqlx::query_scalar(&sql)
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::query(e.to_string()))?;

        Ok(rows.into_iter().map(|row| row.0).collect())
    }
}

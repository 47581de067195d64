//! Partitioned key-value table abstraction.
//!
//! The backing store (Azure Table Storage in production) is external to this
//! system; everything above it sees flat tables of JSON rows addressed by
//! `(table, partition, row)`. Typed repositories in `commhub-store` wrap this
//! trait with entity-specific methods.

use async_trait::async_trait;
use serde_json::Value;

use crate::result::AppResult;

/// Generic partitioned table store.
#[async_trait]
pub trait TableStore: Send + Sync + std::fmt::Debug + 'static {
    /// Fetch a single row, or `None` if it does not exist.
    async fn get(&self, table: &str, partition: &str, row: &str) -> AppResult<Option<Value>>;

    /// Insert or replace a row.
    async fn upsert(&self, table: &str, partition: &str, row: &str, value: Value) -> AppResult<()>;

    /// Delete a row. Returns `true` if a row was deleted.
    async fn delete(&self, table: &str, partition: &str, row: &str) -> AppResult<bool>;

    /// List rows in a partition in ascending row-key order, optionally
    /// capped at `limit` rows.
    async fn list(
        &self,
        table: &str,
        partition: &str,
        limit: Option<usize>,
    ) -> AppResult<Vec<Value>>;
}

//! In-memory table store implementation using dashmap.

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;

use commhub_core::result::AppResult;
use commhub_core::traits::store::TableStore;

/// Full address of a stored row.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct RowPath {
    table: String,
    partition: String,
    row: String,
}

impl RowPath {
    fn new(table: &str, partition: &str, row: &str) -> Self {
        Self {
            table: table.to_string(),
            partition: partition.to_string(),
            row: row.to_string(),
        }
    }
}

/// In-memory [`TableStore`] keeping JSON rows in a concurrent map.
#[derive(Debug, Clone, Default)]
pub struct MemoryTableStore {
    rows: DashMap<RowPath, Value>,
}

impl MemoryTableStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows across all tables, for test assertions.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the store holds no rows at all.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[async_trait]
impl TableStore for MemoryTableStore {
    async fn get(&self, table: &str, partition: &str, row: &str) -> AppResult<Option<Value>> {
        Ok(self
            .rows
            .get(&RowPath::new(table, partition, row))
            .map(|entry| entry.value().clone()))
    }

    async fn upsert(&self, table: &str, partition: &str, row: &str, value: Value) -> AppResult<()> {
        self.rows.insert(RowPath::new(table, partition, row), value);
        Ok(())
    }

    async fn delete(&self, table: &str, partition: &str, row: &str) -> AppResult<bool> {
        Ok(self.rows.remove(&RowPath::new(table, partition, row)).is_some())
    }

    async fn list(
        &self,
        table: &str,
        partition: &str,
        limit: Option<usize>,
    ) -> AppResult<Vec<Value>> {
        let mut matched: Vec<(String, Value)> = self
            .rows
            .iter()
            .filter(|entry| entry.key().table == table && entry.key().partition == partition)
            .map(|entry| (entry.key().row.clone(), entry.value().clone()))
            .collect();

        matched.sort_by(|a, b| a.0.cmp(&b.0));

        let mut values: Vec<Value> = matched.into_iter().map(|(_, v)| v).collect();
        if let Some(limit) = limit {
            values.truncate(limit);
        }
        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_upsert_get_delete() {
        let store = MemoryTableStore::new();
        store
            .upsert("notifications", "draft", "k1", json!({"title": "hi"}))
            .await
            .unwrap();

        let row = store.get("notifications", "draft", "k1").await.unwrap();
        assert_eq!(row, Some(json!({"title": "hi"})));

        assert!(store.delete("notifications", "draft", "k1").await.unwrap());
        assert!(!store.delete("notifications", "draft", "k1").await.unwrap());
        assert!(store.get("notifications", "draft", "k1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_is_partition_scoped_and_ordered() {
        let store = MemoryTableStore::new();
        store
            .upsert("notifications", "sent", "b", json!({"n": 2}))
            .await
            .unwrap();
        store
            .upsert("notifications", "sent", "a", json!({"n": 1}))
            .await
            .unwrap();
        store
            .upsert("notifications", "draft", "c", json!({"n": 3}))
            .await
            .unwrap();

        let rows = store.list("notifications", "sent", None).await.unwrap();
        assert_eq!(rows, vec![json!({"n": 1}), json!({"n": 2})]);

        let capped = store.list("notifications", "sent", Some(1)).await.unwrap();
        assert_eq!(capped, vec![json!({"n": 1})]);
    }
}

//! Schedule repository.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use commhub_core::error::AppError;
use commhub_core::result::AppResult;
use commhub_core::traits::store::TableStore;
use commhub_core::types::keys::{partitions, tables};
use commhub_entity::schedule::ScheduleRecord;

/// Repository for pending schedule records, keyed by notification id so
/// at most one record exists per notification.
#[derive(Debug, Clone)]
pub struct ScheduleRepository {
    store: Arc<dyn TableStore>,
}

impl ScheduleRepository {
    /// Create a new schedule repository.
    pub fn new(store: Arc<dyn TableStore>) -> Self {
        Self { store }
    }

    /// Insert or replace a schedule record.
    pub async fn create(&self, record: &ScheduleRecord) -> AppResult<()> {
        let value = serde_json::to_value(record)?;
        self.store
            .upsert(
                tables::SCHEDULES,
                partitions::SCHEDULED,
                &record.notification_id,
                value,
            )
            .await?;
        debug!(
            notification_id = %record.notification_id,
            occurrence = %record.notification_date,
            "Created schedule record"
        );
        Ok(())
    }

    /// Fetch the schedule record for a notification.
    pub async fn get(&self, notification_id: &str) -> AppResult<Option<ScheduleRecord>> {
        let value = self
            .store
            .get(tables::SCHEDULES, partitions::SCHEDULED, notification_id)
            .await?;
        value
            .map(|v| serde_json::from_value(v).map_err(AppError::from))
            .transpose()
    }

    /// Delete the schedule record for a notification. Returns `true`
    /// if a record was deleted.
    pub async fn delete(&self, notification_id: &str) -> AppResult<bool> {
        self.store
            .delete(tables::SCHEDULES, partitions::SCHEDULED, notification_id)
            .await
    }

    /// All pending schedule records.
    pub async fn all(&self) -> AppResult<Vec<ScheduleRecord>> {
        let values = self
            .store
            .list(tables::SCHEDULES, partitions::SCHEDULED, None)
            .await?;
        values
            .into_iter()
            .map(|v| serde_json::from_value(v).map_err(AppError::from))
            .collect()
    }

    /// Schedule records whose occurrence date is at or before `now`.
    pub async fn due_before(&self, now: DateTime<Utc>) -> AppResult<Vec<ScheduleRecord>> {
        let all = self.all().await?;
        Ok(all.into_iter().filter(|s| s.is_due(now)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::table::MemoryTableStore;
    use chrono::Duration;

    fn record(id: &str, due_in_minutes: i64) -> ScheduleRecord {
        ScheduleRecord {
            notification_id: id.to_string(),
            notification_date: Utc::now() + Duration::minutes(due_in_minutes),
            created_date: Utc::now(),
        }
    }

    fn repo() -> ScheduleRepository {
        ScheduleRepository::new(Arc::new(MemoryTableStore::new()))
    }

    #[tokio::test]
    async fn test_create_replaces_existing() {
        let repo = repo();
        repo.create(&record("n1", 10)).await.unwrap();
        repo.create(&record("n1", 20)).await.unwrap();

        let all = repo.all().await.unwrap();
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn test_due_before_filters_future_records() {
        let repo = repo();
        repo.create(&record("past", -5)).await.unwrap();
        repo.create(&record("future", 60)).await.unwrap();

        let due = repo.due_before(Utc::now()).await.unwrap();
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].notification_id, "past");
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = repo();
        repo.create(&record("n1", 5)).await.unwrap();
        assert!(repo.delete("n1").await.unwrap());
        assert!(!repo.delete("n1").await.unwrap());
        assert!(repo.get("n1").await.unwrap().is_none());
    }
}

//! Notification repository.

use std::sync::Arc;

use chrono::Utc;
use tracing::debug;

use commhub_core::error::AppError;
use commhub_core::result::AppResult;
use commhub_core::traits::store::TableStore;
use commhub_core::types::keys::{RowKeyGenerator, partitions, tables};
use commhub_entity::notification::NotificationRecord;

/// How many records an unlimited recent-sent listing returns.
const RECENT_SENT_LIMIT: usize = 25;

/// Repository for notification records across the draft, sent, and
/// scheduled-sent partitions.
#[derive(Debug, Clone)]
pub struct NotificationRepository {
    store: Arc<dyn TableStore>,
    keys: RowKeyGenerator,
}

impl NotificationRepository {
    /// Create a new notification repository.
    pub fn new(store: Arc<dyn TableStore>) -> Self {
        Self {
            store,
            keys: RowKeyGenerator::new(),
        }
    }

    /// Store a new draft. The record receives a fresh oldest-first id,
    /// draft lifecycle flags, and zeroed counters. Returns the new id.
    pub async fn create_draft(&self, mut record: NotificationRecord) -> AppResult<String> {
        let id = self.keys.new_oldest_first();
        record.id = id.clone();
        record.is_draft = true;
        record.is_completed = false;
        record.created_date = Utc::now();
        record.sent_date = None;
        record.sending_started_date = None;
        record.succeeded = 0;
        record.failed = 0;
        record.throttled = 0;
        record.total_message_count = 0;

        self.upsert(partitions::DRAFT, &record).await?;
        debug!(notification_id = %id, "Created draft notification");
        Ok(id)
    }

    /// Duplicate an existing draft under a fresh id with `" (copy)"`
    /// appended to the title. Returns the new id, or `None` when the
    /// source draft does not exist.
    pub async fn duplicate_draft(
        &self,
        id: &str,
        created_by: &str,
    ) -> AppResult<Option<String>> {
        let Some(mut record) = self.get(partitions::DRAFT, id).await? else {
            return Ok(None);
        };

        record.title = format!("{} (copy)", record.title);
        record.created_by = Some(created_by.to_string());
        let new_id = self.create_draft(record).await?;
        Ok(Some(new_id))
    }

    /// Fetch a notification from the given partition.
    pub async fn get(&self, partition: &str, id: &str) -> AppResult<Option<NotificationRecord>> {
        let value = self.store.get(tables::NOTIFICATIONS, partition, id).await?;
        value
            .map(|v| serde_json::from_value(v).map_err(AppError::from))
            .transpose()
    }

    /// Fetch a draft notification.
    pub async fn get_draft(&self, id: &str) -> AppResult<Option<NotificationRecord>> {
        self.get(partitions::DRAFT, id).await
    }

    /// Fetch a sent notification.
    pub async fn get_sent(&self, id: &str) -> AppResult<Option<NotificationRecord>> {
        self.get(partitions::SENT, id).await
    }

    /// Fetch a scheduled-sent master notification.
    pub async fn get_scheduled_sent(&self, id: &str) -> AppResult<Option<NotificationRecord>> {
        self.get(partitions::SCHEDULED_SENT, id).await
    }

    /// Insert or replace a notification in the given partition.
    pub async fn upsert(&self, partition: &str, record: &NotificationRecord) -> AppResult<()> {
        let value = serde_json::to_value(record)?;
        self.store
            .upsert(tables::NOTIFICATIONS, partition, &record.id, value)
            .await
    }

    /// Delete a notification from the given partition. Returns `true`
    /// if a record was deleted.
    pub async fn delete(&self, partition: &str, id: &str) -> AppResult<bool> {
        self.store.delete(tables::NOTIFICATIONS, partition, id).await
    }

    /// All draft notifications, oldest first.
    pub async fn all_drafts(&self) -> AppResult<Vec<NotificationRecord>> {
        self.list(partitions::DRAFT, None).await
    }

    /// The most recently sent notifications, newest first, capped at 25.
    pub async fn recent_sent(&self) -> AppResult<Vec<NotificationRecord>> {
        self.list(partitions::SENT, Some(RECENT_SENT_LIMIT)).await
    }

    async fn list(
        &self,
        partition: &str,
        limit: Option<usize>,
    ) -> AppResult<Vec<NotificationRecord>> {
        let values = self
            .store
            .list(tables::NOTIFICATIONS, partition, limit)
            .await?;
        values
            .into_iter()
            .map(|v| serde_json::from_value(v).map_err(AppError::from))
            .collect()
    }
}

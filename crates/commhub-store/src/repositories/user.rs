//! User repository — the captured recipient directory.

use std::sync::Arc;

use async_trait::async_trait;

use commhub_core::error::AppError;
use commhub_core::result::AppResult;
use commhub_core::traits::store::TableStore;
use commhub_core::types::keys::{partitions, tables};
use commhub_entity::user::RecipientRecord;

use crate::directory::UserDirectory;

/// Repository over the user directory snapshot, keyed by AAD object id.
#[derive(Debug, Clone)]
pub struct UserRepository {
    store: Arc<dyn TableStore>,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(store: Arc<dyn TableStore>) -> Self {
        Self { store }
    }

    /// Insert or replace a user record.
    pub async fn upsert(&self, record: &RecipientRecord) -> AppResult<()> {
        let value = serde_json::to_value(record)?;
        self.store
            .upsert(tables::USERS, partitions::USER_DATA, &record.aad_id, value)
            .await
    }

    /// Fetch a user by AAD object id.
    pub async fn get(&self, aad_id: &str) -> AppResult<Option<RecipientRecord>> {
        let value = self
            .store
            .get(tables::USERS, partitions::USER_DATA, aad_id)
            .await?;
        value
            .map(|v| serde_json::from_value(v).map_err(AppError::from))
            .transpose()
    }

    /// Delete a user record. Returns `true` if a record was deleted.
    pub async fn delete(&self, aad_id: &str) -> AppResult<bool> {
        self.store
            .delete(tables::USERS, partitions::USER_DATA, aad_id)
            .await
    }

    async fn snapshot(&self) -> AppResult<Vec<RecipientRecord>> {
        let values = self
            .store
            .list(tables::USERS, partitions::USER_DATA, None)
            .await?;
        values
            .into_iter()
            .map(|v| serde_json::from_value(v).map_err(AppError::from))
            .collect()
    }
}

#[async_trait]
impl UserDirectory for UserRepository {
    async fn all(&self) -> AppResult<Vec<RecipientRecord>> {
        self.snapshot().await
    }

    async fn by_team_rosters(&self, team_ids: &[String]) -> AppResult<Vec<RecipientRecord>> {
        let snapshot = self.snapshot().await?;
        Ok(snapshot
            .into_iter()
            .filter(|user| user.team_ids.iter().any(|t| team_ids.contains(t)))
            .collect())
    }
}

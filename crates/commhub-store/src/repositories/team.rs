//! Team repository — the captured team directory.

use std::sync::Arc;

use async_trait::async_trait;

use commhub_core::error::AppError;
use commhub_core::result::AppResult;
use commhub_core::traits::store::TableStore;
use commhub_core::types::keys::{partitions, tables};
use commhub_entity::team::TeamRecord;
use commhub_entity::user::RecipientRecord;

use crate::directory::TeamDirectory;

/// Repository over the team directory, keyed by team id.
#[derive(Debug, Clone)]
pub struct TeamRepository {
    store: Arc<dyn TableStore>,
}

impl TeamRepository {
    /// Create a new team repository.
    pub fn new(store: Arc<dyn TableStore>) -> Self {
        Self { store }
    }

    /// Insert or replace a team record.
    pub async fn upsert(&self, record: &TeamRecord) -> AppResult<()> {
        let value = serde_json::to_value(record)?;
        self.store
            .upsert(tables::TEAMS, partitions::TEAM_DATA, &record.team_id, value)
            .await
    }

    /// Fetch a team by id.
    pub async fn get(&self, team_id: &str) -> AppResult<Option<TeamRecord>> {
        let value = self
            .store
            .get(tables::TEAMS, partitions::TEAM_DATA, team_id)
            .await?;
        value
            .map(|v| serde_json::from_value(v).map_err(AppError::from))
            .transpose()
    }

    /// Delete a team record. Returns `true` if a record was deleted.
    pub async fn delete(&self, team_id: &str) -> AppResult<bool> {
        self.store
            .delete(tables::TEAMS, partitions::TEAM_DATA, team_id)
            .await
    }

    async fn by_ids(&self, team_ids: &[String]) -> AppResult<Vec<TeamRecord>> {
        let mut teams = Vec::with_capacity(team_ids.len());
        for team_id in team_ids {
            if let Some(team) = self.get(team_id).await? {
                teams.push(team);
            }
        }
        Ok(teams)
    }
}

#[async_trait]
impl TeamDirectory for TeamRepository {
    async fn receiver_entities(&self, team_ids: &[String]) -> AppResult<Vec<RecipientRecord>> {
        let teams = self.by_ids(team_ids).await?;
        Ok(teams.iter().map(TeamRecord::to_receiver).collect())
    }

    async fn names_by_ids(&self, ids: &[String]) -> AppResult<Vec<String>> {
        let teams = self.by_ids(ids).await?;
        let mut names: Vec<String> = teams.into_iter().map(|t| t.name).collect();
        names.sort();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::table::MemoryTableStore;

    fn team(id: &str, name: &str) -> TeamRecord {
        TeamRecord {
            team_id: id.to_string(),
            name: name.to_string(),
            service_url: "https://smba.example".to_string(),
            tenant_id: "tenant".to_string(),
        }
    }

    fn repo() -> TeamRepository {
        TeamRepository::new(Arc::new(MemoryTableStore::new()))
    }

    #[tokio::test]
    async fn test_receiver_entities_skips_unknown_teams() {
        let repo = repo();
        repo.upsert(&team("t1", "Engineering")).await.unwrap();

        let receivers = repo
            .receiver_entities(&["t1".to_string(), "missing".to_string()])
            .await
            .unwrap();
        assert_eq!(receivers.len(), 1);
        assert_eq!(receivers[0].aad_id, "t1");
    }

    #[tokio::test]
    async fn test_names_by_ids_sorted_ascending() {
        let repo = repo();
        repo.upsert(&team("t1", "Zeta")).await.unwrap();
        repo.upsert(&team("t2", "Alpha")).await.unwrap();

        let names = repo
            .names_by_ids(&["t1".to_string(), "t2".to_string()])
            .await
            .unwrap();
        assert_eq!(names, vec!["Alpha".to_string(), "Zeta".to_string()]);
    }
}

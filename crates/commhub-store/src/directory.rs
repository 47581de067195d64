//! Directory traits consumed by the audience resolver.
//!
//! The canonical implementations are the table-backed repositories in this
//! crate (the bot keeps the user and team tables in sync), but the resolver
//! only depends on these traits so tests and alternative directories can
//! substitute their own.

use async_trait::async_trait;

use commhub_core::result::AppResult;
use commhub_entity::user::RecipientRecord;

/// Lookup over the captured user directory.
#[async_trait]
pub trait UserDirectory: Send + Sync + 'static {
    /// The full user directory snapshot.
    async fn all(&self) -> AppResult<Vec<RecipientRecord>>;

    /// Users belonging to the rosters of the given teams.
    async fn by_team_rosters(&self, team_ids: &[String]) -> AppResult<Vec<RecipientRecord>>;
}

/// Lookup over the captured team directory.
#[async_trait]
pub trait TeamDirectory: Send + Sync + 'static {
    /// One channel receiver per existing team id; unknown ids are skipped.
    async fn receiver_entities(&self, team_ids: &[String]) -> AppResult<Vec<RecipientRecord>>;

    /// Display names of the given teams, ascending.
    async fn names_by_ids(&self, ids: &[String]) -> AppResult<Vec<String>>;
}

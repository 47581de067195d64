//! Audience specification resolution.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::debug;

use commhub_core::error::AppError;
use commhub_core::result::AppResult;
use commhub_core::traits::directory::GroupDirectory;
use commhub_entity::notification::AudienceSpec;
use commhub_entity::user::RecipientRecord;
use commhub_store::directory::{TeamDirectory, UserDirectory};

use super::groups::expand_transitively;

/// Resolves an audience specification into a deduplicated recipient list.
///
/// Any provider failure aborts the whole resolution: a partial audience
/// must never be delivered to, so the caller retries wholesale on the
/// next trigger.
#[derive(Clone)]
pub struct AudienceResolver {
    users: Arc<dyn UserDirectory>,
    teams: Arc<dyn TeamDirectory>,
    groups: Arc<dyn GroupDirectory>,
}

impl AudienceResolver {
    /// Create a new resolver over the directory collaborators.
    pub fn new(
        users: Arc<dyn UserDirectory>,
        teams: Arc<dyn TeamDirectory>,
        groups: Arc<dyn GroupDirectory>,
    ) -> Self {
        Self {
            users,
            teams,
            groups,
        }
    }

    /// Resolve the audience. Each distinct directory id appears at most
    /// once in the result, no matter how many dimensions contributed it.
    pub async fn resolve(&self, spec: &AudienceSpec) -> AppResult<Vec<RecipientRecord>> {
        let mut recipients: Vec<RecipientRecord> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        if spec.all_users {
            let snapshot = self
                .users
                .all()
                .await
                .map_err(|e| AppError::resolution(format!("User snapshot failed: {e}")))?;
            for user in snapshot {
                push_unique(&mut recipients, &mut seen, user);
            }
            debug!(recipients = recipients.len(), "Resolved all-users audience");
            return Ok(recipients);
        }

        if !spec.rosters.is_empty() {
            let roster_members = self
                .users
                .by_team_rosters(&spec.rosters)
                .await
                .map_err(|e| AppError::resolution(format!("Roster lookup failed: {e}")))?;
            for user in roster_members {
                push_unique(&mut recipients, &mut seen, user);
            }
        }

        if !spec.teams.is_empty() {
            let receivers = self
                .teams
                .receiver_entities(&spec.teams)
                .await
                .map_err(|e| AppError::resolution(format!("Team lookup failed: {e}")))?;
            for receiver in receivers {
                push_unique(&mut recipients, &mut seen, receiver);
            }
        }

        if !spec.ad_groups.is_empty() {
            let members = expand_transitively(self.groups.as_ref(), &spec.ad_groups)
                .await
                .map_err(|e| AppError::resolution(format!("Group expansion failed: {e}")))?;

            // Cross-reference member ids against the user snapshot; members
            // the bot has never captured have no conversation reference and
            // are dropped.
            let snapshot = self
                .users
                .all()
                .await
                .map_err(|e| AppError::resolution(format!("User snapshot failed: {e}")))?;
            let by_aad_id: HashMap<&str, &RecipientRecord> = snapshot
                .iter()
                .map(|user| (user.aad_id.as_str(), user))
                .collect();

            for member in &members {
                if let Some(user) = by_aad_id.get(member.id.as_str()) {
                    push_unique(&mut recipients, &mut seen, (*user).clone());
                }
            }
        }

        debug!(recipients = recipients.len(), "Resolved audience");
        Ok(recipients)
    }
}

fn push_unique(
    recipients: &mut Vec<RecipientRecord>,
    seen: &mut HashSet<String>,
    record: RecipientRecord,
) {
    if seen.insert(record.aad_id.clone()) {
        recipients.push(record);
    }
}

//! Team entity model.

use serde::{Deserialize, Serialize};

use crate::user::model::RecipientRecord;

/// A team the bot has been installed into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRecord {
    /// Teams channel/team id.
    pub team_id: String,
    /// Team display name.
    pub name: String,
    /// Bot Framework service URL.
    pub service_url: String,
    /// Tenant id.
    pub tenant_id: String,
}

impl TeamRecord {
    /// The channel receiver for this team: one delivery to the team's
    /// general channel rather than to each member. The team id stands in
    /// for the directory id and conversation id.
    pub fn to_receiver(&self) -> RecipientRecord {
        RecipientRecord {
            user_id: self.team_id.clone(),
            aad_id: self.team_id.clone(),
            name: self.name.clone(),
            email: None,
            upn: None,
            conversation_id: self.team_id.clone(),
            service_url: self.service_url.clone(),
            tenant_id: self.tenant_id.clone(),
            department: None,
            team_ids: Vec::new(),
        }
    }
}

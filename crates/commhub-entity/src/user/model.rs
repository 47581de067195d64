//! Recipient entity model.

use serde::{Deserialize, Serialize};

/// A deliverable recipient identity, captured by the bot when the user
/// (or team) installed the app.
///
/// Recipients are compared by `aad_id`: the audience resolver deduplicates
/// on it regardless of which targeting dimension contributed the entity.
/// Team-channel receivers share this shape, with the team id standing in
/// for the directory id and conversation id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipientRecord {
    /// Teams-internal user id.
    pub user_id: String,
    /// Azure AD object id; the deduplication key.
    pub aad_id: String,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: Option<String>,
    /// User principal name.
    pub upn: Option<String>,
    /// Proactive conversation reference.
    pub conversation_id: String,
    /// Bot Framework service URL for the conversation.
    pub service_url: String,
    /// Tenant id.
    pub tenant_id: String,
    /// Department, when the directory sync has filled it in.
    pub department: Option<String>,
    /// Teams whose rosters include this user.
    #[serde(default)]
    pub team_ids: Vec<String>,
}

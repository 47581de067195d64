//! Queue message payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use commhub_core::result::AppResult;
use commhub_entity::user::RecipientRecord;

/// One per-recipient delivery instruction on the send queue.
///
/// The recipient can also be a team-channel receiver; the downstream
/// sender only needs the conversation reference either way.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendQueueMessage {
    /// Id of the sent notification being delivered.
    pub notification_id: String,
    /// The recipient to deliver to.
    pub recipient: RecipientRecord,
}

/// The delayed trigger that starts delivery-result aggregation once the
/// per-recipient messages have had time to begin flowing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregationTriggerMessage {
    /// Id of the sent notification.
    pub notification_id: String,
    /// When the send began.
    pub initial_send_date: DateTime<Utc>,
    /// Total recipients the aggregation should expect.
    pub total_message_count: i64,
}

impl SendQueueMessage {
    /// Serialize to the queue body format.
    pub fn to_bytes(&self) -> AppResult<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }
}

impl AggregationTriggerMessage {
    /// Serialize to the queue body format.
    pub fn to_bytes(&self) -> AppResult<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }
}

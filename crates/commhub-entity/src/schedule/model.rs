//! Schedule entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Durable pointer to the next due occurrence of a scheduled or
/// recurring notification.
///
/// Keyed by the owning notification id, so at most one schedule record
/// exists per notification at any time. The record is deleted and replaced
/// after each occurrence fires, and deleted permanently when the
/// recurrence terminates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRecord {
    /// Id of the owning notification in the scheduled-sent partition.
    pub notification_id: String,
    /// When the next occurrence is due.
    pub notification_date: DateTime<Utc>,
    /// When this schedule record was created.
    pub created_date: DateTime<Utc>,
}

impl ScheduleRecord {
    /// Whether the occurrence is due at `now`.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.notification_date <= now
    }
}

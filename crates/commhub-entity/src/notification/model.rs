//! Notification entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::audience::AudienceSpec;
use super::recurrence::{RecurrenceRule, RepeatFrequency, RepeatPolicy};

/// One communication: a draft, an in-flight send, or a completed send.
///
/// The same shape lives in all three notification partitions; the partition
/// a record is stored under, together with `is_draft`, determines its
/// lifecycle state. Content is immutable once the record leaves the draft
/// partition; only the delivery counters are mutated afterwards, by the
/// downstream result aggregation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationRecord {
    /// Opaque, time-ordered identifier (doubles as the row key).
    pub id: String,
    /// Notification title.
    pub title: String,
    /// Hero image URL.
    pub image_link: Option<String>,
    /// Summary text.
    pub summary: Option<String>,
    /// Author display name.
    pub author: Option<String>,
    /// Primary button caption.
    pub button_title: Option<String>,
    /// Primary button URL.
    pub button_link: Option<String>,
    /// Secondary button caption.
    pub button_title_2: Option<String>,
    /// Secondary button URL.
    pub button_link_2: Option<String>,
    /// User who authored the notification.
    pub created_by: Option<String>,
    /// When the draft was created.
    pub created_date: DateTime<Utc>,
    /// When delivery completed.
    pub sent_date: Option<DateTime<Utc>>,
    /// Whether the record is still an editable draft.
    pub is_draft: bool,
    /// Team ids whose channels receive the message.
    #[serde(default)]
    pub teams: Vec<String>,
    /// Team ids whose roster members receive the message.
    #[serde(default)]
    pub rosters: Vec<String>,
    /// AD group ids whose transitive members receive the message.
    #[serde(default)]
    pub ad_groups: Vec<String>,
    /// Deliver to every known user.
    #[serde(default)]
    pub all_users: bool,
    /// Card schema version carried through to the renderer.
    pub message_version: Option<String>,
    /// Count of successful deliveries.
    #[serde(default)]
    pub succeeded: i64,
    /// Count of failed deliveries.
    #[serde(default)]
    pub failed: i64,
    /// Count of throttled deliveries.
    #[serde(default)]
    pub throttled: i64,
    /// Total recipients, fixed once sending starts.
    #[serde(default)]
    pub total_message_count: i64,
    /// Whether delivery-result aggregation has finished.
    #[serde(default)]
    pub is_completed: bool,
    /// When the send began.
    pub sending_started_date: Option<DateTime<Utc>>,
    /// Whether the notification is a one-time scheduled send.
    #[serde(default)]
    pub is_scheduled: bool,
    /// Fire date for a one-time scheduled send.
    pub schedule_date: Option<DateTime<Utc>>,
    /// Whether the notification repeats.
    #[serde(default)]
    pub is_recurrence: bool,
    /// Repetition policy.
    pub repeats: Option<RepeatPolicy>,
    /// Interval multiplier for custom policies.
    #[serde(default)]
    pub repeat_for: i32,
    /// Interval unit for custom policies.
    pub repeat_frequency: Option<RepeatFrequency>,
    /// Ascending weekday indices (0 = Monday .. 6 = Sunday) for
    /// custom weekly rules.
    #[serde(default)]
    pub week_selection: Vec<u8>,
    /// First date of the recurrence window.
    pub repeat_start_date: Option<DateTime<Utc>>,
    /// Last date of the recurrence window.
    pub repeat_end_date: Option<DateTime<Utc>>,
}

impl NotificationRecord {
    /// The targeting dimensions of this notification.
    pub fn audience(&self) -> AudienceSpec {
        AudienceSpec {
            all_users: self.all_users,
            teams: self.teams.clone(),
            rosters: self.rosters.clone(),
            ad_groups: self.ad_groups.clone(),
        }
    }

    /// The recurrence rule, when the record is a fully specified
    /// recurring notification.
    pub fn recurrence_rule(&self) -> Option<RecurrenceRule> {
        if !self.is_recurrence {
            return None;
        }
        let policy = self.repeats?;
        let end_date = self.repeat_end_date?;
        Some(RecurrenceRule {
            policy,
            repeat_for: self.repeat_for,
            frequency: self.repeat_frequency,
            week_selection: self.week_selection.clone(),
            end_date,
        })
    }
}

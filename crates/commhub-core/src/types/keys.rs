//! Table naming and opaque time-ordered row keys.
//!
//! Row keys are lexicographically ordered strings derived from the creation
//! timestamp. Draft records sort oldest-first; sent records sort with the
//! most recent key first, so an unlimited partition listing returns the
//! newest sends at the top. Each generator instance hands out strictly
//! increasing timestamps, and a random suffix keeps keys unique across
//! processes.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Logical table names.
pub mod tables {
    /// Notification records (draft, sent, scheduled-sent partitions).
    pub const NOTIFICATIONS: &str = "notifications";
    /// Schedule records.
    pub const SCHEDULES: &str = "schedules";
    /// Recipient directory snapshot captured by the bot.
    pub const USERS: &str = "users";
    /// Team directory captured by the bot.
    pub const TEAMS: &str = "teams";
}

/// Logical partition names.
pub mod partitions {
    /// Unsent, editable notifications.
    pub const DRAFT: &str = "draft";
    /// Notifications that have begun or completed delivery.
    pub const SENT: &str = "sent";
    /// Scheduled/recurring master records awaiting occurrences.
    pub const SCHEDULED_SENT: &str = "scheduled-sent";
    /// Pending schedule records.
    pub const SCHEDULED: &str = "scheduled";
    /// Recipient directory rows.
    pub const USER_DATA: &str = "user-data";
    /// Team directory rows.
    pub const TEAM_DATA: &str = "team-data";
}

/// Width of the zero-padded timestamp component.
const TIMESTAMP_WIDTH: usize = 20;

/// Generator for opaque, time-ordered row keys.
#[derive(Debug, Clone, Default)]
pub struct RowKeyGenerator {
    last_micros: Arc<AtomicU64>,
}

impl RowKeyGenerator {
    /// Create a new generator.
    pub fn new() -> Self {
        Self::default()
    }

    /// New key that sorts after all keys previously generated by this
    /// instance's oldest-first sequence.
    pub fn new_oldest_first(&self) -> String {
        Self::oldest_first_at_micros(self.next_micros())
    }

    /// New key that sorts before all keys previously generated by this
    /// instance's most-recent-first sequence.
    pub fn new_most_recent_first(&self) -> String {
        Self::most_recent_first_at_micros(self.next_micros())
    }

    /// Oldest-first key for an explicit timestamp.
    pub fn oldest_first_at(at: DateTime<Utc>) -> String {
        Self::oldest_first_at_micros(micros(at))
    }

    /// Most-recent-first key for an explicit timestamp.
    pub fn most_recent_first_at(at: DateTime<Utc>) -> String {
        Self::most_recent_first_at_micros(micros(at))
    }

    fn oldest_first_at_micros(at: u64) -> String {
        format!(
            "{:0width$}-{}",
            at,
            Uuid::new_v4().simple(),
            width = TIMESTAMP_WIDTH
        )
    }

    fn most_recent_first_at_micros(at: u64) -> String {
        format!(
            "{:0width$}-{}",
            u64::MAX - at,
            Uuid::new_v4().simple(),
            width = TIMESTAMP_WIDTH
        )
    }

    /// Strictly increasing microsecond timestamps, so two keys generated
    /// back to back within one microsecond still order correctly.
    fn next_micros(&self) -> u64 {
        let now = micros(Utc::now());
        let mut prev = self.last_micros.load(Ordering::Relaxed);
        loop {
            let candidate = now.max(prev + 1);
            match self.last_micros.compare_exchange(
                prev,
                candidate,
                Ordering::SeqCst,
                Ordering::SeqCst,
            ) {
                Ok(_) => return candidate,
                Err(observed) => prev = observed,
            }
        }
    }
}

fn micros(at: DateTime<Utc>) -> u64 {
    // Timestamps before the epoch clamp to zero; keys only need to
    // order records created by this system.
    at.timestamp_micros().max(0) as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn test_oldest_first_orders_ascending() {
        let earlier = RowKeyGenerator::oldest_first_at(ts(1_000));
        let later = RowKeyGenerator::oldest_first_at(ts(2_000));
        assert!(earlier < later);
    }

    #[test]
    fn test_most_recent_first_orders_descending() {
        let earlier = RowKeyGenerator::most_recent_first_at(ts(1_000));
        let later = RowKeyGenerator::most_recent_first_at(ts(2_000));
        assert!(later < earlier);
    }

    #[test]
    fn test_generator_orders_back_to_back_keys() {
        let generator = RowKeyGenerator::new();
        let first = generator.new_oldest_first();
        let second = generator.new_oldest_first();
        assert!(first < second);

        let newest_first_a = generator.new_most_recent_first();
        let newest_first_b = generator.new_most_recent_first();
        assert!(newest_first_b < newest_first_a);
    }

    #[test]
    fn test_keys_are_unique_within_same_instant() {
        let at = ts(5_000);
        let a = RowKeyGenerator::most_recent_first_at(at);
        let b = RowKeyGenerator::most_recent_first_at(at);
        assert_ne!(a, b);
    }
}

//! Draft→sent transitions and schedule record maintenance.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use commhub_core::error::AppError;
use commhub_core::result::AppResult;
use commhub_core::types::keys::{RowKeyGenerator, partitions};
use commhub_entity::notification::NotificationRecord;
use commhub_entity::schedule::ScheduleRecord;
use commhub_store::repositories::notification::NotificationRepository;
use commhub_store::repositories::schedule::ScheduleRepository;

/// Manages the draft→sent state transition and the durable schedule
/// records that point at future occurrences.
#[derive(Debug, Clone)]
pub struct NotificationLifecycleStore {
    notifications: Arc<NotificationRepository>,
    schedules: Arc<ScheduleRepository>,
    keys: RowKeyGenerator,
}

impl NotificationLifecycleStore {
    /// Create a new lifecycle store.
    pub fn new(
        notifications: Arc<NotificationRepository>,
        schedules: Arc<ScheduleRepository>,
    ) -> Self {
        Self {
            notifications,
            schedules,
            keys: RowKeyGenerator::new(),
        }
    }

    /// Move a draft into the sent (or scheduled-sent) partition under a
    /// fresh most-recent-first id, then delete the draft. Returns the new
    /// id.
    ///
    /// The create and the delete form one logical transition. If the
    /// delete fails after the create succeeded, the error surfaces as a
    /// `Consistency` kind naming both records; it is not retried here
    /// because a blind retry risks a duplicate send.
    pub async fn move_draft_to_sent(
        &self,
        draft: &NotificationRecord,
        scheduled_or_recurring: bool,
    ) -> AppResult<String> {
        let new_id = self.keys.new_most_recent_first();
        let partition = if scheduled_or_recurring {
            partitions::SCHEDULED_SENT
        } else {
            partitions::SENT
        };

        let sent = sent_copy(draft, new_id.clone());
        self.notifications.upsert(partition, &sent).await?;

        match self.notifications.delete(partitions::DRAFT, &draft.id).await {
            Ok(true) => {}
            Ok(false) => {
                // Nothing left to delete; the transition still holds.
                warn!(draft_id = %draft.id, "Draft was already gone during move");
            }
            Err(e) => {
                return Err(AppError::consistency(format!(
                    "Sent record {new_id} created but draft {} could not be deleted: {e}",
                    draft.id
                )));
            }
        }

        info!(
            draft_id = %draft.id,
            notification_id = %new_id,
            partition,
            "Moved draft to sent partition"
        );
        Ok(new_id)
    }

    /// Copy a scheduled-sent master into the sent partition under a fresh
    /// id, leaving the master in place for future occurrences. Returns
    /// the new id.
    pub async fn copy_master_to_sent(&self, master: &NotificationRecord) -> AppResult<String> {
        let new_id = self.keys.new_most_recent_first();
        let sent = sent_copy(master, new_id.clone());
        self.notifications.upsert(partitions::SENT, &sent).await?;

        info!(
            master_id = %master.id,
            notification_id = %new_id,
            "Copied scheduled master to sent partition"
        );
        Ok(new_id)
    }

    /// Persist a schedule record for the notification's next occurrence.
    pub async fn create_schedule(
        &self,
        notification_id: &str,
        occurrence: DateTime<Utc>,
    ) -> AppResult<ScheduleRecord> {
        let record = ScheduleRecord {
            notification_id: notification_id.to_string(),
            notification_date: occurrence,
            created_date: Utc::now(),
        };
        self.schedules.create(&record).await?;
        Ok(record)
    }

    /// Replace the current schedule with one for `next`, or retire it
    /// permanently when the recurrence has ended.
    pub async fn advance_or_retire(
        &self,
        schedule: &ScheduleRecord,
        next: Option<DateTime<Utc>>,
    ) -> AppResult<()> {
        self.schedules.delete(&schedule.notification_id).await?;

        match next {
            Some(occurrence) => {
                self.create_schedule(&schedule.notification_id, occurrence)
                    .await?;
                info!(
                    notification_id = %schedule.notification_id,
                    occurrence = %occurrence,
                    "Advanced schedule to next occurrence"
                );
            }
            None => {
                info!(
                    notification_id = %schedule.notification_id,
                    "Retired schedule"
                );
            }
        }
        Ok(())
    }
}

/// Build the sent-partition copy of a notification: same content and
/// targeting, fresh identity, counters reset, delivery clock started.
fn sent_copy(source: &NotificationRecord, new_id: String) -> NotificationRecord {
    NotificationRecord {
        id: new_id,
        title: source.title.clone(),
        image_link: source.image_link.clone(),
        summary: source.summary.clone(),
        author: source.author.clone(),
        button_title: source.button_title.clone(),
        button_link: source.button_link.clone(),
        button_title_2: source.button_title_2.clone(),
        button_link_2: source.button_link_2.clone(),
        created_by: source.created_by.clone(),
        created_date: source.created_date,
        sent_date: None,
        is_draft: false,
        teams: source.teams.clone(),
        rosters: source.rosters.clone(),
        ad_groups: source.ad_groups.clone(),
        all_users: source.all_users,
        message_version: source.message_version.clone(),
        succeeded: 0,
        failed: 0,
        throttled: 0,
        total_message_count: source.total_message_count,
        is_completed: false,
        sending_started_date: Some(Utc::now()),
        is_scheduled: source.is_scheduled,
        schedule_date: source.schedule_date,
        is_recurrence: source.is_recurrence,
        repeats: source.repeats,
        repeat_for: source.repeat_for,
        repeat_frequency: source.repeat_frequency,
        week_selection: source.week_selection.clone(),
        repeat_start_date: source.repeat_start_date,
        repeat_end_date: source.repeat_end_date,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use commhub_store::memory::table::MemoryTableStore;

    fn draft(title: &str) -> NotificationRecord {
        NotificationRecord {
            id: String::new(),
            title: title.to_string(),
            image_link: None,
            summary: None,
            author: None,
            button_title: None,
            button_link: None,
            button_title_2: None,
            button_link_2: None,
            created_by: None,
            created_date: Utc::now(),
            sent_date: None,
            is_draft: true,
            teams: Vec::new(),
            rosters: Vec::new(),
            ad_groups: Vec::new(),
            all_users: true,
            message_version: None,
            succeeded: 5,
            failed: 1,
            throttled: 2,
            total_message_count: 0,
            is_completed: false,
            sending_started_date: None,
            is_scheduled: false,
            schedule_date: None,
            is_recurrence: false,
            repeats: None,
            repeat_for: 0,
            repeat_frequency: None,
            week_selection: Vec::new(),
            repeat_start_date: None,
            repeat_end_date: None,
        }
    }

    struct Fixture {
        notifications: Arc<NotificationRepository>,
        schedules: Arc<ScheduleRepository>,
        lifecycle: NotificationLifecycleStore,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(MemoryTableStore::new());
        let notifications = Arc::new(NotificationRepository::new(store.clone()));
        let schedules = Arc::new(ScheduleRepository::new(store));
        let lifecycle =
            NotificationLifecycleStore::new(notifications.clone(), schedules.clone());
        Fixture {
            notifications,
            schedules,
            lifecycle,
        }
    }

    #[tokio::test]
    async fn test_move_leaves_exactly_one_record() {
        let f = fixture();
        let draft_id = f.notifications.create_draft(draft("hello")).await.unwrap();
        let stored = f.notifications.get_draft(&draft_id).await.unwrap().unwrap();

        let sent_id = f.lifecycle.move_draft_to_sent(&stored, false).await.unwrap();

        assert!(f.notifications.get_draft(&draft_id).await.unwrap().is_none());
        let sent = f.notifications.get_sent(&sent_id).await.unwrap().unwrap();
        assert!(!sent.is_draft);
        assert!(!sent.is_completed);
        assert_eq!(sent.total_message_count, 0);
        assert_eq!((sent.succeeded, sent.failed, sent.throttled), (0, 0, 0));
        assert!(sent.sending_started_date.is_some());
    }

    #[tokio::test]
    async fn test_move_scheduled_targets_scheduled_sent_partition() {
        let f = fixture();
        let draft_id = f.notifications.create_draft(draft("later")).await.unwrap();
        let stored = f.notifications.get_draft(&draft_id).await.unwrap().unwrap();

        let sent_id = f.lifecycle.move_draft_to_sent(&stored, true).await.unwrap();

        assert!(f.notifications.get_sent(&sent_id).await.unwrap().is_none());
        assert!(
            f.notifications
                .get_scheduled_sent(&sent_id)
                .await
                .unwrap()
                .is_some()
        );
    }

    #[tokio::test]
    async fn test_copy_keeps_master() {
        let f = fixture();
        let mut master = draft("recurring");
        master.id = "master-1".to_string();
        master.is_draft = false;
        f.notifications
            .upsert(partitions::SCHEDULED_SENT, &master)
            .await
            .unwrap();

        let sent_id = f.lifecycle.copy_master_to_sent(&master).await.unwrap();

        assert!(f.notifications.get_sent(&sent_id).await.unwrap().is_some());
        assert!(
            f.notifications
                .get_scheduled_sent("master-1")
                .await
                .unwrap()
                .is_some()
        );
    }

    #[tokio::test]
    async fn test_advance_replaces_schedule() {
        let f = fixture();
        let schedule = f
            .lifecycle
            .create_schedule("n1", Utc::now())
            .await
            .unwrap();

        let next = Utc::now() + chrono::Duration::days(7);
        f.lifecycle
            .advance_or_retire(&schedule, Some(next))
            .await
            .unwrap();

        let replaced = f.schedules.get("n1").await.unwrap().expect("schedule");
        assert_eq!(replaced.notification_date, next);
        assert_eq!(f.schedules.all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_retire_deletes_schedule() {
        let f = fixture();
        let schedule = f
            .lifecycle
            .create_schedule("n1", Utc::now())
            .await
            .unwrap();

        f.lifecycle.advance_or_retire(&schedule, None).await.unwrap();
        assert!(f.schedules.get("n1").await.unwrap().is_none());
    }
}

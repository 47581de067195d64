//! End-to-end delivery flow over the in-memory backends.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use chrono::{Duration, Utc};

use commhub_core::config::delivery::DeliveryConfig;
use commhub_core::result::AppResult;
use commhub_core::traits::directory::GroupDirectory;
use commhub_core::types::member::GroupMember;
use commhub_entity::notification::{NotificationRecord, RepeatPolicy};
use commhub_entity::user::RecipientRecord;
use commhub_engine::audience::AudienceResolver;
use commhub_engine::delivery::{
    DeliveryBatcher, DeliveryOrchestrator, FireOutcome, ScheduleDisposition, SubmitOutcome,
};
use commhub_engine::lifecycle::NotificationLifecycleStore;
use commhub_store::memory::queue::MemoryQueuePublisher;
use commhub_store::memory::table::MemoryTableStore;
use commhub_store::repositories::notification::NotificationRepository;
use commhub_store::repositories::schedule::ScheduleRepository;
use commhub_store::repositories::team::TeamRepository;
use commhub_store::repositories::user::UserRepository;

struct NoGroups;

#[async_trait]
impl GroupDirectory for NoGroups {
    async fn direct_members(&self, _group_ids: &[String]) -> AppResult<Vec<GroupMember>> {
        Ok(Vec::new())
    }
}

struct TestApp {
    orchestrator: DeliveryOrchestrator,
    queue: Arc<MemoryQueuePublisher>,
    notifications: Arc<NotificationRepository>,
    schedules: Arc<ScheduleRepository>,
    users: Arc<UserRepository>,
}

impl TestApp {
    async fn new() -> Self {
        let store = Arc::new(MemoryTableStore::new());
        let queue = Arc::new(MemoryQueuePublisher::new());

        let notifications = Arc::new(NotificationRepository::new(store.clone()));
        let schedules = Arc::new(ScheduleRepository::new(store.clone()));
        let users = Arc::new(UserRepository::new(store.clone()));
        let teams = Arc::new(TeamRepository::new(store));

        let resolver = AudienceResolver::new(users.clone(), teams, Arc::new(NoGroups));
        let lifecycle = NotificationLifecycleStore::new(notifications.clone(), schedules.clone());
        let batcher = Arc::new(DeliveryBatcher::new(
            queue.clone(),
            DeliveryConfig::default(),
        ));
        let orchestrator = DeliveryOrchestrator::new(
            resolver,
            lifecycle,
            batcher,
            notifications.clone(),
        );

        Self {
            orchestrator,
            queue,
            notifications,
            schedules,
            users,
        }
    }

    async fn seed_users(&self, count: usize) {
        for i in 0..count {
            self.users
                .upsert(&RecipientRecord {
                    user_id: format!("29:u{i}"),
                    aad_id: format!("u{i}"),
                    name: format!("User {i}"),
                    email: None,
                    upn: None,
                    conversation_id: format!("a:u{i}"),
                    service_url: "https://smba.example".to_string(),
                    tenant_id: "tenant".to_string(),
                    department: None,
                    team_ids: Vec::new(),
                })
                .await
                .unwrap();
        }
    }
}

fn all_users_draft(title: &str) -> NotificationRecord {
    NotificationRecord {
        id: String::new(),
        title: title.to_string(),
        image_link: None,
        summary: Some("summary".to_string()),
        author: Some("author".to_string()),
        button_title: None,
        button_link: None,
        button_title_2: None,
        button_link_2: None,
        created_by: Some("alice".to_string()),
        created_date: Utc::now(),
        sent_date: None,
        is_draft: true,
        teams: Vec::new(),
        rosters: Vec::new(),
        ad_groups: Vec::new(),
        all_users: true,
        message_version: None,
        succeeded: 0,
        failed: 0,
        throttled: 0,
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

#[tokio::test]
async fn immediate_send_fans_out_and_triggers_aggregation() {
    let app = TestApp::new().await;
    app.seed_users(250).await;

    let draft_id = app
        .notifications
        .create_draft(all_users_draft("all hands"))
        .await
        .unwrap();

    let outcome = app.orchestrator.submit(&draft_id).await.unwrap();
    let SubmitOutcome::Sent { notification_id } = outcome else {
        panic!("expected Sent, got {outcome:?}");
    };

    // One message per recipient on the send queue.
    assert_eq!(app.queue.message_count("commhub-send"), 250);

    // One delayed aggregation trigger.
    let triggers = app.queue.published("commhub-data");
    assert_eq!(triggers.len(), 1);
    assert_eq!(triggers[0].delay, Some(StdDuration::from_secs(30)));

    // The draft moved; exactly one sent record exists with the final count.
    assert!(app.notifications.get_draft(&draft_id).await.unwrap().is_none());
    let sent = app
        .notifications
        .get_sent(&notification_id)
        .await
        .unwrap()
        .expect("sent record");
    assert_eq!(sent.total_message_count, 250);
    assert!(!sent.is_completed);
}

#[tokio::test]
async fn submitting_a_missing_draft_is_a_no_op() {
    let app = TestApp::new().await;
    let outcome = app.orchestrator.submit("does-not-exist").await.unwrap();
    assert!(matches!(outcome, SubmitOutcome::Skipped { .. }));
    assert_eq!(app.queue.message_count("commhub-send"), 0);
}

#[tokio::test]
async fn scheduled_submit_creates_schedule_without_publishing() {
    let app = TestApp::new().await;
    app.seed_users(3).await;

    let mut draft = all_users_draft("townhall");
    draft.is_scheduled = true;
    // A past date is accepted; it simply becomes due on the next pass.
    draft.schedule_date = Some(Utc::now() - Duration::hours(2));
    let draft_id = app.notifications.create_draft(draft).await.unwrap();

    let outcome = app.orchestrator.submit(&draft_id).await.unwrap();
    let SubmitOutcome::Scheduled { notification_id } = outcome else {
        panic!("expected Scheduled, got {outcome:?}");
    };

    // Nothing published yet; audience resolution happens at fire time.
    assert_eq!(app.queue.message_count("commhub-send"), 0);

    let schedule = app
        .schedules
        .get(&notification_id)
        .await
        .unwrap()
        .expect("schedule record");
    assert!(schedule.is_due(Utc::now()));

    assert!(
        app.notifications
            .get_scheduled_sent(&notification_id)
            .await
            .unwrap()
            .is_some()
    );
}

#[tokio::test]
async fn one_time_schedule_fires_once_then_retires() {
    let app = TestApp::new().await;
    app.seed_users(3).await;

    let mut draft = all_users_draft("townhall");
    draft.is_scheduled = true;
    draft.schedule_date = Some(Utc::now() - Duration::hours(2));
    let draft_id = app.notifications.create_draft(draft).await.unwrap();

    let SubmitOutcome::Scheduled { notification_id } =
        app.orchestrator.submit(&draft_id).await.unwrap()
    else {
        panic!("expected Scheduled");
    };
    let schedule = app.schedules.get(&notification_id).await.unwrap().unwrap();

    let outcome = app.orchestrator.fire_due(&schedule).await.unwrap();
    let FireOutcome::Sent {
        notification_id: occurrence_id,
        disposition,
    } = outcome
    else {
        panic!("expected Sent");
    };
    assert_eq!(disposition, ScheduleDisposition::Retired);

    // The occurrence produced its own sent record; the master survives.
    assert_eq!(app.queue.message_count("commhub-send"), 3);
    assert!(app.notifications.get_sent(&occurrence_id).await.unwrap().is_some());
    assert!(
        app.notifications
            .get_scheduled_sent(&notification_id)
            .await
            .unwrap()
            .is_some()
    );
    assert!(app.schedules.get(&notification_id).await.unwrap().is_none());
}

#[tokio::test]
async fn weekly_recurrence_advances_then_terminates_at_end_date() {
    let app = TestApp::new().await;
    app.seed_users(2).await;

    let start = Utc::now() - Duration::hours(1);
    let mut draft = all_users_draft("weekly digest");
    draft.is_recurrence = true;
    draft.repeats = Some(RepeatPolicy::Weekly);
    draft.repeat_start_date = Some(start);
    draft.repeat_end_date = Some(start + Duration::days(8));
    let draft_id = app.notifications.create_draft(draft).await.unwrap();

    let SubmitOutcome::Scheduled { notification_id } =
        app.orchestrator.submit(&draft_id).await.unwrap()
    else {
        panic!("expected Scheduled");
    };

    // First occurrence: advances one week.
    let first = app.schedules.get(&notification_id).await.unwrap().unwrap();
    let FireOutcome::Sent { disposition, .. } =
        app.orchestrator.fire_due(&first).await.unwrap()
    else {
        panic!("expected Sent");
    };
    assert_eq!(
        disposition,
        ScheduleDisposition::Advanced {
            next_occurrence: first.notification_date + Duration::days(7)
        }
    );

    // Second occurrence: the week after falls past the end date.
    let second = app.schedules.get(&notification_id).await.unwrap().unwrap();
    let FireOutcome::Sent { disposition, .. } =
        app.orchestrator.fire_due(&second).await.unwrap()
    else {
        panic!("expected Sent");
    };
    assert_eq!(disposition, ScheduleDisposition::Retired);
    assert!(app.schedules.get(&notification_id).await.unwrap().is_none());

    // Each occurrence delivered to the full audience.
    assert_eq!(app.queue.message_count("commhub-send"), 4);
    assert_eq!(app.queue.message_count("commhub-data"), 2);
}

#[tokio::test]
async fn firing_a_schedule_for_a_deleted_notification_retires_it() {
    let app = TestApp::new().await;
    app.seed_users(1).await;

    let mut draft = all_users_draft("townhall");
    draft.is_scheduled = true;
    draft.schedule_date = Some(Utc::now());
    let draft_id = app.notifications.create_draft(draft).await.unwrap();

    let SubmitOutcome::Scheduled { notification_id } =
        app.orchestrator.submit(&draft_id).await.unwrap()
    else {
        panic!("expected Scheduled");
    };
    let schedule = app.schedules.get(&notification_id).await.unwrap().unwrap();

    // Delete the master out-of-band.
    app.notifications
        .delete(commhub_core::types::keys::partitions::SCHEDULED_SENT, &notification_id)
        .await
        .unwrap();

    let outcome = app.orchestrator.fire_due(&schedule).await.unwrap();
    assert_eq!(outcome, FireOutcome::MissingNotification);
    assert!(app.schedules.get(&notification_id).await.unwrap().is_none());
    assert_eq!(app.queue.message_count("commhub-send"), 0);
}

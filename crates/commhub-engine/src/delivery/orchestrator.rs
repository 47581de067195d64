//! Top-level send orchestration.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{info, warn};

use commhub_core::error::AppError;
use commhub_core::result::AppResult;
use commhub_entity::notification::NotificationRecord;
use commhub_entity::schedule::ScheduleRecord;
use commhub_store::repositories::notification::NotificationRepository;

use crate::audience::AudienceResolver;
use crate::lifecycle::NotificationLifecycleStore;
use crate::recurrence::next_occurrence;

use super::batcher::DeliveryBatcher;

/// Result of submitting a draft for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The draft was not sent; nothing was changed.
    Skipped {
        /// Why the submit was a no-op.
        reason: SkipReason,
    },
    /// The draft moved to the scheduled-sent partition and a schedule
    /// record now points at its first occurrence.
    Scheduled {
        /// Id of the scheduled-sent master record.
        notification_id: String,
    },
    /// The draft was delivered immediately.
    Sent {
        /// Id of the sent record.
        notification_id: String,
    },
}

/// Why a submit was a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No draft exists under the given id.
    MissingDraft,
    /// The record exists but is not a draft.
    NotADraft,
    /// The recurrence window already ended before the first occurrence.
    RecurrenceWindowPassed,
}

/// What happened to the schedule record after an occurrence fired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleDisposition {
    /// A new schedule record points at the next occurrence.
    Advanced {
        /// The computed next occurrence.
        next_occurrence: DateTime<Utc>,
    },
    /// The schedule was deleted permanently.
    Retired,
}

/// Result of firing a due schedule record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FireOutcome {
    /// The owning notification no longer exists; the schedule was
    /// retired and the record skipped.
    MissingNotification,
    /// The occurrence was delivered.
    Sent {
        /// Id of the per-occurrence sent record.
        notification_id: String,
        /// Whether the schedule advanced or retired afterwards.
        disposition: ScheduleDisposition,
    },
}

/// Coordinates audience resolution, the lifecycle transition, batching,
/// and schedule maintenance for every send path.
#[derive(Clone)]
pub struct DeliveryOrchestrator {
    resolver: AudienceResolver,
    lifecycle: NotificationLifecycleStore,
    batcher: Arc<DeliveryBatcher>,
    notifications: Arc<NotificationRepository>,
}

impl DeliveryOrchestrator {
    /// Create a new orchestrator. This constructor is the composition
    /// point shared by every entry point (timer, HTTP, test triggers).
    pub fn new(
        resolver: AudienceResolver,
        lifecycle: NotificationLifecycleStore,
        batcher: Arc<DeliveryBatcher>,
        notifications: Arc<NotificationRepository>,
    ) -> Self {
        Self {
            resolver,
            lifecycle,
            batcher,
            notifications,
        }
    }

    /// Submit a draft for delivery.
    ///
    /// Immediate drafts are resolved, moved to the sent partition, and
    /// published right away. Scheduled and recurring drafts move to the
    /// scheduled-sent partition and receive a schedule record instead;
    /// no audience resolution happens until the occurrence fires.
    pub async fn submit(&self, draft_id: &str) -> AppResult<SubmitOutcome> {
        let Some(draft) = self.notifications.get_draft(draft_id).await? else {
            return Ok(SubmitOutcome::Skipped {
                reason: SkipReason::MissingDraft,
            });
        };
        if !draft.is_draft {
            return Ok(SubmitOutcome::Skipped {
                reason: SkipReason::NotADraft,
            });
        }

        if draft.is_scheduled || draft.is_recurrence {
            self.submit_scheduled(draft).await
        } else {
            self.submit_immediate(draft).await
        }
    }

    async fn submit_scheduled(&self, draft: NotificationRecord) -> AppResult<SubmitOutcome> {
        let occurrence = if draft.is_scheduled {
            // Past dates are allowed: the occurrence simply becomes due on
            // the next periodic pass.
            draft.schedule_date.ok_or_else(|| {
                AppError::validation(format!("Scheduled draft {} has no schedule date", draft.id))
            })?
        } else {
            let start = draft.repeat_start_date.ok_or_else(|| {
                AppError::validation(format!("Recurring draft {} has no start date", draft.id))
            })?;
            let end = draft.repeat_end_date.ok_or_else(|| {
                AppError::validation(format!("Recurring draft {} has no end date", draft.id))
            })?;

            // A start in the past clamps to yesterday, so the first
            // occurrence is due immediately.
            let yesterday = Utc::now() - Duration::days(1);
            let clamped = if start < yesterday { yesterday } else { start };

            if clamped > end {
                info!(draft_id = %draft.id, "Recurrence window already passed; not scheduling");
                return Ok(SubmitOutcome::Skipped {
                    reason: SkipReason::RecurrenceWindowPassed,
                });
            }
            clamped
        };

        let notification_id = self.lifecycle.move_draft_to_sent(&draft, true).await?;
        self.lifecycle
            .create_schedule(&notification_id, occurrence)
            .await?;

        info!(
            notification_id = %notification_id,
            occurrence = %occurrence,
            "Scheduled notification"
        );
        Ok(SubmitOutcome::Scheduled { notification_id })
    }

    async fn submit_immediate(&self, draft: NotificationRecord) -> AppResult<SubmitOutcome> {
        let recipients = self.resolver.resolve(&draft.audience()).await?;
        let total = recipients.len() as i64;

        let mut outgoing = draft;
        outgoing.total_message_count = total;

        let notification_id = self.lifecycle.move_draft_to_sent(&outgoing, false).await?;
        self.batcher
            .publish_recipients(&notification_id, &recipients)
            .await?;
        self.batcher
            .trigger_aggregation(&notification_id, total)
            .await?;

        info!(
            notification_id = %notification_id,
            recipients = recipients.len(),
            "Sent notification"
        );
        Ok(SubmitOutcome::Sent { notification_id })
    }

    /// Fire a due schedule record.
    ///
    /// The audience is re-resolved at fire time, so membership changes
    /// between scheduling and firing are honored. The schedule record is
    /// only advanced or retired after resolution and publish succeed, so
    /// a transient failure keeps the occurrence due for the next pass
    /// instead of silently dropping it.
    pub async fn fire_due(&self, schedule: &ScheduleRecord) -> AppResult<FireOutcome> {
        let Some(master) = self
            .notifications
            .get_scheduled_sent(&schedule.notification_id)
            .await?
        else {
            warn!(
                notification_id = %schedule.notification_id,
                "Scheduled notification no longer exists; retiring schedule"
            );
            self.lifecycle.advance_or_retire(schedule, None).await?;
            return Ok(FireOutcome::MissingNotification);
        };

        let recipients = self.resolver.resolve(&master.audience()).await?;
        let total = recipients.len() as i64;

        let mut outgoing = master.clone();
        outgoing.total_message_count = total;

        let notification_id = self.lifecycle.copy_master_to_sent(&outgoing).await?;
        self.batcher
            .publish_recipients(&notification_id, &recipients)
            .await?;
        self.batcher
            .trigger_aggregation(&notification_id, total)
            .await?;

        let disposition = if master.is_recurrence {
            let next = master
                .recurrence_rule()
                .and_then(|rule| next_occurrence(&rule, schedule.notification_date));
            self.lifecycle.advance_or_retire(schedule, next).await?;
            match next {
                Some(date) => ScheduleDisposition::Advanced {
                    next_occurrence: date,
                },
                None => ScheduleDisposition::Retired,
            }
        } else {
            self.lifecycle.advance_or_retire(schedule, None).await?;
            ScheduleDisposition::Retired
        };

        info!(
            master_id = %master.id,
            notification_id = %notification_id,
            recipients = recipients.len(),
            "Fired scheduled occurrence"
        );
        Ok(FireOutcome::Sent {
            notification_id,
            disposition,
        })
    }
}

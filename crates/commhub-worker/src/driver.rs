//! Due-schedule pass over the schedule table.

use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info};

use commhub_core::result::AppResult;
use commhub_engine::delivery::{DeliveryOrchestrator, FireOutcome};
use commhub_store::repositories::schedule::ScheduleRepository;

/// Result of processing one due schedule record.
#[derive(Debug, Clone)]
pub struct RecordOutcome {
    /// Notification the schedule record belongs to.
    pub notification_id: String,
    /// What happened to the record.
    pub result: RecordResult,
}

/// Per-record disposition of a pass.
#[derive(Debug, Clone)]
pub enum RecordResult {
    /// The occurrence fired (or was skipped as missing) successfully.
    Fired(FireOutcome),
    /// Firing failed; the schedule record stays due for the next pass.
    Failed(String),
}

/// Finds all schedule records whose occurrence is due and fires each one.
///
/// Failures are isolated per record: a record that fails is logged,
/// reported in the outcome summary, and left in place so the next pass
/// retries it, while the remaining records still fire.
#[derive(Clone)]
pub struct ScheduleDriver {
    schedules: Arc<ScheduleRepository>,
    orchestrator: Arc<DeliveryOrchestrator>,
}

impl ScheduleDriver {
    /// Create a new driver.
    pub fn new(schedules: Arc<ScheduleRepository>, orchestrator: Arc<DeliveryOrchestrator>) -> Self {
        Self {
            schedules,
            orchestrator,
        }
    }

    /// Fire every schedule record due at the time of the call and return
    /// a per-record outcome summary.
    pub async fn run_due_pass(&self) -> AppResult<Vec<RecordOutcome>> {
        let due = self.schedules.due_before(Utc::now()).await?;
        info!(due = due.len(), "Due-schedule pass started");

        let mut outcomes = Vec::with_capacity(due.len());
        for schedule in due {
            let result = match self.orchestrator.fire_due(&schedule).await {
                Ok(outcome) => {
                    info!(
                        notification_id = %schedule.notification_id,
                        outcome = ?outcome,
                        "Schedule record processed"
                    );
                    RecordResult::Fired(outcome)
                }
                Err(e) => {
                    error!(
                        notification_id = %schedule.notification_id,
                        error = %e,
                        "Schedule record failed"
                    );
                    RecordResult::Failed(e.to_string())
                }
            };
            outcomes.push(RecordOutcome {
                notification_id: schedule.notification_id.clone(),
                result,
            });
        }

        Ok(outcomes)
    }
}

//! Cron wrapper that runs the due-schedule pass on a fixed cadence.

use std::sync::Arc;

use tokio_cron_scheduler::{Job as CronJob, JobScheduler};
use tracing;

use commhub_core::config::scheduler::SchedulerConfig;
use commhub_core::error::AppError;

use crate::driver::ScheduleDriver;

/// Cron-based worker that periodically fires due schedule records.
pub struct ScheduleWorker {
    /// The underlying job scheduler.
    scheduler: JobScheduler,
    /// Schedule driver invoked on each tick.
    driver: Arc<ScheduleDriver>,
    /// Worker configuration.
    config: SchedulerConfig,
}

impl std::fmt::Debug for ScheduleWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScheduleWorker").finish()
    }
}

impl ScheduleWorker {
    /// Create a new schedule worker.
    pub async fn new(driver: Arc<ScheduleDriver>, config: SchedulerConfig) -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {}", e)))?;

        Ok(Self {
            scheduler,
            driver,
            config,
        })
    }

    /// Register the periodic due-schedule pass.
    pub async fn register_due_pass(&self) -> Result<(), AppError> {
        if !self.config.enabled {
            tracing::info!("Schedule driver disabled by configuration");
            return Ok(());
        }

        let driver = Arc::clone(&self.driver);
        let job = CronJob::new_async(self.config.cron.as_str(), move |_uuid, _lock| {
            let driver = Arc::clone(&driver);
            Box::pin(async move {
                match driver.run_due_pass().await {
                    Ok(outcomes) => {
                        tracing::info!(records = outcomes.len(), "Due-schedule pass completed");
                    }
                    Err(e) => {
                        tracing::error!("Due-schedule pass failed: {}", e);
                    }
                }
            })
        })
        .map_err(|e| AppError::internal(format!("Failed to create due-pass schedule: {}", e)))?;

        self.scheduler
            .add(job)
            .await
            .map_err(|e| AppError::internal(format!("Failed to add due-pass schedule: {}", e)))?;

        tracing::info!("Registered: due-schedule pass ({})", self.config.cron);
        Ok(())
    }

    /// Start the scheduler.
    pub async fn start(&self) -> Result<(), AppError> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {}", e)))?;

        tracing::info!("Schedule worker started");
        Ok(())
    }

    /// Shutdown the scheduler.
    pub async fn shutdown(&self) -> Result<(), AppError> {
        let mut scheduler = self.scheduler.clone();
        scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {}", e)))?;

        tracing::info!("Schedule worker shut down");
        Ok(())
    }
}

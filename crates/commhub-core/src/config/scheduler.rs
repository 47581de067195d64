//! Periodic schedule-driver configuration.

use serde::{Deserialize, Serialize};

/// Settings for the periodic worker that fires due schedule records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Whether the periodic driver is enabled.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Cron expression for the due-schedule pass (seconds granularity).
    #[serde(default = "default_cron")]
    pub cron: String,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            cron: default_cron(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_cron() -> String {
    // Every 30 minutes.
    "0 */30 * * * *".to_string()
}

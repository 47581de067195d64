//! Delivery batching and queue configuration.

use serde::{Deserialize, Serialize};

/// Settings for recipient batching and queue publishing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryConfig {
    /// Number of recipients per queue batch.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Name of the per-recipient send queue.
    #[serde(default = "default_send_queue")]
    pub send_queue: String,
    /// Name of the aggregation trigger queue.
    #[serde(default = "default_data_queue")]
    pub data_queue: String,
    /// Delay in seconds before the aggregation trigger becomes visible,
    /// giving delivery counters time to start accumulating.
    #[serde(default = "default_aggregation_delay")]
    pub aggregation_delay_seconds: u64,
    /// Maximum publish attempts per batch before the send fails.
    #[serde(default = "default_publish_attempts")]
    pub publish_attempts: u32,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            send_queue: default_send_queue(),
            data_queue: default_data_queue(),
            aggregation_delay_seconds: default_aggregation_delay(),
            publish_attempts: default_publish_attempts(),
        }
    }
}

fn default_batch_size() -> usize {
    100
}

fn default_send_queue() -> String {
    "commhub-send".to_string()
}

fn default_data_queue() -> String {
    "commhub-data".to_string()
}

fn default_aggregation_delay() -> u64 {
    30
}

fn default_publish_attempts() -> u32 {
    3
}

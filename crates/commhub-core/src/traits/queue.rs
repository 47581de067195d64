//! Message queue publisher abstraction.
//!
//! The broker (Azure Service Bus in production) is external; the delivery
//! engine only needs to enqueue pre-serialized message bodies, in batches or
//! with a visibility delay.

use std::time::Duration;

use async_trait::async_trait;

use crate::result::AppResult;

/// Publisher side of the downstream delivery queues.
#[async_trait]
pub trait QueuePublisher: Send + Sync + 'static {
    /// Publish a batch of messages to the named queue. The batch either
    /// enqueues entirely or fails entirely, so a failed batch is safe to
    /// retry as a unit.
    async fn publish_batch(&self, queue: &str, messages: Vec<Vec<u8>>) -> AppResult<()>;

    /// Publish a single message that becomes visible after `delay`.
    async fn publish_delayed(
        &self,
        queue: &str,
        message: Vec<u8>,
        delay: Duration,
    ) -> AppResult<()>;
}

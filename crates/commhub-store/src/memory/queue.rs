//! In-memory queue publisher that records everything it is handed.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use commhub_core::error::AppError;
use commhub_core::result::AppResult;
use commhub_core::traits::queue::QueuePublisher;

/// One recorded queue message.
#[derive(Debug, Clone)]
pub struct QueuedMessage {
    /// Broker-assigned message id.
    pub id: Uuid,
    /// Destination queue name.
    pub queue: String,
    /// Serialized message body.
    pub body: Vec<u8>,
    /// Visibility delay, when published via `publish_delayed`.
    pub delay: Option<Duration>,
    /// When the message was enqueued.
    pub enqueued_at: DateTime<Utc>,
}

/// In-memory [`QueuePublisher`] that keeps published messages in
/// enqueue order for inspection.
#[derive(Debug, Default)]
pub struct MemoryQueuePublisher {
    messages: Mutex<Vec<QueuedMessage>>,
}

impl MemoryQueuePublisher {
    /// Create an empty publisher.
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages published to the named queue, in enqueue order.
    pub fn published(&self, queue: &str) -> Vec<QueuedMessage> {
        match self.messages.lock() {
            Ok(guard) => guard.iter().filter(|m| m.queue == queue).cloned().collect(),
            Err(_) => Vec::new(),
        }
    }

    /// Number of messages published to the named queue.
    pub fn message_count(&self, queue: &str) -> usize {
        self.published(queue).len()
    }

    /// Drop all recorded messages.
    pub fn clear(&self) {
        if let Ok(mut guard) = self.messages.lock() {
            guard.clear();
        }
    }

    fn push(&self, message: QueuedMessage) -> AppResult<()> {
        let mut guard = self
            .messages
            .lock()
            .map_err(|_| AppError::internal("Queue mutex poisoned"))?;
        guard.push(message);
        Ok(())
    }
}

#[async_trait]
impl QueuePublisher for MemoryQueuePublisher {
    async fn publish_batch(&self, queue: &str, messages: Vec<Vec<u8>>) -> AppResult<()> {
        for body in messages {
            self.push(QueuedMessage {
                id: Uuid::new_v4(),
                queue: queue.to_string(),
                body,
                delay: None,
                enqueued_at: Utc::now(),
            })?;
        }
        Ok(())
    }

    async fn publish_delayed(
        &self,
        queue: &str,
        message: Vec<u8>,
        delay: Duration,
    ) -> AppResult<()> {
        self.push(QueuedMessage {
            id: Uuid::new_v4(),
            queue: queue.to_string(),
            body: message,
            delay: Some(delay),
            enqueued_at: Utc::now(),
        })
    }
}

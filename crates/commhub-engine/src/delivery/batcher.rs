//! Recipient batching and queue publishing.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, warn};

use commhub_core::config::delivery::DeliveryConfig;
use commhub_core::error::AppError;
use commhub_core::result::AppResult;
use commhub_core::traits::queue::QueuePublisher;
use commhub_entity::user::RecipientRecord;

use super::messages::{AggregationTriggerMessage, SendQueueMessage};

/// Partition `items` into order-preserving chunks of at most `size`
/// elements. Every chunk except possibly the last has exactly `size`
/// elements, and concatenating the chunks yields the input unchanged.
pub fn batch<T: Clone>(items: &[T], size: usize) -> Vec<Vec<T>> {
    if items.is_empty() {
        return Vec::new();
    }
    items
        .chunks(size.max(1))
        .map(|chunk| chunk.to_vec())
        .collect()
}

/// Publishes a resolved recipient list to the send queue in fixed-size
/// batches, then arms the delayed aggregation trigger.
pub struct DeliveryBatcher {
    publisher: Arc<dyn QueuePublisher>,
    config: DeliveryConfig,
}

impl DeliveryBatcher {
    /// Create a new batcher over the queue publisher.
    pub fn new(publisher: Arc<dyn QueuePublisher>, config: DeliveryConfig) -> Self {
        Self { publisher, config }
    }

    /// Serialize one message per recipient and publish them in batches.
    ///
    /// Each batch is retried independently up to the configured attempt
    /// count; batches already enqueued are never re-sent, so a failure
    /// here leaves a retryable tail rather than duplicate deliveries.
    pub async fn publish_recipients(
        &self,
        notification_id: &str,
        recipients: &[RecipientRecord],
    ) -> AppResult<()> {
        let messages: Vec<Vec<u8>> = recipients
            .iter()
            .map(|recipient| {
                SendQueueMessage {
                    notification_id: notification_id.to_string(),
                    recipient: recipient.clone(),
                }
                .to_bytes()
            })
            .collect::<AppResult<_>>()?;

        let batches = batch(&messages, self.config.batch_size);
        let total = batches.len();

        for (index, chunk) in batches.into_iter().enumerate() {
            self.publish_batch_with_retry(index + 1, total, chunk).await?;
        }

        debug!(
            notification_id,
            recipients = recipients.len(),
            batches = total,
            "Published send-queue batches"
        );
        Ok(())
    }

    /// Publish the delayed trigger that starts result aggregation.
    pub async fn trigger_aggregation(
        &self,
        notification_id: &str,
        total_message_count: i64,
    ) -> AppResult<()> {
        let message = AggregationTriggerMessage {
            notification_id: notification_id.to_string(),
            initial_send_date: Utc::now(),
            total_message_count,
        }
        .to_bytes()?;

        self.publisher
            .publish_delayed(
                &self.config.data_queue,
                message,
                Duration::from_secs(self.config.aggregation_delay_seconds),
            )
            .await
            .map_err(|e| {
                AppError::publish(format!(
                    "Aggregation trigger for {notification_id} failed: {e}"
                ))
            })
    }

    async fn publish_batch_with_retry(
        &self,
        batch_number: usize,
        total_batches: usize,
        chunk: Vec<Vec<u8>>,
    ) -> AppResult<()> {
        let attempts = self.config.publish_attempts.max(1);
        let mut last_error = None;

        for attempt in 1..=attempts {
            match self
                .publisher
                .publish_batch(&self.config.send_queue, chunk.clone())
                .await
            {
                Ok(()) => return Ok(()),
                Err(e) => {
                    warn!(
                        batch_number,
                        total_batches, attempt, attempts, error = %e,
                        "Batch publish attempt failed"
                    );
                    last_error = Some(e);
                }
            }
        }

        let cause = last_error.map(|e| e.to_string()).unwrap_or_default();
        Err(AppError::publish(format!(
            "Batch {batch_number}/{total_batches} failed after {attempts} attempts: {cause}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use commhub_store::memory::queue::MemoryQueuePublisher;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn recipient(aad_id: &str) -> RecipientRecord {
        RecipientRecord {
            user_id: format!("29:{aad_id}"),
            aad_id: aad_id.to_string(),
            name: aad_id.to_string(),
            email: None,
            upn: None,
            conversation_id: format!("a:{aad_id}"),
            service_url: "https://smba.example".to_string(),
            tenant_id: "tenant".to_string(),
            department: None,
            team_ids: Vec::new(),
        }
    }

    fn recipients(count: usize) -> Vec<RecipientRecord> {
        (0..count).map(|i| recipient(&format!("u{i}"))).collect()
    }

    #[test]
    fn test_batch_splits_250_into_100_100_50() {
        let items: Vec<u32> = (0..250).collect();
        let batches = batch(&items, 100);
        let sizes: Vec<usize> = batches.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![100, 100, 50]);
    }

    #[test]
    fn test_batch_concat_preserves_input() {
        let items: Vec<u32> = (0..73).collect();
        let batches = batch(&items, 10);
        let rejoined: Vec<u32> = batches.into_iter().flatten().collect();
        assert_eq!(rejoined, items);
    }

    #[test]
    fn test_batch_empty_input() {
        let batches = batch::<u32>(&[], 100);
        assert!(batches.is_empty());
    }

    #[test]
    fn test_batch_exact_multiple_has_no_short_tail() {
        let items: Vec<u32> = (0..200).collect();
        let sizes: Vec<usize> = batch(&items, 100).iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![100, 100]);
    }

    #[tokio::test]
    async fn test_publish_recipients_enqueues_one_message_each() {
        let publisher = Arc::new(MemoryQueuePublisher::new());
        let batcher = DeliveryBatcher::new(publisher.clone(), DeliveryConfig::default());

        batcher
            .publish_recipients("n1", &recipients(250))
            .await
            .unwrap();

        let messages = publisher.published("commhub-send");
        assert_eq!(messages.len(), 250);

        let first: SendQueueMessage = serde_json::from_slice(&messages[0].body).unwrap();
        assert_eq!(first.notification_id, "n1");
        assert_eq!(first.recipient.aad_id, "u0");
    }

    #[tokio::test]
    async fn test_trigger_aggregation_is_delayed_30_seconds() {
        let publisher = Arc::new(MemoryQueuePublisher::new());
        let batcher = DeliveryBatcher::new(publisher.clone(), DeliveryConfig::default());

        batcher.trigger_aggregation("n1", 250).await.unwrap();

        let messages = publisher.published("commhub-data");
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].delay, Some(Duration::from_secs(30)));

        let trigger: AggregationTriggerMessage =
            serde_json::from_slice(&messages[0].body).unwrap();
        assert_eq!(trigger.total_message_count, 250);
    }

    /// Fails the first `failures` publish calls, then delegates to an
    /// in-memory publisher.
    struct FlakyPublisher {
        inner: MemoryQueuePublisher,
        failures: AtomicU32,
    }

    #[async_trait]
    impl QueuePublisher for FlakyPublisher {
        async fn publish_batch(&self, queue: &str, messages: Vec<Vec<u8>>) -> AppResult<()> {
            let should_fail = self
                .failures
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |f| f.checked_sub(1))
                .is_ok();
            if should_fail {
                return Err(AppError::external_service("broker unavailable"));
            }
            self.inner.publish_batch(queue, messages).await
        }

        async fn publish_delayed(
            &self,
            queue: &str,
            message: Vec<u8>,
            delay: Duration,
        ) -> AppResult<()> {
            self.inner.publish_delayed(queue, message, delay).await
        }
    }

    #[tokio::test]
    async fn test_transient_batch_failure_is_retried() {
        let publisher = Arc::new(FlakyPublisher {
            inner: MemoryQueuePublisher::new(),
            failures: AtomicU32::new(1),
        });
        let batcher = DeliveryBatcher::new(publisher.clone(), DeliveryConfig::default());

        batcher
            .publish_recipients("n1", &recipients(5))
            .await
            .unwrap();
        assert_eq!(publisher.inner.message_count("commhub-send"), 5);
    }

    #[tokio::test]
    async fn test_persistent_batch_failure_surfaces_publish_error() {
        let publisher = Arc::new(FlakyPublisher {
            inner: MemoryQueuePublisher::new(),
            failures: AtomicU32::new(u32::MAX),
        });
        let batcher = DeliveryBatcher::new(publisher, DeliveryConfig::default());

        let err = batcher
            .publish_recipients("n1", &recipients(5))
            .await
            .unwrap_err();
        assert_eq!(err.kind, commhub_core::error::ErrorKind::Publish);
    }
}

//! Recipient fan-out and send orchestration.

pub mod batcher;
pub mod messages;
pub mod orchestrator;

pub use batcher::{DeliveryBatcher, batch};
pub use messages::{AggregationTriggerMessage, SendQueueMessage};
pub use orchestrator::{
    DeliveryOrchestrator, FireOutcome, ScheduleDisposition, SkipReason, SubmitOutcome,
};

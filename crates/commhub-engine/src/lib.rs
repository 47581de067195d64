//! # commhub-engine
//!
//! The notification delivery and recurrence-scheduling core of CommHub.
//! Orchestrates audience resolution, the draft→sent lifecycle transition,
//! recipient fan-out into bounded queue batches, and occurrence
//! computation for recurring notifications.
//!
//! Components follow constructor injection — all collaborators are
//! provided at construction time via `Arc` references.

pub mod audience;
pub mod delivery;
pub mod lifecycle;
pub mod recurrence;

pub use audience::AudienceResolver;
pub use delivery::{DeliveryBatcher, DeliveryOrchestrator, FireOutcome, SubmitOutcome};
pub use lifecycle::NotificationLifecycleStore;
pub use recurrence::next_occurrence;

//! Notification entity and its audience/recurrence value types.

pub mod audience;
pub mod model;
pub mod recurrence;

pub use audience::AudienceSpec;
pub use model::NotificationRecord;
pub use recurrence::{RecurrenceRule, RepeatFrequency, RepeatPolicy};

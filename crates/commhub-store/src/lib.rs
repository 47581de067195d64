//! # commhub-store
//!
//! Storage layer for CommHub: typed repositories over the
//! [`commhub_core::traits::TableStore`] abstraction, the directory traits
//! consumed by the audience resolver, and first-class in-memory backends
//! used by tests and single-node deployments.

pub mod directory;
pub mod memory;
pub mod repositories;

pub use directory::{TeamDirectory, UserDirectory};
pub use memory::{MemoryQueuePublisher, MemoryTableStore};
pub use repositories::notification::NotificationRepository;
pub use repositories::schedule::ScheduleRepository;
pub use repositories::team::TeamRepository;
pub use repositories::user::UserRepository;

//! # commhub-worker
//!
//! Periodic processing for CommHub:
//! - A schedule driver that fires all due schedule records, isolating
//!   per-record failures so one bad record never blocks the rest
//! - A cron wrapper that runs the driver pass on a configurable cadence

pub mod driver;
pub mod scheduler;

pub use driver::ScheduleDriver;
pub use scheduler::ScheduleWorker;

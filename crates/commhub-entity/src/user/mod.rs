//! Recipient entity.

pub mod model;

pub use model::RecipientRecord;

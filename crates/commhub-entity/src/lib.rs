//! # commhub-entity
//!
//! Domain entity models for CommHub. Every struct in this crate represents
//! a stored table row or a domain value object. All entities derive
//! `Debug`, `Clone`, `Serialize`, and `Deserialize`.

pub mod notification;
pub mod schedule;
pub mod team;
pub mod user;

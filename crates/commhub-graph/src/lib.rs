//! # commhub-graph
//!
//! Microsoft Graph integration for CommHub: typed `$batch` payloads,
//! client-credentials token acquisition, and the [`GroupDirectory`]
//! implementation the audience resolver uses to expand AD groups.
//!
//! [`GroupDirectory`]: commhub_core::traits::GroupDirectory

pub mod batch;
pub mod client;
pub mod membership;

pub use client::GraphClient;
pub use membership::GraphGroupDirectory;

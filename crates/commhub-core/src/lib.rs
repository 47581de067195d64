//! # commhub-core
//!
//! Core crate for CommHub. Contains collaborator traits, configuration
//! schemas, table naming and row-key generation, logging setup, and the
//! unified error system.
//!
//! This crate has **no** internal dependencies on other CommHub crates.

pub mod config;
pub mod error;
pub mod logging;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;

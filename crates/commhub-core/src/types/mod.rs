//! Core type definitions used across the CommHub workspace.

pub mod keys;
pub mod member;

pub use keys::RowKeyGenerator;
pub use member::{GroupMember, MemberKind};

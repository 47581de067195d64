//! Audience targeting specification.

use serde::{Deserialize, Serialize};

/// The targeting dimensions chosen by the notification author.
///
/// The dimensions are mutually exclusive at authoring time (`all_users`
/// versus the three id lists), but the type deliberately does not enforce
/// that: resolution honors `all_users` first and otherwise unions whatever
/// dimensions are present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudienceSpec {
    /// Deliver to every known user.
    pub all_users: bool,
    /// Team ids whose channels receive the message.
    pub teams: Vec<String>,
    /// Team ids whose roster members receive the message.
    pub rosters: Vec<String>,
    /// AD group ids whose (transitive) members receive the message.
    pub ad_groups: Vec<String>,
}

impl AudienceSpec {
    /// Whether no targeting dimension is present at all.
    pub fn is_empty(&self) -> bool {
        !self.all_users
            && self.teams.is_empty()
            && self.rosters.is_empty()
            && self.ad_groups.is_empty()
    }
}

//! Directory member value types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a directory group member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberKind {
    /// A user principal.
    User,
    /// A nested group that must be expanded further.
    Group,
}

impl MemberKind {
    /// Return the kind as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Group => "group",
        }
    }
}

impl fmt::Display for MemberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One direct member of a directory group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupMember {
    /// Directory object id of the member.
    pub id: String,
    /// Display name, when the directory provides one.
    pub display_name: Option<String>,
    /// Whether the member is a user or a nested group.
    pub kind: MemberKind,
}

impl GroupMember {
    /// Create a user member.
    pub fn user(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: None,
            kind: MemberKind::User,
        }
    }

    /// Create a nested-group member.
    pub fn group(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: None,
            kind: MemberKind::Group,
        }
    }
}

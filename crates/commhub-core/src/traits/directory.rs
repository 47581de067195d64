//! Directory-group membership abstraction.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::member::GroupMember;

/// Provider of direct (single-level) AD group membership.
///
/// Returns the immediate members of the given groups; nested groups come
/// back as [`GroupMember`]s of kind `Group`. Transitive expansion, including
/// cycle protection, is performed by the audience resolver so that every
/// provider implementation gets the same traversal semantics.
#[async_trait]
pub trait GroupDirectory: Send + Sync + 'static {
    /// Fetch the direct members of each group id.
    async fn direct_members(&self, group_ids: &[String]) -> AppResult<Vec<GroupMember>>;
}

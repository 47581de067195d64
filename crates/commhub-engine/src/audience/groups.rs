//! Transitive expansion of nested directory groups.

use std::collections::HashSet;

use tracing::debug;

use commhub_core::result::AppResult;
use commhub_core::traits::directory::GroupDirectory;
use commhub_core::types::member::{GroupMember, MemberKind};

/// Expand the given groups transitively until only user members remain.
///
/// Traversal is level-order: each round fetches the direct members of the
/// current frontier, collects the users, and queues nested groups that
/// have not been visited yet. The visited set guards against membership
/// cycles (a group that transitively contains itself), which would
/// otherwise recurse forever. Users are deduplicated by directory id.
pub async fn expand_transitively(
    directory: &dyn GroupDirectory,
    group_ids: &[String],
) -> AppResult<Vec<GroupMember>> {
    let mut visited: HashSet<String> = HashSet::new();
    let mut frontier: Vec<String> = Vec::new();
    for id in group_ids {
        if visited.insert(id.clone()) {
            frontier.push(id.clone());
        }
    }

    let mut users: Vec<GroupMember> = Vec::new();
    let mut seen_users: HashSet<String> = HashSet::new();

    while !frontier.is_empty() {
        let members = directory.direct_members(&frontier).await?;
        frontier = Vec::new();

        for member in members {
            match member.kind {
                MemberKind::Group => {
                    if visited.insert(member.id.clone()) {
                        frontier.push(member.id);
                    }
                }
                MemberKind::User => {
                    if seen_users.insert(member.id.clone()) {
                        users.push(member);
                    }
                }
            }
        }
    }

    debug!(
        groups = visited.len(),
        users = users.len(),
        "Expanded directory groups"
    );
    Ok(users)
}

//! Graph-backed group membership provider.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::warn;

use commhub_core::result::AppResult;
use commhub_core::traits::directory::GroupDirectory;
use commhub_core::types::member::{GroupMember, MemberKind};

use crate::batch::{BatchRequestPayload, member_requests, paging_requests};
use crate::client::GraphClient;

/// The `@odata.type` value marking a nested group member.
const GROUP_ODATA_TYPE: &str = "#microsoft.graph.group";

/// [`GroupDirectory`] implementation over the Graph `$batch` endpoint.
///
/// Each `direct_members` call issues one batch per page level: the initial
/// member listings, then follow-up batches for any `@odata.nextLink`
/// continuations until every page has been read.
#[derive(Debug, Clone)]
pub struct GraphGroupDirectory {
    client: Arc<GraphClient>,
}

impl GraphGroupDirectory {
    /// Create a new provider over the given client.
    pub fn new(client: Arc<GraphClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl GroupDirectory for GraphGroupDirectory {
    async fn direct_members(&self, group_ids: &[String]) -> AppResult<Vec<GroupMember>> {
        if group_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut members = Vec::new();
        let mut payload = BatchRequestPayload {
            requests: member_requests(group_ids, self.client.member_page_size()),
        };

        loop {
            let response = self.client.execute_batch(&payload).await?;
            let mut next_links = Vec::new();

            for item in &response.responses {
                if !(200..300).contains(&item.status) {
                    return Err(commhub_core::AppError::external_service(format!(
                        "Member listing {} returned status {}",
                        item.id, item.status
                    )));
                }

                members.extend(parse_members(&item.body));

                if let Some(link) = item.body.get("@odata.nextLink").and_then(Value::as_str) {
                    next_links.push(link.to_string());
                }
            }

            if next_links.is_empty() {
                break;
            }
            payload = BatchRequestPayload {
                requests: paging_requests(&next_links, self.client.endpoint()),
            };
        }

        Ok(members)
    }
}

/// Parse the `value` array of a member-listing body into typed members.
/// Entries without an id are skipped.
pub fn parse_members(body: &Value) -> Vec<GroupMember> {
    let Some(values) = body.get("value").and_then(Value::as_array) else {
        return Vec::new();
    };

    values
        .iter()
        .filter_map(|entry| {
            let Some(id) = entry.get("id").and_then(Value::as_str) else {
                warn!("Skipping directory member without an id");
                return None;
            };
            let kind = match entry.get("@odata.type").and_then(Value::as_str) {
                Some(GROUP_ODATA_TYPE) => MemberKind::Group,
                _ => MemberKind::User,
            };
            Some(GroupMember {
                id: id.to_string(),
                display_name: entry
                    .get("displayName")
                    .and_then(Value::as_str)
                    .map(str::to_string),
                kind,
            })
        })
        .collect()
}

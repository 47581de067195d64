//! Typed Graph `$batch` request and response payloads.
//!
//! Every outbound request item carries the required `id`, `method`, and
//! `url` fields explicitly rather than as an open-ended map.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Fields selected for group member listings.
const MEMBER_SELECT: &str = "id,userPrincipalName,department,displayName,givenName,jobTitle,surname";

/// One request inside a `$batch` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchRequestItem {
    /// Correlation id echoed back in the matching response.
    pub id: String,
    /// HTTP method.
    pub method: String,
    /// Request URL relative to the Graph API base.
    pub url: String,
}

impl BatchRequestItem {
    /// A GET request item.
    pub fn get(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            method: "GET".to_string(),
            url: url.into(),
        }
    }
}

/// The body of a `$batch` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchRequestPayload {
    /// The individual requests.
    pub requests: Vec<BatchRequestItem>,
}

/// One response inside a `$batch` result.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchResponseItem {
    /// Correlation id of the originating request.
    pub id: String,
    /// HTTP status of the individual request.
    pub status: u16,
    /// Response body.
    #[serde(default)]
    pub body: Value,
}

/// The body of a `$batch` result.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchResponsePayload {
    /// The individual responses.
    pub responses: Vec<BatchResponseItem>,
}

/// Member-listing requests, one per group id.
pub fn member_requests(group_ids: &[String], page_size: usize) -> Vec<BatchRequestItem> {
    group_ids
        .iter()
        .map(|id| {
            BatchRequestItem::get(
                id.clone(),
                format!("/groups/{id}/members?$top={page_size}&$select={MEMBER_SELECT}"),
            )
        })
        .collect()
}

/// Follow-up requests for `@odata.nextLink` continuation URLs. The links
/// come back absolute; `$batch` items must be relative to the API base.
pub fn paging_requests(next_links: &[String], endpoint: &str) -> Vec<BatchRequestItem> {
    next_links
        .iter()
        .enumerate()
        .map(|(index, link)| {
            let relative = link.strip_prefix(endpoint).unwrap_or(link);
            BatchRequestItem::get((index + 1).to_string(), relative)
        })
        .collect()
}

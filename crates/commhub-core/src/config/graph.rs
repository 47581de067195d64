//! Microsoft Graph directory configuration.

use serde::{Deserialize, Serialize};

/// Settings for the Graph group-membership provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphConfig {
    /// Azure AD tenant identifier.
    pub tenant_id: String,
    /// Application (client) identifier.
    pub client_id: String,
    /// Application client secret.
    pub client_secret: String,
    /// Token endpoint template; `{}` is replaced with the tenant id.
    #[serde(default = "default_authority")]
    pub authority: String,
    /// Graph API base URL.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// OAuth scope requested for client-credentials tokens.
    #[serde(default = "default_scope")]
    pub scope: String,
    /// Page size for group member listings.
    #[serde(default = "default_member_page_size")]
    pub member_page_size: usize,
}

fn default_authority() -> String {
    "https://login.microsoftonline.com/{}/oauth2/v2.0/token".to_string()
}

fn default_endpoint() -> String {
    "https://graph.microsoft.com/v1.0".to_string()
}

fn default_scope() -> String {
    "https://graph.microsoft.com/.default".to_string()
}

fn default_member_page_size() -> usize {
    85
}

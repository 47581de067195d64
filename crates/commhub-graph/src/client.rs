//! Graph HTTP client with client-credentials token acquisition.

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::debug;

use commhub_core::config::graph::GraphConfig;
use commhub_core::error::{AppError, ErrorKind};
use commhub_core::result::AppResult;

use crate::batch::{BatchRequestPayload, BatchResponsePayload};

/// Seconds before actual expiry at which a cached token is refreshed.
const EXPIRY_SKEW_SECONDS: i64 = 60;

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

/// Authenticated Graph API client.
#[derive(Debug)]
pub struct GraphClient {
    http: reqwest::Client,
    config: GraphConfig,
    token: Mutex<Option<CachedToken>>,
}

impl GraphClient {
    /// Create a new client from configuration.
    pub fn new(config: GraphConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
            token: Mutex::new(None),
        }
    }

    /// Execute a `$batch` call against the Graph API.
    pub async fn execute_batch(
        &self,
        payload: &BatchRequestPayload,
    ) -> AppResult<BatchResponsePayload> {
        let token = self.access_token().await?;
        let url = format!("{}/$batch", self.config.endpoint);

        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .json(payload)
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::ExternalService, "Graph batch call failed", e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::external_service(format!(
                "Graph batch call returned {status}: {body}"
            )));
        }

        response.json::<BatchResponsePayload>().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::ExternalService,
                "Failed to decode Graph batch response",
                e,
            )
        })
    }

    /// Return a valid access token, refreshing via the client-credentials
    /// grant when the cached one is absent or near expiry.
    async fn access_token(&self) -> AppResult<String> {
        let mut cached = self.token.lock().await;

        if let Some(token) = cached.as_ref() {
            if token.expires_at > Utc::now() + Duration::seconds(EXPIRY_SKEW_SECONDS) {
                return Ok(token.access_token.clone());
            }
        }

        let token_url = self.config.authority.replace("{}", &self.config.tenant_id);
        let params = [
            ("grant_type", "client_credentials"),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("scope", self.config.scope.as_str()),
        ];

        let response = self
            .http
            .post(&token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::ExternalService, "Token request failed", e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::external_service(format!(
                "Token request returned {status}: {body}"
            )));
        }

        let token: TokenResponse = response.json().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::ExternalService,
                "Failed to decode token response",
                e,
            )
        })?;

        debug!(expires_in = token.expires_in, "Acquired Graph access token");

        let entry = CachedToken {
            access_token: token.access_token.clone(),
            expires_at: Utc::now() + Duration::seconds(token.expires_in),
        };
        *cached = Some(entry);

        Ok(token.access_token)
    }

    /// The configured Graph API base URL.
    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    /// The configured member page size.
    pub fn member_page_size(&self) -> usize {
        self.config.member_page_size
    }
}

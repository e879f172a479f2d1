//! reqwest-based implementation of the item REST surface.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use livefeed_core::config::http::HttpConfig;
use livefeed_core::error::SyncError;
use livefeed_core::result::SyncResult;
use livefeed_core::traits::transport::ListTransport;
use livefeed_core::types::scope::Scope;
use livefeed_entity::Item;

/// Response body of the bulk mark-all-read endpoint.
#[derive(Debug, Deserialize)]
struct MarkAllReadResponse {
    #[serde(rename = "updatedCount", default)]
    updated_count: u64,
}

/// HTTP transport against the portal item API.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    auth_token: Option<String>,
}

impl HttpTransport {
    /// Build a transport from configuration.
    pub fn new(config: &HttpConfig) -> SyncResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| {
                SyncError::with_source(
                    livefeed_core::error::ErrorKind::Configuration,
                    "Failed to build HTTP client",
                    e,
                )
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            auth_token: config.auth_token.clone(),
        })
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let mut builder = self.client.request(method, format!("{}{path}", self.base_url));
        if let Some(token) = &self.auth_token {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    /// Send a request, mapping connect/timeout failures to `Transport`
    /// and non-2xx answers to `Server`.
    async fn send(&self, builder: reqwest::RequestBuilder) -> SyncResult<reqwest::Response> {
        let response = builder.send().await.map_err(|e| {
            SyncError::with_source(
                livefeed_core::error::ErrorKind::Transport,
                format!("Request failed: {e}"),
                e,
            )
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SyncError::server(format!(
                "Server answered {status}: {body}"
            )));
        }
        Ok(response)
    }

    /// Decode a JSON body, mapping schema mismatches to
    /// `MalformedResponse` so contract drift is distinguishable from
    /// plain server failures.
    async fn decode<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> SyncResult<T> {
        let body = response.text().await.map_err(|e| {
            SyncError::with_source(
                livefeed_core::error::ErrorKind::Transport,
                format!("Failed to read response body: {e}"),
                e,
            )
        })?;
        serde_json::from_str(&body).map_err(|e| {
            SyncError::with_source(
                livefeed_core::error::ErrorKind::MalformedResponse,
                format!("Response body did not match the item schema: {e}"),
                e,
            )
        })
    }
}

#[async_trait]
impl ListTransport<Item> for HttpTransport {
    async fn fetch_items(&self, scope: &Scope) -> SyncResult<Vec<Item>> {
        let response = self
            .send(
                self.request(reqwest::Method::GET, "/api/items")
                    .query(&scope.query_pairs()),
            )
            .await?;
        let items: Vec<Item> = Self::decode(response).await?;
        debug!(count = items.len(), scope = %scope.cache_key(), "Fetched item list");
        Ok(items)
    }

    async fn fetch_unread_count(&self, scope: &Scope) -> SyncResult<u64> {
        let response = self
            .send(
                self.request(reqwest::Method::GET, "/api/items/unread-count")
                    .query(&scope.query_pairs()),
            )
            .await?;
        Self::decode(response).await
    }

    async fn mark_read(&self, _scope: &Scope, item_id: &str) -> SyncResult<()> {
        self.send(self.request(
            reqwest::Method::POST,
            &format!("/api/items/{item_id}/mark-read"),
        ))
        .await?;
        Ok(())
    }

    async fn mark_all_read(&self, scope: &Scope) -> SyncResult<u64> {
        let body = serde_json::json!({
            "role": scope.role.as_str(),
            "company": scope.company,
            "service": scope.service,
            "personnel": scope.personnel,
        });
        let response = self
            .send(
                self.request(reqwest::Method::PUT, "/api/items/mark-all-read")
                    .json(&body),
            )
            .await?;
        let parsed: MarkAllReadResponse = Self::decode(response).await.unwrap_or(
            // Older backends answer with a bare confirmation string.
            MarkAllReadResponse { updated_count: 0 },
        );
        Ok(parsed.updated_count)
    }
}

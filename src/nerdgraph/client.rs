//! NerdGraph client with cursor pagination.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::config::{self, ExportConfig};
use crate::error::{ApiError, Error};
use crate::nerdgraph::page::{Page, extract_page};
use crate::nerdgraph::queries::{self, PagedQuery};
use crate::nerdgraph::types::{Destination, NotificationChannel, Policy, Workflow};

/// GraphQL response envelope.
#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    data: Option<Value>,
    errors: Option<Vec<Value>>,
}

/// Client for the NerdGraph endpoint, scoped to one account.
pub struct NerdGraphClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: SecretString,
    account_id: i64,
    page_delay: Duration,
}

impl NerdGraphClient {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: SecretString,
        account_id: i64,
    ) -> Result<Self, ApiError> {
        let endpoint = endpoint.into();
        let client = reqwest::Client::builder()
            .timeout(config::GRAPHQL_TIMEOUT)
            .build()
            .map_err(|e| ApiError::Request {
                endpoint: endpoint.clone(),
                reason: format!("Failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            endpoint,
            api_key,
            account_id,
            page_delay: config::PAGE_DELAY,
        })
    }

    pub fn from_config(config: &ExportConfig) -> Result<Self, Error> {
        let account_id = config.require_account_id()?;
        Ok(Self::new(
            config.graphql_url.clone(),
            config.api_key.clone(),
            account_id,
        )?)
    }

    /// Override the pause between page requests.
    pub fn with_page_delay(mut self, delay: Duration) -> Self {
        self.page_delay = delay;
        self
    }

    /// POST one query and return its `data` object.
    async fn execute(&self, query: &PagedQuery, cursor: Option<&str>) -> Result<Value, ApiError> {
        let body = json!({
            "query": query.document,
            "variables": {
                "accountId": self.account_id,
                "cursor": cursor,
            },
        });

        let resp = self
            .client
            .post(&self.endpoint)
            .header("API-Key", self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| ApiError::Request {
                endpoint: query.name.to_string(),
                reason: e.to_string(),
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                endpoint: query.name.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let envelope: GraphQlResponse = resp.json().await.map_err(|e| ApiError::Decode {
            endpoint: query.name.to_string(),
            reason: e.to_string(),
        })?;

        if let Some(errors) = envelope.errors.filter(|e| !e.is_empty()) {
            return Err(ApiError::GraphQl(Value::Array(errors).to_string()));
        }

        envelope.data.ok_or_else(|| ApiError::UnexpectedShape {
            path: "data".to_string(),
            reason: "field is missing".to_string(),
        })
    }

    /// Run `query` from a null cursor until `nextCursor` comes back empty,
    /// collecting every page's batch in order.
    pub async fn fetch_all<T: DeserializeOwned>(&self, query: &PagedQuery) -> Result<Vec<T>, ApiError> {
        let mut items = Vec::new();
        let mut cursor: Option<String> = None;
        let mut pages = 0usize;
        let mut reported_total = None;

        loop {
            let data = self.execute(query, cursor.as_deref()).await?;
            let page: Page<T> = extract_page(&data, query)?;
            pages += 1;

            if let Some(error) = &page.error {
                tracing::warn!(query = query.name, %error, "Container reported an error");
            }
            tracing::debug!(
                query = query.name,
                page = pages,
                batch = page.items.len(),
                has_next = page.next_cursor.is_some(),
                "Fetched page"
            );

            reported_total = page.total_count.or(reported_total);
            items.extend(page.items);

            match page.next_cursor {
                Some(next) => cursor = Some(next),
                None => break,
            }

            tokio::time::sleep(self.page_delay).await;
        }

        if let Some(total) = reported_total {
            if total != items.len() as u64 {
                tracing::warn!(
                    query = query.name,
                    total_count = total,
                    collected = items.len(),
                    "Collected item count differs from totalCount"
                );
            }
        }

        tracing::info!(query = query.name, pages, total = items.len(), "Pagination complete");
        Ok(items)
    }

    pub async fn list_policies(&self) -> Result<Vec<Policy>, ApiError> {
        self.fetch_all(&queries::POLICIES).await
    }

    pub async fn list_workflows(&self) -> Result<Vec<Workflow>, ApiError> {
        self.fetch_all(&queries::WORKFLOWS).await
    }

    pub async fn list_email_channels(&self) -> Result<Vec<NotificationChannel>, ApiError> {
        self.fetch_all(&queries::EMAIL_CHANNELS).await
    }

    pub async fn list_email_destinations(&self) -> Result<Vec<Destination>, ApiError> {
        self.fetch_all(&queries::EMAIL_DESTINATIONS).await
    }
}

//! REST v2 client with page-number pagination.

use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::ExportConfig;
use crate::error::ApiError;
use crate::ids::PolicyId;
use crate::rest::types::{AlertChannel, AlertCondition, AlertPolicy, ConditionKind};

pub const POLICIES_ENDPOINT: &str = "alerts_policies.json";
pub const CHANNELS_ENDPOINT: &str = "alerts_channels.json";

/// Client for the legacy `api.newrelic.com/v2` alerting endpoints.
pub struct RestClient {
    client: reqwest::Client,
    base_url: String,
    api_key: SecretString,
}

impl RestClient {
    pub fn new(base_url: impl Into<String>, api_key: SecretString) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }

    pub fn from_config(config: &ExportConfig) -> Self {
        Self::new(config.rest_base_url.clone(), config.api_key.clone())
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{endpoint}", self.base_url)
    }

    /// GET an endpoint and return its JSON body. Any non-2xx status is an error.
    async fn get_json(&self, endpoint: &str, query: &[(&str, String)]) -> Result<Value, ApiError> {
        let resp = self
            .client
            .get(self.url(endpoint))
            .header("Api-Key", self.api_key.expose_secret())
            .query(query)
            .send()
            .await
            .map_err(|e| ApiError::Request {
                endpoint: endpoint.to_string(),
                reason: e.to_string(),
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        resp.json().await.map_err(|e| ApiError::Decode {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        })
    }

    /// Follow `page=1,2,...` until the page's `list_key` is absent or empty,
    /// returning every item in page order.
    pub async fn fetch_all_pages<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        list_key: &str,
    ) -> Result<Vec<T>, ApiError> {
        let mut items = Vec::new();
        let mut page: u32 = 1;

        loop {
            let body = self.get_json(endpoint, &[("page", page.to_string())]).await?;
            let batch = match list_field(&body, list_key) {
                Some(batch) if !batch.is_empty() => batch,
                _ => break,
            };

            tracing::debug!(endpoint, page, batch = batch.len(), "Fetched page");
            items.extend(decode_items::<T>(endpoint, batch)?);
            page += 1;
        }

        tracing::info!(endpoint, pages = page - 1, total = items.len(), "Pagination complete");
        Ok(items)
    }

    pub async fn list_policies(&self) -> Result<Vec<AlertPolicy>, ApiError> {
        self.fetch_all_pages(POLICIES_ENDPOINT, "policies").await
    }

    pub async fn list_channels(&self) -> Result<Vec<AlertChannel>, ApiError> {
        self.fetch_all_pages(CHANNELS_ENDPOINT, "channels").await
    }

    /// Fetch the conditions of one family attached to `policy`.
    ///
    /// A single request filtered by `policy_id`; a body without the
    /// response key yields no conditions.
    pub async fn list_conditions(
        &self,
        kind: ConditionKind,
        policy: &PolicyId,
    ) -> Result<Vec<AlertCondition>, ApiError> {
        let endpoint = kind.endpoint();
        let body = self
            .get_json(endpoint, &[("policy_id", policy.to_string())])
            .await?;

        let conditions = match list_field(&body, kind.response_key()) {
            Some(batch) => decode_items(endpoint, batch)?,
            None => Vec::new(),
        };

        if let Some((unread_key, unread)) = unread_conditions(kind, &body) {
            tracing::warn!(
                endpoint,
                policy_id = %policy,
                read_key = kind.response_key(),
                unread_key,
                unread,
                "Conditions present under a key this export does not read"
            );
        }

        tracing::debug!(endpoint, policy_id = %policy, count = conditions.len(), "Fetched conditions");
        Ok(conditions)
    }
}

/// The array stored under `key`, if the body has one.
fn list_field<'a>(body: &'a Value, key: &str) -> Option<&'a Vec<Value>> {
    body.get(key).and_then(Value::as_array)
}

/// Entries under the family's endpoint-specific key, which are never decoded.
/// `None` when the family has no such key or the list there is empty.
fn unread_conditions(kind: ConditionKind, body: &Value) -> Option<(&'static str, usize)> {
    let key = kind.documented_key()?;
    let unread = list_field(body, key).map_or(0, Vec::len);
    (unread > 0).then_some((key, unread))
}

fn decode_items<T: DeserializeOwned>(endpoint: &str, batch: &[Value]) -> Result<Vec<T>, ApiError> {
    batch
        .iter()
        .map(|item| {
            T::deserialize(item).map_err(|e| ApiError::Decode {
                endpoint: endpoint.to_string(),
                reason: e.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn list_field_requires_an_array() {
        let body = json!({"policies": [1, 2], "other": "x"});
        assert_eq!(list_field(&body, "policies").map(Vec::len), Some(2));
        assert!(list_field(&body, "other").is_none());
        assert!(list_field(&body, "missing").is_none());
    }

    #[test]
    fn decode_items_reports_endpoint() {
        let batch = vec![json!({"name": "no id"})];
        let err = decode_items::<AlertPolicy>("alerts_policies.json", &batch).unwrap_err();
        assert!(matches!(err, ApiError::Decode { ref endpoint, .. } if endpoint == "alerts_policies.json"));
    }

    #[test]
    fn unread_conditions_counts_endpoint_specific_key() {
        let body = json!({
            "nrql_conditions": [],
            "external_service_conditions": [{"name": "a"}, {"name": "b"}]
        });
        assert_eq!(
            unread_conditions(ConditionKind::ExternalService, &body),
            Some(("external_service_conditions", 2))
        );
        assert_eq!(unread_conditions(ConditionKind::Synthetic, &body), None);
        assert_eq!(unread_conditions(ConditionKind::Metric, &body), None);

        let synthetics = json!({"synthetics_conditions": [{"name": "s"}]});
        assert_eq!(
            unread_conditions(ConditionKind::Synthetic, &synthetics),
            Some(("synthetics_conditions", 1))
        );
        assert_eq!(
            unread_conditions(ConditionKind::Synthetic, &json!({"synthetics_conditions": []})),
            None
        );
    }

    #[test]
    fn channels_with_null_links_decode() {
        let batch = vec![
            json!({"id": 1, "name": "hook", "type": "webhook", "links": null}),
            json!({"id": 2, "name": "ops@x.com", "type": "email", "links": {"policy_ids": [1]}}),
        ];
        let channels = decode_items::<AlertChannel>("alerts_channels.json", &batch).unwrap();
        assert_eq!(channels.len(), 2);
        assert!(channels[1].links_policy(&PolicyId::from(1)));
    }

    #[test]
    fn url_joins_without_double_slash() {
        let client = RestClient::new("http://localhost:1/v2/", SecretString::from("k"));
        assert_eq!(client.url("alerts_channels.json"), "http://localhost:1/v2/alerts_channels.json");
    }
}

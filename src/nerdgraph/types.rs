//! NerdGraph entities used by the email destination export.

use serde::Deserialize;
use serde_json::Value;

use crate::ids::PolicyId;

/// Predicate attribute whose values list the policies a workflow targets.
pub const POLICY_IDS_ATTRIBUTE: &str = "labels.policyIds";

#[derive(Debug, Clone, Deserialize)]
pub struct Policy {
    pub id: PolicyId,
    pub name: Option<String>,
}

impl Policy {
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workflow {
    pub issues_filter: Option<IssuesFilter>,
    pub destination_configurations: Option<Vec<DestinationConfiguration>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IssuesFilter {
    pub predicates: Option<Vec<Predicate>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Predicate {
    pub attribute: Option<String>,
    pub values: Option<Vec<Value>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DestinationConfiguration {
    pub channel_id: Option<String>,
}

impl Workflow {
    /// Policies selected by the `labels.policyIds` predicate.
    pub fn policy_ids(&self) -> Vec<PolicyId> {
        self.issues_filter
            .iter()
            .flat_map(|f| f.predicates.iter().flatten())
            .filter(|p| p.attribute.as_deref().map(str::trim) == Some(POLICY_IDS_ATTRIBUTE))
            .flat_map(|p| p.values.iter().flatten())
            .filter_map(PolicyId::from_json)
            .collect()
    }

    /// Non-empty channel ids this workflow routes to.
    pub fn channel_ids(&self) -> Vec<&str> {
        self.destination_configurations
            .iter()
            .flatten()
            .filter_map(|dc| dc.channel_id.as_deref())
            .filter(|id| !id.is_empty())
            .collect()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationChannel {
    pub id: Option<String>,
    pub destination_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Destination {
    pub id: Option<String>,
    pub properties: Option<Vec<Property>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Property {
    pub key: Option<String>,
    pub value: Option<String>,
}

impl Destination {
    /// Trimmed, non-empty values of every property keyed `email` (any case).
    pub fn emails(&self) -> Vec<String> {
        self.properties
            .iter()
            .flatten()
            .filter(|p| p.key.as_deref().is_some_and(|k| k.eq_ignore_ascii_case("email")))
            .filter_map(|p| p.value.as_deref().map(str::trim))
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn workflow(value: Value) -> Workflow {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn policy_ids_coerce_numbers_and_strings() {
        let wf = workflow(json!({
            "issuesFilter": {"predicates": [
                {"attribute": "labels.policyIds", "operator": "EXACTLY_MATCHES", "values": [123, " 456 "]},
                {"attribute": "priority", "values": ["CRITICAL"]}
            ]}
        }));
        assert_eq!(wf.policy_ids(), vec![PolicyId::from(123), PolicyId::from(456)]);
    }

    #[test]
    fn attribute_match_is_trimmed_but_exact() {
        let wf = workflow(json!({
            "issuesFilter": {"predicates": [
                {"attribute": " labels.policyIds ", "values": ["1"]},
                {"attribute": "labels.policyids", "values": ["2"]}
            ]}
        }));
        assert_eq!(wf.policy_ids(), vec![PolicyId::from(1)]);
    }

    #[test]
    fn workflow_without_filter_targets_nothing() {
        let wf = workflow(json!({"issuesFilter": null, "destinationConfigurations": null}));
        assert!(wf.policy_ids().is_empty());
        assert!(wf.channel_ids().is_empty());
    }

    #[test]
    fn channel_ids_skip_blank_entries() {
        let wf = workflow(json!({"destinationConfigurations": [
            {"channelId": "c1"}, {"channelId": ""}, {"channelId": null}, {"channelId": "c2"}
        ]}));
        assert_eq!(wf.channel_ids(), vec!["c1", "c2"]);
    }

    #[test]
    fn null_policy_name_reads_as_empty() {
        let policy: Policy = serde_json::from_value(json!({"id": "7", "name": null})).unwrap();
        assert_eq!(policy.id, PolicyId::from(7));
        assert_eq!(policy.name(), "");
    }

    #[test]
    fn destination_emails_match_key_case_insensitively() {
        let dest: Destination = serde_json::from_value(json!({
            "id": "d1",
            "properties": [
                {"key": "EMAIL", "value": " a@x.com "},
                {"key": "email", "value": ""},
                {"key": "name", "value": "b@x.com"},
                {"key": "Email", "value": "c@x.com"},
                {"key": null, "value": "d@x.com"}
            ]
        }))
        .unwrap();
        assert_eq!(dest.emails(), vec!["a@x.com", "c@x.com"]);
    }
}

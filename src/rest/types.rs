//! REST v2 alerting data model.

use serde::Deserialize;
use serde_json::Value;

use crate::ids::PolicyId;

/// An alert policy from `alerts_policies.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct AlertPolicy {
    pub id: PolicyId,
    pub name: Option<String>,
}

impl AlertPolicy {
    /// Policy name, empty when missing or null.
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }
}

/// One of the four condition families, each served by its own endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionKind {
    Metric,
    Nrql,
    ExternalService,
    Synthetic,
}

impl ConditionKind {
    /// Emission order within a policy's row group.
    pub const ALL: [ConditionKind; 4] = [
        ConditionKind::Metric,
        ConditionKind::Nrql,
        ConditionKind::ExternalService,
        ConditionKind::Synthetic,
    ];

    pub fn endpoint(self) -> &'static str {
        match self {
            ConditionKind::Metric => "alerts_conditions.json",
            ConditionKind::Nrql => "alerts_nrql_conditions.json",
            ConditionKind::ExternalService => "alerts_external_service_conditions.json",
            ConditionKind::Synthetic => "alerts_synthetics_conditions.json",
        }
    }

    /// Key holding the condition list in the response body.
    ///
    /// External-service and synthetics responses are read from
    /// `nrql_conditions` as well; see [`ConditionKind::documented_key`].
    pub fn response_key(self) -> &'static str {
        match self {
            ConditionKind::Metric => "conditions",
            ConditionKind::Nrql
            | ConditionKind::ExternalService
            | ConditionKind::Synthetic => "nrql_conditions",
        }
    }

    /// The endpoint-specific key, where it differs from [`ConditionKind::response_key`].
    pub fn documented_key(self) -> Option<&'static str> {
        match self {
            ConditionKind::ExternalService => Some("external_service_conditions"),
            ConditionKind::Synthetic => Some("synthetics_conditions"),
            ConditionKind::Metric | ConditionKind::Nrql => None,
        }
    }

    /// Text written to the "Condition Type" column.
    pub fn label(self) -> &'static str {
        match self {
            ConditionKind::Metric => "Condition",
            ConditionKind::Nrql => "NRQL",
            ConditionKind::ExternalService => "External Service",
            ConditionKind::Synthetic => "Synthetic",
        }
    }
}

/// A condition of any family. Every field is optional; absent values
/// serialize as empty cells.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AlertCondition {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub condition_type: Option<String>,
    pub enabled: Option<Value>,
    pub terms: Option<Vec<ConditionTerm>>,
    pub entities: Option<Vec<Value>>,
    pub nrql: Option<NrqlClause>,
}

impl AlertCondition {
    /// The first term, which carries the threshold and duration columns.
    pub fn first_term(&self) -> Option<&ConditionTerm> {
        self.terms.as_ref().and_then(|t| t.first())
    }

    pub fn nrql_query(&self) -> Option<&str> {
        self.nrql.as_ref().and_then(|n| n.query.as_deref())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConditionTerm {
    pub threshold: Option<Value>,
    pub duration: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NrqlClause {
    pub query: Option<String>,
}

/// A notification channel from `alerts_channels.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct AlertChannel {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub channel_type: Option<String>,
    pub links: Option<ChannelLinks>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChannelLinks {
    pub policy_ids: Option<Vec<Value>>,
}

impl AlertChannel {
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    pub fn is_email(&self) -> bool {
        self.channel_type.as_deref() == Some("email")
    }

    /// Whether this channel is linked to `policy`, comparing normalized ids.
    /// Null or missing links match nothing.
    pub fn links_policy(&self, policy: &PolicyId) -> bool {
        self.links
            .iter()
            .flat_map(|l| l.policy_ids.iter().flatten())
            .filter_map(PolicyId::from_json)
            .any(|id| &id == policy)
    }
}

//! Alert conditions report (REST API).
//!
//! One row per (condition, linked email channel) pair, policies in API order,
//! condition families in [`ConditionKind::ALL`] order.

use std::path::Path;

use serde::Serialize;

use crate::error::Result;
use crate::export::{render_value, write_report};
use crate::join::email_channel_names;
use crate::rest::{AlertCondition, AlertPolicy, ConditionKind, RestClient};

pub const CONDITIONS_HEADER: [&str; 9] = [
    "Policy Name",
    "Condition Name",
    "Email",
    "Type",
    "Condition Type",
    "Enabled",
    "Threshold",
    "Duration",
    "Entities",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConditionRow {
    pub policy_name: String,
    pub condition_name: String,
    pub email: String,
    pub condition_type: String,
    pub kind: String,
    pub enabled: String,
    pub threshold: String,
    pub duration: String,
    /// Metric conditions list their entities; the other families their NRQL query.
    pub entities: String,
}

impl ConditionRow {
    fn new(policy: &AlertPolicy, kind: ConditionKind, cond: &AlertCondition, email: &str) -> Self {
        let term = cond.first_term();
        let entities = match kind {
            ConditionKind::Metric => cond
                .entities
                .iter()
                .flatten()
                .map(|e| render_value(Some(e)))
                .collect::<Vec<_>>()
                .join(", "),
            _ => cond.nrql_query().unwrap_or_default().to_string(),
        };

        Self {
            policy_name: policy.name().to_string(),
            condition_name: cond.name.clone().unwrap_or_default(),
            email: email.to_string(),
            condition_type: cond.condition_type.clone().unwrap_or_default(),
            kind: kind.label().to_string(),
            enabled: render_value(cond.enabled.as_ref()),
            threshold: render_value(term.and_then(|t| t.threshold.as_ref())),
            duration: render_value(term.and_then(|t| t.duration.as_ref())),
            entities,
        }
    }
}

/// Cross product of `conditions` with `emails`, conditions outermost.
pub fn condition_rows(
    policy: &AlertPolicy,
    kind: ConditionKind,
    conditions: &[AlertCondition],
    emails: &[String],
) -> Vec<ConditionRow> {
    conditions
        .iter()
        .flat_map(move |cond| {
            emails
                .iter()
                .map(move |email| ConditionRow::new(policy, kind, cond, email))
        })
        .collect()
}

/// Fetch policies, channels and every policy's conditions, then write the
/// report to `path`. Returns the number of data rows written.
///
/// Nothing is written unless every request succeeds.
pub async fn export_conditions(client: &RestClient, path: &Path) -> Result<usize> {
    let policies = client.list_policies().await?;
    let channels = client.list_channels().await?;
    tracing::info!(
        policies = policies.len(),
        channels = channels.len(),
        "Fetched policies and channels"
    );

    let mut rows = Vec::new();
    for policy in &policies {
        let emails = email_channel_names(&policy.id, &channels);
        for kind in ConditionKind::ALL {
            let conditions = client.list_conditions(kind, &policy.id).await?;
            rows.extend(condition_rows(policy, kind, &conditions, &emails));
        }
        tracing::debug!(policy_id = %policy.id, policy = policy.name(), "Policy flattened");
    }

    write_report(path, &CONDITIONS_HEADER, &rows).await?;
    Ok(rows.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn policy() -> AlertPolicy {
        serde_json::from_value(json!({"id": 1, "name": "P1"})).unwrap()
    }

    fn condition(value: serde_json::Value) -> AlertCondition {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn metric_condition_row_matches_expected_columns() {
        let cond = condition(json!({
            "name": "C1",
            "type": "apm_app_metric",
            "enabled": true,
            "terms": [{"threshold": 5, "duration": "5"}]
        }));
        let rows = condition_rows(&policy(), ConditionKind::Metric, &[cond], &["ops@x.com".to_string()]);
        assert_eq!(rows.len(), 1);
        assert_eq!(
            rows[0],
            ConditionRow {
                policy_name: "P1".into(),
                condition_name: "C1".into(),
                email: "ops@x.com".into(),
                condition_type: "apm_app_metric".into(),
                kind: "Condition".into(),
                enabled: "true".into(),
                threshold: "5".into(),
                duration: "5".into(),
                entities: String::new(),
            }
        );
    }

    #[test]
    fn rows_are_a_cross_product() {
        let conds: Vec<AlertCondition> = (0..3)
            .map(|i| condition(json!({"name": format!("C{i}")})))
            .collect();
        let emails = vec!["a@x.com".to_string(), "b@x.com".to_string()];
        let rows = condition_rows(&policy(), ConditionKind::Nrql, &conds, &emails);

        assert_eq!(rows.len(), 6);
        let pairs: Vec<(&str, &str)> = rows
            .iter()
            .map(|r| (r.condition_name.as_str(), r.email.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("C0", "a@x.com"),
                ("C0", "b@x.com"),
                ("C1", "a@x.com"),
                ("C1", "b@x.com"),
                ("C2", "a@x.com"),
                ("C2", "b@x.com"),
            ]
        );
    }

    #[test]
    fn nrql_families_use_the_query_column() {
        let cond = condition(json!({
            "name": "Errors",
            "enabled": false,
            "terms": [{"threshold": "1.0", "duration": "10"}],
            "nrql": {"query": "SELECT count(*) FROM TransactionError"}
        }));
        for kind in [ConditionKind::Nrql, ConditionKind::ExternalService, ConditionKind::Synthetic] {
            let rows = condition_rows(&policy(), kind, std::slice::from_ref(&cond), &["N/A".to_string()]);
            assert_eq!(rows[0].kind, kind.label());
            assert_eq!(rows[0].entities, "SELECT count(*) FROM TransactionError");
            assert_eq!(rows[0].enabled, "false");
            assert_eq!(rows[0].threshold, "1.0");
            assert_eq!(rows[0].condition_type, "");
        }
    }

    #[test]
    fn metric_entities_are_comma_joined() {
        let cond = condition(json!({"name": "C", "entities": ["111", 222]}));
        let rows = condition_rows(&policy(), ConditionKind::Metric, &[cond], &["N/A".to_string()]);
        assert_eq!(rows[0].entities, "111, 222");
    }

    #[test]
    fn missing_terms_serialize_as_empty() {
        let cond = condition(json!({"name": "C", "terms": []}));
        let rows = condition_rows(&policy(), ConditionKind::Metric, &[cond], &["N/A".to_string()]);
        assert_eq!(rows[0].threshold, "");
        assert_eq!(rows[0].duration, "");
        assert_eq!(rows[0].enabled, "");
    }

    #[test]
    fn null_policy_name_still_produces_rows() {
        let policy: AlertPolicy = serde_json::from_value(json!({"id": 4, "name": null})).unwrap();
        let cond = condition(json!({"name": "C", "type": null}));
        let rows = condition_rows(&policy, ConditionKind::Metric, &[cond], &["N/A".to_string()]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].policy_name, "");
        assert_eq!(rows[0].condition_name, "C");
    }

    #[test]
    fn no_conditions_means_no_rows() {
        let rows = condition_rows(&policy(), ConditionKind::Metric, &[], &["a@x.com".to_string()]);
        assert!(rows.is_empty());
    }
}

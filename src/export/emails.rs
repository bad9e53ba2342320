//! Policy email destinations report (NerdGraph API).

use std::collections::HashMap;
use std::path::Path;

use serde::Serialize;

use crate::error::Result;
use crate::export::write_report;
use crate::ids::PolicyId;
use crate::join::EmailRouting;
use crate::nerdgraph::{NerdGraphClient, Policy};

pub const EMAIL_DESTINATIONS_HEADER: [&str; 2] = ["Alert Policy", "Email Destinations"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailDestinationRow {
    pub policy_name: String,
    /// Sorted, distinct addresses joined with `", "`; empty when unrouted.
    pub emails: String,
}

/// One row per distinct policy id, ordered by policy name ignoring case.
///
/// A repeated policy id keeps its first position and takes the later name.
/// Names that compare equal keep their fetch order.
pub fn email_destination_rows(policies: &[Policy], routing: &EmailRouting) -> Vec<EmailDestinationRow> {
    let mut index: HashMap<&PolicyId, usize> = HashMap::new();
    let mut unique: Vec<&Policy> = Vec::new();
    for policy in policies {
        match index.get(&policy.id) {
            Some(&i) => unique[i] = policy,
            None => {
                index.insert(&policy.id, unique.len());
                unique.push(policy);
            }
        }
    }

    let mut rows: Vec<EmailDestinationRow> = unique
        .into_iter()
        .map(|p| EmailDestinationRow {
            policy_name: p.name().to_string(),
            emails: routing
                .emails_for(&p.id)
                .into_iter()
                .collect::<Vec<_>>()
                .join(", "),
        })
        .collect();

    rows.sort_by_key(|r| r.policy_name.to_lowercase());
    rows
}

/// Fetch policies, workflows, email channels and email destinations, join
/// them, and write the report to `path`. Returns the number of data rows.
pub async fn export_email_destinations(client: &NerdGraphClient, path: &Path) -> Result<usize> {
    let policies = client.list_policies().await?;
    let workflows = client.list_workflows().await?;
    let channels = client.list_email_channels().await?;
    let destinations = client.list_email_destinations().await?;
    tracing::info!(
        policies = policies.len(),
        workflows = workflows.len(),
        channels = channels.len(),
        destinations = destinations.len(),
        "Fetched alerting entities"
    );

    let routing = EmailRouting::build(&workflows, &channels, &destinations);
    let rows = email_destination_rows(&policies, &routing);

    write_report(path, &EMAIL_DESTINATIONS_HEADER, &rows).await?;
    Ok(rows.len())
}

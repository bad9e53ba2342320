//! NerdGraph-era routing: policy → workflow → channel → destination → email.

use std::collections::{BTreeSet, HashMap};

use crate::ids::PolicyId;
use crate::nerdgraph::{Destination, NotificationChannel, Workflow};

/// Lookup tables for resolving a policy to the email addresses it notifies.
#[derive(Debug, Clone, Default)]
pub struct EmailRouting {
    policy_channels: HashMap<PolicyId, BTreeSet<String>>,
    channel_destination: HashMap<String, String>,
    destination_emails: HashMap<String, Vec<String>>,
}

impl EmailRouting {
    pub fn build(
        workflows: &[Workflow],
        channels: &[NotificationChannel],
        destinations: &[Destination],
    ) -> Self {
        let routing = Self {
            policy_channels: policy_channel_ids(workflows),
            channel_destination: channel_destinations(channels),
            destination_emails: destination_emails(destinations),
        };
        tracing::debug!(
            policies = routing.policy_channels.len(),
            channels = routing.channel_destination.len(),
            destinations = routing.destination_emails.len(),
            "Built email routing tables"
        );
        routing
    }

    /// Every distinct email reachable from `policy`, sorted. Empty when the
    /// policy is not targeted by any workflow or none of its channels resolve.
    pub fn emails_for(&self, policy: &PolicyId) -> BTreeSet<String> {
        let Some(channel_ids) = self.policy_channels.get(policy) else {
            return BTreeSet::new();
        };

        channel_ids
            .iter()
            .filter_map(|cid| self.channel_destination.get(cid))
            .filter_map(|did| self.destination_emails.get(did))
            .flatten()
            .cloned()
            .collect()
    }
}

/// Union of channel ids per targeted policy. Workflows without any channel
/// are skipped.
pub fn policy_channel_ids(workflows: &[Workflow]) -> HashMap<PolicyId, BTreeSet<String>> {
    let mut map: HashMap<PolicyId, BTreeSet<String>> = HashMap::new();

    for wf in workflows {
        let channel_ids = wf.channel_ids();
        if channel_ids.is_empty() {
            continue;
        }
        for policy in wf.policy_ids() {
            map.entry(policy)
                .or_default()
                .extend(channel_ids.iter().map(|c| c.to_string()));
        }
    }
    map
}

/// Channel id → destination id, for channels carrying both.
pub fn channel_destinations(channels: &[NotificationChannel]) -> HashMap<String, String> {
    channels
        .iter()
        .filter_map(|ch| match (ch.id.as_deref(), ch.destination_id.as_deref()) {
            (Some(cid), Some(did)) if !cid.is_empty() && !did.is_empty() => {
                Some((cid.to_string(), did.to_string()))
            }
            _ => None,
        })
        .collect()
}

/// Destination id → its email addresses, for destinations with at least one.
pub fn destination_emails(destinations: &[Destination]) -> HashMap<String, Vec<String>> {
    destinations
        .iter()
        .filter_map(|dest| {
            let id = dest.id.as_deref().filter(|id| !id.is_empty())?;
            let emails = dest.emails();
            (!emails.is_empty()).then(|| (id.to_string(), emails))
        })
        .collect()
}

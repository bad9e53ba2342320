//! REST-era routing: email channels linked directly to policies.

use crate::ids::PolicyId;
use crate::rest::AlertChannel;

/// Email column value for a policy with no linked email channel.
pub const NO_CHANNEL: &str = "N/A";

/// Names of the email channels linked to `policy`, in channel list order.
///
/// Never empty: a policy without any linked email channel gets a single
/// [`NO_CHANNEL`] entry so each of its conditions still produces a row.
pub fn email_channel_names(policy: &PolicyId, channels: &[AlertChannel]) -> Vec<String> {
    let mut names: Vec<String> = channels
        .iter()
        .filter(|c| c.is_email() && c.links_policy(policy))
        .map(|c| c.name().to_string())
        .collect();

    if names.is_empty() {
        names.push(NO_CHANNEL.to_string());
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn channel(name: &str, kind: &str, policy_ids: serde_json::Value) -> AlertChannel {
        serde_json::from_value(json!({
            "name": name,
            "type": kind,
            "links": {"policy_ids": policy_ids}
        }))
        .unwrap()
    }

    #[test]
    fn collects_linked_email_channels_in_order() {
        let channels = vec![
            channel("b@x.com", "email", json!([1])),
            channel("slack-ops", "slack", json!([1])),
            channel("a@x.com", "email", json!([2, 1])),
            channel("c@x.com", "email", json!([2])),
        ];
        assert_eq!(
            email_channel_names(&PolicyId::from(1), &channels),
            vec!["b@x.com", "a@x.com"]
        );
    }

    #[test]
    fn unlinked_policy_gets_placeholder() {
        let channels = vec![
            channel("a@x.com", "email", json!([])),
            channel("pager", "pagerduty", json!([5])),
        ];
        assert_eq!(email_channel_names(&PolicyId::from(5), &channels), vec![NO_CHANNEL]);
    }

    #[test]
    fn null_links_on_other_channels_are_skipped() {
        let channels: Vec<AlertChannel> = serde_json::from_value(json!([
            {"name": "hook", "type": "webhook", "links": null},
            {"name": "ops@x.com", "type": "email", "links": {"policy_ids": [1]}},
            {"name": "dead@x.com", "type": "email", "links": null}
        ]))
        .unwrap();
        assert_eq!(
            email_channel_names(&PolicyId::from(1), &channels),
            vec!["ops@x.com"]
        );
    }

    #[test]
    fn string_policy_ids_in_links_still_match() {
        let channels = vec![channel("ops@x.com", "email", json!(["77"]))];
        assert_eq!(
            email_channel_names(&PolicyId::from(77), &channels),
            vec!["ops@x.com"]
        );
    }
}

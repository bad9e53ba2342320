//! Legacy REST v2 alerting API.

pub mod client;
pub mod types;

pub use client::RestClient;
pub use types::{AlertChannel, AlertCondition, AlertPolicy, ConditionKind};

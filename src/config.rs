//! Run configuration, read once from the environment at startup.

use std::time::Duration;

use secrecy::SecretString;

use crate::error::ConfigError;

pub const API_KEY_VAR: &str = "NEW_RELIC_API_KEY";
pub const ACCOUNT_ID_VAR: &str = "NEW_RELIC_ACCOUNT_ID";
pub const REGION_VAR: &str = "NEW_RELIC_REGION";
pub const GRAPHQL_URL_VAR: &str = "NEW_RELIC_GRAPHQL_URL";
pub const REST_URL_VAR: &str = "NEW_RELIC_REST_URL";

/// Per-call timeout for NerdGraph requests.
pub const GRAPHQL_TIMEOUT: Duration = Duration::from_secs(60);

/// Delay between consecutive NerdGraph page requests.
pub const PAGE_DELAY: Duration = Duration::from_millis(100);

pub const CONDITIONS_CSV: &str = "newrelic_alert_conditions.csv";
pub const EMAIL_DESTINATIONS_CSV: &str = "policies_email_destinations.csv";

/// New Relic data center region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Region {
    #[default]
    Us,
    Eu,
}

impl Region {
    /// `"EU"` (any case, surrounding whitespace ignored) selects EU; anything else is US.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|r| r.trim().to_uppercase()) {
            Some(r) if r == "EU" => Region::Eu,
            _ => Region::Us,
        }
    }

    pub fn graphql_url(self) -> &'static str {
        match self {
            Region::Us => "https://api.newrelic.com/graphql",
            Region::Eu => "https://api.eu.newrelic.com/graphql",
        }
    }

    pub fn rest_base_url(self) -> &'static str {
        match self {
            Region::Us => "https://api.newrelic.com/v2",
            Region::Eu => "https://api.eu.newrelic.com/v2",
        }
    }
}

/// Everything an export run needs to talk to New Relic.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// User API key, sent as the `Api-Key` header.
    pub api_key: SecretString,
    /// Raw account id; only the NerdGraph export reads it, through
    /// [`ExportConfig::require_account_id`].
    pub account_id: Option<String>,
    pub region: Region,
    /// NerdGraph endpoint (region default unless overridden).
    pub graphql_url: String,
    /// REST v2 base URL (region default unless overridden).
    pub rest_base_url: String,
}

impl ExportConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_VAR)
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(API_KEY_VAR.to_string()))?;

        let account_id = lookup(ACCOUNT_ID_VAR)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let region = Region::parse(lookup(REGION_VAR).as_deref());

        let graphql_url = lookup(GRAPHQL_URL_VAR)
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| region.graphql_url().to_string());
        let rest_base_url = lookup(REST_URL_VAR)
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| region.rest_base_url().to_string());

        Ok(Self {
            api_key: SecretString::from(api_key),
            account_id,
            region,
            graphql_url,
            rest_base_url: rest_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// The numeric account id, or a configuration error naming the variable
    /// when it is unset or not a number.
    pub fn require_account_id(&self) -> Result<i64, ConfigError> {
        let raw = self
            .account_id
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnvVar(ACCOUNT_ID_VAR.to_string()))?;
        raw.parse::<i64>().map_err(|e| ConfigError::InvalidValue {
            key: ACCOUNT_ID_VAR.to_string(),
            message: format!("{raw:?} is not a numeric account id ({e})"),
        })
    }
}

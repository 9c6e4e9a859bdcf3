//! Server configuration read from the environment.

use std::time::Duration;

use jira_api::{Credentials, JiraConfig};
use thiserror::Error;

use crate::auth::AuthMode;

/// Default custom field holding Service Desk organizations.
fn default_organization_field() -> String {
    "customfield_10002".to_string()
}

/// Default cap on issues returned by one search.
fn default_max_results() -> u32 {
    10_000
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_cooldown_ms() -> u64 {
    0
}

fn default_listen_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),
    #[error("environment variable {name} is not a valid number: {value:?}")]
    InvalidNumber { name: &'static str, value: String },
    #[error("no tracker credentials: set JIRA_TOKEN or JIRA_USER and JIRA_PASS")]
    MissingCredentials,
}

/// Represents the server settings: tracker connection, report tuning, dashboard authentication and listen address.
#[derive(Clone, Debug, PartialEq)]
pub struct ServerConfig {
    pub jira_host: String,
    pub jira_user: Option<String>,
    pub jira_pass: Option<String>,
    pub jira_token: Option<String>,
    pub organization_field: String,
    pub max_results: u32,
    pub timeout_secs: u64,
    pub cooldown_ms: u64,
    pub http_user: Option<String>,
    pub http_pass: Option<String>,
    pub listen_addr: String,
    pub port: u16,
}

impl ServerConfig {
    /// Reads the process environment. Call after `.env` has been loaded.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from any variable source; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let jira_host = get("JIRA_HOST").ok_or(ConfigError::MissingVar("JIRA_HOST"))?;

        Ok(Self {
            jira_host,
            jira_user: get("JIRA_USER"),
            jira_pass: get("JIRA_PASS"),
            jira_token: get("JIRA_TOKEN"),
            organization_field: get("JIRA_ORGANIZATION_FIELD")
                .unwrap_or_else(default_organization_field),
            max_results: parse_number("JIRA_MAX_RESULTS", get("JIRA_MAX_RESULTS"))?
                .unwrap_or_else(default_max_results),
            timeout_secs: parse_number("JIRA_TIMEOUT_SECS", get("JIRA_TIMEOUT_SECS"))?
                .unwrap_or_else(default_timeout_secs),
            cooldown_ms: parse_number("JIRA_COOLDOWN_MS", get("JIRA_COOLDOWN_MS"))?
                .unwrap_or_else(default_cooldown_ms),
            http_user: get("HTTP_USER"),
            http_pass: get("HTTP_PASS"),
            listen_addr: get("LISTEN_ADDR").unwrap_or_else(default_listen_addr),
            port: parse_number("PORT", get("PORT"))?.unwrap_or_else(default_port),
        })
    }

    /// A token wins over a username and password pair.
    pub fn jira_credentials(&self) -> Result<Credentials, ConfigError> {
        if let Some(token) = &self.jira_token {
            return Ok(Credentials::bearer(token.clone()));
        }
        match (&self.jira_user, &self.jira_pass) {
            (Some(user), Some(pass)) => Ok(Credentials::basic(user.clone(), pass.clone())),
            (Some(_), None) => Err(ConfigError::MissingVar("JIRA_PASS")),
            _ => Err(ConfigError::MissingCredentials),
        }
    }

    pub fn jira_config(&self) -> Result<JiraConfig, ConfigError> {
        Ok(JiraConfig::new(self.jira_host.clone(), self.jira_credentials()?)
            .with_timeout(Duration::from_secs(self.timeout_secs))
            .with_cooldown(Duration::from_millis(self.cooldown_ms)))
    }

    pub fn auth_mode(&self) -> AuthMode {
        AuthMode::from_settings(self.http_user.as_deref(), self.http_pass.as_deref())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.listen_addr, self.port)
    }
}

fn parse_number<T>(name: &'static str, value: Option<String>) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
{
    value
        .map(|raw| {
            raw.parse::<T>()
                .map_err(|_| ConfigError::InvalidNumber { name, value: raw })
        })
        .transpose()
}

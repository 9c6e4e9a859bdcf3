use std::time::Duration;

use crate::auth::Credentials;

pub const DEFAULT_API_PATH: &str = "rest/api/2";
pub const DEFAULT_USER_AGENT: &str = "jsd-report-server";
pub const DEFAULT_COOLDOWN_MS: u64 = 0;
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Clone, Debug)]
pub struct JiraConfig {
    pub base_url: String,
    pub api_path: String,
    pub credentials: Credentials,
    pub user_agent: String,
    pub cooldown: Duration,
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl JiraConfig {
    /// Accepts either a full URL or a bare host; bare hosts are assumed to speak https.
    pub fn new(host: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            base_url: normalize_base_url(&host.into()),
            api_path: DEFAULT_API_PATH.to_string(),
            credentials,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            cooldown: Duration::from_millis(DEFAULT_COOLDOWN_MS),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }

    pub fn with_api_path(mut self, path: impl Into<String>) -> Self {
        self.api_path = path.into();
        self
    }

    pub fn with_cooldown(mut self, duration: Duration) -> Self {
        self.cooldown = duration;
        self
    }

    pub fn with_timeout(mut self, duration: Duration) -> Self {
        self.timeout = duration;
        self
    }

    pub fn api_root(&self) -> String {
        format!(
            "{}/{}/",
            self.base_url.trim_end_matches('/'),
            self.api_path.trim_matches('/')
        )
    }
}

fn normalize_base_url(value: &str) -> String {
    let trimmed = value.trim().trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::JiraConfig;
    use crate::auth::Credentials;
    use std::time::Duration;

    fn basic() -> Credentials {
        Credentials::basic("bot", "secret")
    }

    #[test]
    fn bare_host_gets_https_scheme() {
        let config = JiraConfig::new("jira.example.com", basic());
        assert_eq!(config.base_url, "https://jira.example.com");
        assert_eq!(config.api_root(), "https://jira.example.com/rest/api/2/");
    }

    #[test]
    fn explicit_scheme_and_trailing_slash_are_kept_clean() {
        let config = JiraConfig::new("http://127.0.0.1:8080/", basic()).with_api_path("/rest/api/3/");
        assert_eq!(config.api_root(), "http://127.0.0.1:8080/rest/api/3/");
    }

    #[test]
    fn defaults_match_report_fetch_budget() {
        let config = JiraConfig::new("jira", basic());
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.cooldown, Duration::ZERO);
        assert_eq!(config.user_agent, "jsd-report-server");
    }
}

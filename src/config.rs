use std::{collections::BTreeMap, env, time::Duration};

use thiserror::Error;

pub const DEFAULT_RPM_URL: &str = "https://rpm.newrelic.com";
pub const DEFAULT_API_URL: &str = "https://api.newrelic.com";
pub const DEFAULT_RETRIES: u32 = 3;
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

/// Proxy settings applied to every outgoing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProxyConfig {
    /// One proxy for both `http` and `https` traffic.
    All(String),
    /// Proxy per URL scheme, e.g. `{"https": "proxy:3128"}`.
    PerScheme(BTreeMap<String, String>),
    /// Go direct, ignoring `HTTP_PROXY`/`HTTPS_PROXY` from the environment.
    Disabled,
}

impl ProxyConfig {
    /// Accepts `host:port` style strings; anything without a port separator
    /// means no proxy.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.contains(':') {
            Some(Self::All(value.to_string()))
        } else {
            None
        }
    }

    pub fn per_scheme(map: BTreeMap<String, String>) -> Self {
        Self::PerScheme(map)
    }
}

/// Base URLs of the two API hosts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub rpm: String,
    pub api: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            rpm: DEFAULT_RPM_URL.to_string(),
            api: DEFAULT_API_URL.to_string(),
        }
    }
}

impl Endpoints {
    /// Points both hosts at one base URL, handy for local fixture servers.
    pub fn single(base: impl Into<String>) -> Self {
        let base = base.into().trim_end_matches('/').to_string();
        Self {
            rpm: base.clone(),
            api: base,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub account_id: String,
    pub api_key: String,
    pub proxy: Option<ProxyConfig>,
    pub retries: u32,
    pub retry_delay: Duration,
    pub timeout: Duration,
    pub endpoints: Endpoints,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("NEWRELIC_ACCOUNT_ID is required and must not be empty")]
    MissingAccountId,
    #[error("NEWRELIC_API_KEY is required and must not be empty")]
    MissingApiKey,
    #[error("NEWRELIC_RETRIES must be a valid u32")]
    InvalidRetries,
    #[error("NEWRELIC_RETRY_DELAY_MS must be a valid number of milliseconds")]
    InvalidRetryDelay,
    #[error("NEWRELIC_TIMEOUT_MS must be a positive number of milliseconds")]
    InvalidTimeout,
    #[error("{0} must be an http or https url")]
    InvalidBaseUrl(&'static str),
}

impl ClientConfig {
    /// Builds a config with the library defaults for everything but the credentials.
    pub fn new(account_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            api_key: api_key.into(),
            proxy: None,
            retries: DEFAULT_RETRIES,
            retry_delay: DEFAULT_RETRY_DELAY,
            timeout: DEFAULT_TIMEOUT,
            endpoints: Endpoints::default(),
        }
    }

    pub fn with_proxy(mut self, proxy: ProxyConfig) -> Self {
        self.proxy = Some(proxy);
        self
    }

    pub fn with_retries(mut self, retries: u32, retry_delay: Duration) -> Self {
        self.retries = retries;
        self.retry_delay = retry_delay;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let account_id = non_empty("NEWRELIC_ACCOUNT_ID").ok_or(ConfigError::MissingAccountId)?;
        let api_key = non_empty("NEWRELIC_API_KEY").ok_or(ConfigError::MissingApiKey)?;
        let proxy = non_empty("NEWRELIC_PROXY").and_then(|value| ProxyConfig::parse(&value));

        let retries = non_empty("NEWRELIC_RETRIES")
            .map(|value| value.parse::<u32>().map_err(|_| ConfigError::InvalidRetries))
            .transpose()?
            .unwrap_or(DEFAULT_RETRIES);
        let retry_delay = non_empty("NEWRELIC_RETRY_DELAY_MS")
            .map(|value| {
                value
                    .parse::<u64>()
                    .map(Duration::from_millis)
                    .map_err(|_| ConfigError::InvalidRetryDelay)
            })
            .transpose()?
            .unwrap_or(DEFAULT_RETRY_DELAY);
        let timeout = non_empty("NEWRELIC_TIMEOUT_MS")
            .map(|value| {
                value
                    .parse::<u64>()
                    .ok()
                    .filter(|millis| *millis > 0)
                    .map(Duration::from_millis)
                    .ok_or(ConfigError::InvalidTimeout)
            })
            .transpose()?
            .unwrap_or(DEFAULT_TIMEOUT);

        let rpm = non_empty("NEWRELIC_RPM_URL")
            .map(|value| validate_base_url("NEWRELIC_RPM_URL", value))
            .transpose()?
            .unwrap_or_else(|| DEFAULT_RPM_URL.to_string());
        let api = non_empty("NEWRELIC_API_URL")
            .map(|value| validate_base_url("NEWRELIC_API_URL", value))
            .transpose()?
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        Ok(Self {
            account_id,
            api_key,
            proxy,
            retries,
            retry_delay,
            timeout,
            endpoints: Endpoints { rpm, api },
        })
    }
}

fn validate_base_url(key: &'static str, value: String) -> Result<String, ConfigError> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(value.trim_end_matches('/').to_string())
    } else {
        Err(ConfigError::InvalidBaseUrl(key))
    }
}

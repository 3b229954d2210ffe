//! Runtime configuration structures and loaders.

use std::env;
use std::time::Duration;

use crate::retry::RetryPolicy;
use crate::telemetry::DATADOG_API_URL;

/// Configuration required to wire up a coordinator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Retry bounds applied to every store call.
    pub retry: RetryPolicy,
    /// Datadog API key; absent means metrics are disabled.
    pub datadog_api_key: Option<String>,
    /// Datadog series endpoint.
    pub datadog_api_url: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::default(),
            datadog_api_key: None,
            datadog_api_url: DATADOG_API_URL.to_string(),
        }
    }
}

impl RuntimeConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `RETRY_MAX_ATTEMPTS` - Total store attempts per call (default: 3)
    /// - `RETRY_BASE_DELAY_MS` - Delay before the first retry (default: 1000)
    /// - `DATADOG_API_KEY` - Enables the Datadog sink when set
    /// - `DATADOG_API_URL` - Overrides the series endpoint
    ///
    /// Unparsable values fall back to the defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(max_attempts) = read_env::<u32>("RETRY_MAX_ATTEMPTS") {
            config.retry.max_attempts = max_attempts.max(1);
        }
        if let Some(base_delay_ms) = read_env::<u64>("RETRY_BASE_DELAY_MS") {
            config.retry.base_delay = Duration::from_millis(base_delay_ms);
        }

        config.datadog_api_key = env::var("DATADOG_API_KEY").ok().filter(|key| !key.is_empty());
        if let Ok(api_url) = env::var("DATADOG_API_URL")
            && !api_url.is_empty()
        {
            config.datadog_api_url = api_url;
        }

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

use crate::retry::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Upstream endpoints and request pacing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub base_url: String,
    pub asn_url: String,
    /// Minimum spacing between requests to the same upstream.
    pub min_request_interval_ms: u64,
    pub request_timeout_secs: u64,
    /// Delay used when a 429 carries no usable `Retry-After`.
    pub default_retry_after_secs: u64,
    /// Unbounded when unset.
    pub max_rate_limit_retries: Option<u32>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            asn_url: default_asn_url(),
            min_request_interval_ms: 250,
            request_timeout_secs: 30,
            default_retry_after_secs: 2,
            max_rate_limit_retries: None,
        }
    }
}

fn default_base_url() -> String {
    "https://dns.coffee/api".to_string()
}
fn default_asn_url() -> String {
    "https://stat.ripe.net/data/network-info/data.json".to_string()
}

impl SourceConfig {
    pub fn min_request_interval(&self) -> Duration {
        Duration::from_millis(self.min_request_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            default_delay: Duration::from_secs(self.default_retry_after_secs),
            max_retries: self.max_rate_limit_retries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config() {
        let config: SourceConfig =
            serde_json::from_str(r#"{ "base_url": "http://localhost:8080/api", "max_rate_limit_retries": 3 }"#)
                .unwrap();
        assert_eq!(config.base_url, "http://localhost:8080/api");
        assert_eq!(config.min_request_interval(), Duration::from_millis(250));
        let policy = config.retry_policy();
        assert_eq!(policy.default_delay, Duration::from_secs(2));
        assert_eq!(policy.max_retries, Some(3));
    }
}

//! HTTP implementations of the upstream sources.
//!
//! Both clients pace their own requests; there is no other concurrency limit.

use crate::config::SourceConfig;
use crate::error::FetchError;
use crate::source::{AsnSource, DnsDataSource};
use crate::wire::{Envelope, NetworkInfo, Record, ZoneCatalogue};
use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio::time::{Instant, sleep_until};
use url::Url;

const USER_AGENT: &str = concat!("dnsgraph/", env!("CARGO_PKG_VERSION"));

/// Spaces requests at least `interval` apart. Concurrent callers each reserve
/// the next free slot.
#[derive(Debug)]
pub struct Throttle {
    interval: Duration,
    next_slot: Mutex<Option<Instant>>,
}

impl Throttle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_slot: Mutex::new(None),
        }
    }

    pub async fn wait(&self) {
        let slot = {
            let mut next = self.next_slot.lock();
            let now = Instant::now();
            let slot = next.map_or(now, |next| next.max(now));
            *next = Some(slot + self.interval);
            slot
        };
        sleep_until(slot).await;
    }
}

/// Seconds from a `Retry-After` header. Zero, dates and garbage yield `None`.
pub fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
}

fn build_client(config: &SourceConfig) -> Result<Client, FetchError> {
    Client::builder()
        .timeout(config.request_timeout())
        .user_agent(USER_AGENT)
        .build()
        .map_err(FetchError::from)
}

async fn get_json<T: DeserializeOwned>(
    client: &Client,
    throttle: &Throttle,
    url: Url,
) -> Result<T, FetchError> {
    throttle.wait().await;
    tracing::trace!(%url, "GET");
    let response = client.get(url).send().await?;
    let status = response.status();
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(FetchError::RateLimited {
            retry_after: parse_retry_after(response.headers()),
        });
    }
    if status == StatusCode::NOT_FOUND {
        return Err(FetchError::NotFound);
    }
    if !status.is_success() {
        return Err(FetchError::Status {
            status: status.as_u16(),
        });
    }
    let body = response.bytes().await?;
    serde_json::from_slice(&body).map_err(|e| FetchError::Decode(e.to_string()))
}

/// DNS data API client (`/zones`, `/domains/{name}`, `/nameservers/{name}`).
pub struct HttpDnsSource {
    client: Client,
    base_url: String,
    throttle: Throttle,
}

impl HttpDnsSource {
    pub fn new(config: &SourceConfig) -> Result<Self, FetchError> {
        Url::parse(&config.base_url).map_err(|e| FetchError::Transport(e.to_string()))?;
        Ok(Self {
            client: build_client(config)?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            throttle: Throttle::new(config.min_request_interval()),
        })
    }

    fn url(&self, link: &str) -> Result<Url, FetchError> {
        let link = link.trim();
        let separator = if link.starts_with('/') { "" } else { "/" };
        Url::parse(&format!("{}{}{}", self.base_url, separator, link))
            .map_err(|e| FetchError::Transport(e.to_string()))
    }
}

#[async_trait]
impl DnsDataSource for HttpDnsSource {
    async fn zones(&self) -> Result<ZoneCatalogue, FetchError> {
        let url = self.url("/zones")?;
        let envelope: Envelope<ZoneCatalogue> = get_json(&self.client, &self.throttle, url).await?;
        Ok(envelope.data)
    }

    async fn record(&self, link: &str) -> Result<Record, FetchError> {
        let url = self.url(link)?;
        let envelope: Envelope<Record> = get_json(&self.client, &self.throttle, url).await?;
        Ok(envelope.data)
    }
}

/// RIPEstat `network-info` client.
pub struct RipeStatAsnSource {
    client: Client,
    endpoint: Url,
    throttle: Throttle,
}

impl RipeStatAsnSource {
    pub fn new(config: &SourceConfig) -> Result<Self, FetchError> {
        Ok(Self {
            client: build_client(config)?,
            endpoint: Url::parse(&config.asn_url).map_err(|e| FetchError::Transport(e.to_string()))?,
            throttle: Throttle::new(config.min_request_interval()),
        })
    }
}

#[async_trait]
impl AsnSource for RipeStatAsnSource {
    async fn asns(&self, ip: &str) -> Result<Vec<String>, FetchError> {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair("resource", ip);
        let envelope: Envelope<NetworkInfo> = get_json(&self.client, &self.throttle, url).await?;
        Ok(envelope.data.asns.iter().map(ToString::to_string).collect())
    }
}

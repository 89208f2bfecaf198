use crate::error::FetchError;
use crate::wire::{Record, ZoneCatalogue};
use async_trait::async_trait;

/// Read-only DNS data source addressed by links such as `/domains/example.com`.
#[async_trait]
pub trait DnsDataSource: Send + Sync {
    async fn zones(&self) -> Result<ZoneCatalogue, FetchError>;

    async fn record(&self, link: &str) -> Result<Record, FetchError>;
}

/// Looks up the autonomous systems announcing an IP. An empty list is a valid answer.
#[async_trait]
pub trait AsnSource: Send + Sync {
    async fn asns(&self, ip: &str) -> Result<Vec<String>, FetchError>;
}

/// Cache key for a link. Links differing only in case or surrounding
/// whitespace address the same record.
pub fn normalize_link(link: &str) -> String {
    let link = link.trim();
    let mut key = String::with_capacity(link.len() + 1);
    if !link.starts_with('/') {
        key.push('/');
    }
    key.push_str(link);
    key.to_ascii_uppercase()
}

pub fn domain_link(domain: &str) -> String {
    format!("/domains/{}", domain.to_ascii_lowercase())
}

pub fn nameserver_link(name: &str) -> String {
    format!("/nameservers/{}", name.to_ascii_lowercase())
}

pub fn zone_link(tld: &str) -> String {
    format!("/zones/{}", tld.trim_end_matches('.').to_ascii_lowercase())
}

//! Builds delegation graphs from a DNS data source and an ASN lookup source.

pub mod cache;
pub mod config;
pub mod error;
pub mod http;
pub mod resolver;
pub mod retry;
pub mod source;
pub mod wire;

pub use cache::LinkCache;
pub use config::SourceConfig;
pub use error::{FetchError, ResolveError};
pub use http::{HttpDnsSource, RipeStatAsnSource, Throttle};
pub use resolver::Resolver;
pub use retry::RetryPolicy;
pub use source::{AsnSource, DnsDataSource, normalize_link};
pub use wire::{Envelope, IpRecord, NameserverRef, Record, ZoneCatalogue, ZoneRef};

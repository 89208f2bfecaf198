//! Upstream JSON shapes.
//!
//! Every DNS-data response is wrapped in `{ "data": ... }`. Zones come back
//! with `"type": "domain"`; the resolver decides what kind of node a record
//! becomes from the link it was fetched for.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub zone: Option<ZoneRef>,
    #[serde(default)]
    pub nameservers: Vec<NameserverRef>,
    #[serde(default)]
    pub archive_nameservers: Vec<NameserverRef>,
    #[serde(default)]
    pub ipv4: Vec<IpRecord>,
    #[serde(default)]
    pub ipv6: Vec<IpRecord>,
    #[serde(default)]
    pub archive_ipv4: Vec<IpRecord>,
    #[serde(default)]
    pub archive_ipv6: Vec<IpRecord>,
    // Only set on records synthesized for unmapped domains
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub hazard: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hazard_message: Option<String>,
}

impl Record {
    pub fn is_domain(&self) -> bool {
        self.kind.eq_ignore_ascii_case("domain") || self.kind.eq_ignore_ascii_case("zone")
    }

    pub fn is_nameserver(&self) -> bool {
        self.kind.eq_ignore_ascii_case("nameserver")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneRef {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameserverRef {
    pub name: String,
    #[serde(default)]
    pub link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpRecord {
    pub name: String,
    #[serde(default)]
    pub version: Option<u8>,
    #[serde(default)]
    pub link: Option<String>,
}

/// `GET /zones`: the TLDs the data source holds zone files for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneCatalogue {
    #[serde(default)]
    pub zones: Vec<ZoneEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneEntry {
    pub zone: String,
}

impl ZoneCatalogue {
    pub fn from_tlds<I, S>(tlds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            zones: tlds
                .into_iter()
                .map(|zone| ZoneEntry { zone: zone.into() })
                .collect(),
        }
    }

    pub fn contains(&self, tld: &str) -> bool {
        let tld = tld.trim_end_matches('.');
        self.zones.iter().any(|z| z.zone.eq_ignore_ascii_case(tld))
    }
}

/// RIPEstat `network-info` payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NetworkInfo {
    #[serde(default)]
    pub asns: Vec<Asn>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Asn {
    Text(String),
    Number(u64),
}

impl fmt::Display for Asn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Asn::Text(asn) => f.write_str(asn),
            Asn::Number(asn) => write!(f, "{}", asn),
        }
    }
}

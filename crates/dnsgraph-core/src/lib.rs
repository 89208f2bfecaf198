use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub mod config;
pub mod domain;
pub mod error;
pub mod finding;

pub use config::{GraphConfig, LayoutLimits};
pub use domain::{
    DomainParts, host_from_input, is_bare_tld, is_ip_literal, is_wildcard, root_domain,
    split_domain,
};
pub use error::GraphError;
pub use finding::{Finding, FindingClass, IpClass, classify_ip};

/// The entity a graph node stands for.
///
/// Accumulation kinds are synthetic group nodes; every configuration decision
/// (hide, accumulate) is made on the [`NodeKind::base`] kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    Domain,
    Zone,
    Nameserver,
    Ip,
    IpAccumulation,
    NsAccumulation,
}

impl NodeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Domain => "domain",
            NodeKind::Zone => "zone",
            NodeKind::Nameserver => "nameserver",
            NodeKind::Ip => "ip",
            NodeKind::IpAccumulation => "ip-accumulation",
            NodeKind::NsAccumulation => "ns-accumulation",
        }
    }

    /// Kind the node is grouped under for hide/accumulate configuration.
    pub fn base(self) -> NodeKind {
        match self {
            NodeKind::IpAccumulation => NodeKind::Ip,
            NodeKind::NsAccumulation => NodeKind::Nameserver,
            other => other,
        }
    }

    pub fn is_accumulation(self) -> bool {
        matches!(self, NodeKind::IpAccumulation | NodeKind::NsAccumulation)
    }

    /// Group kind used when nodes of this kind are accumulated.
    pub fn accumulation_kind(self) -> Option<NodeKind> {
        match self {
            NodeKind::Ip => Some(NodeKind::IpAccumulation),
            NodeKind::Nameserver => Some(NodeKind::NsAccumulation),
            _ => None,
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error type for kind parsing failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid node kind: {0}")]
pub struct KindParseError(pub String);

impl FromStr for NodeKind {
    type Err = KindParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "domain" => Ok(NodeKind::Domain),
            "zone" => Ok(NodeKind::Zone),
            "nameserver" | "ns" => Ok(NodeKind::Nameserver),
            "ip" => Ok(NodeKind::Ip),
            "ip-accumulation" => Ok(NodeKind::IpAccumulation),
            "ns-accumulation" => Ok(NodeKind::NsAccumulation),
            other => Err(KindParseError(other.to_string())),
        }
    }
}

/// Deduplication key of a node: `lowercase(kind + "~" + name)`.
pub fn unique_name(kind: NodeKind, name: &str) -> String {
    format!("{}~{}", kind.as_str(), name).to_lowercase()
}

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FindingClass {
    Hazard,
    Warning,
}

/// Conditions detected while walking delegation data.
///
/// A finding is attached to the node where it was detected and then spread to
/// the node's branch by the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Finding {
    AvailableForRegistration,
    InvalidTld,
    NsIpLiteral,
    NsWildcard,
    NsBareTld,
    PublicNameserverIp,
    PrivateAddressSpace,
    NoAsn,
}

impl Finding {
    pub fn class(self) -> FindingClass {
        match self {
            Finding::AvailableForRegistration | Finding::InvalidTld | Finding::NoAsn => {
                FindingClass::Hazard
            }
            _ => FindingClass::Warning,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Finding::AvailableForRegistration => "Domain potentially available for registration",
            Finding::InvalidTld => "Invalid TLD",
            Finding::NsIpLiteral => "NS record with IPv4/6 address",
            Finding::NsWildcard => "NS record has a wildcard domain",
            Finding::NsBareTld => "NS record points to a potential TLD",
            Finding::PublicNameserverIp => "IP belongs to a public nameserver",
            Finding::PrivateAddressSpace => "IP is part of private address space",
            Finding::NoAsn => "IP does not have an AS",
        }
    }

    /// Message for this finding on a node named `subject` in `owner`'s
    /// branch. Only the no-AS hazard names the pair.
    pub fn message_on(self, owner: &str, subject: &str) -> String {
        match self {
            Finding::NoAsn => format!("{}'s IP {} does not have an AS", owner, subject),
            other => other.message().to_string(),
        }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IpClass {
    Private,
    PublicResolver,
}

impl IpClass {
    pub fn finding(self) -> Finding {
        match self {
            IpClass::Private => Finding::PrivateAddressSpace,
            IpClass::PublicResolver => Finding::PublicNameserverIp,
        }
    }
}

const PUBLIC_RESOLVERS: &[&str] = &[
    "8.8.8.8",
    "8.8.4.4",
    "1.1.1.1",
    "1.0.0.1",
    "9.9.9.9",
    "149.112.112.112",
    "208.67.222.222",
    "208.67.220.220",
    "2001:4860:4860::8888",
    "2001:4860:4860::8844",
    "2606:4700:4700::1111",
    "2606:4700:4700::1001",
    "2620:fe::fe",
];

/// Classifies an IP literal. Returns `None` for ordinary public addresses and
/// for input that is not an IP at all.
pub fn classify_ip(ip: &str) -> Option<IpClass> {
    let addr: IpAddr = ip.trim().parse().ok()?;
    if is_private(addr) {
        return Some(IpClass::Private);
    }
    let is_resolver = PUBLIC_RESOLVERS
        .iter()
        .filter_map(|candidate| candidate.parse::<IpAddr>().ok())
        .any(|candidate| candidate == addr);
    is_resolver.then_some(IpClass::PublicResolver)
}

fn is_private(addr: IpAddr) -> bool {
    match addr {
        IpAddr::V4(v4) => is_private_v4(v4),
        IpAddr::V6(v6) => match v6.to_ipv4_mapped() {
            Some(v4) => is_private_v4(v4),
            None => is_private_v6(v6),
        },
    }
}

fn is_private_v4(addr: Ipv4Addr) -> bool {
    addr.is_private() || addr.is_loopback()
}

fn is_private_v6(addr: Ipv6Addr) -> bool {
    // fc00::/7 unique local
    addr.is_loopback() || (addr.segments()[0] & 0xfe00) == 0xfc00
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_table_classes() {
        assert_eq!(Finding::AvailableForRegistration.class(), FindingClass::Hazard);
        assert_eq!(Finding::NoAsn.class(), FindingClass::Hazard);
        assert_eq!(Finding::NsIpLiteral.class(), FindingClass::Warning);
        assert_eq!(Finding::PrivateAddressSpace.class(), FindingClass::Warning);
        assert_eq!(
            Finding::AvailableForRegistration.message(),
            "Domain potentially available for registration"
        );
    }

    #[test]
    fn test_node_specific_messages() {
        assert_eq!(
            Finding::NoAsn.message_on("example.com", "203.0.113.2"),
            "example.com's IP 203.0.113.2 does not have an AS"
        );
        assert_eq!(
            Finding::NsWildcard.message_on("example.com", "*.example.com"),
            Finding::NsWildcard.message()
        );
    }

    #[test]
    fn test_classify_ip() {
        assert_eq!(classify_ip("10.1.2.3"), Some(IpClass::Private));
        assert_eq!(classify_ip("172.20.0.1"), Some(IpClass::Private));
        assert_eq!(classify_ip("192.168.1.1"), Some(IpClass::Private));
        assert_eq!(classify_ip("127.0.0.1"), Some(IpClass::Private));
        assert_eq!(classify_ip("::1"), Some(IpClass::Private));
        assert_eq!(classify_ip("fd12::1"), Some(IpClass::Private));
        assert_eq!(classify_ip("::ffff:10.0.0.1"), Some(IpClass::Private));
        assert_eq!(classify_ip("8.8.8.8"), Some(IpClass::PublicResolver));
        assert_eq!(classify_ip("2606:4700:4700::1111"), Some(IpClass::PublicResolver));
        assert_eq!(classify_ip("203.0.113.1"), None);
        assert_eq!(classify_ip("ns1.example.com"), None);
    }
}

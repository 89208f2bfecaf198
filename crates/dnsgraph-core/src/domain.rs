//! Registrable-domain helpers.
//!
//! Branch keys and same-domain/same-TLD checks all work on the naive split
//! used by the upstream data: the last label is the TLD and the last two
//! labels are the registrable domain. Both are upper-cased.

use std::net::IpAddr;
use url::Url;

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct DomainParts {
    pub tld: Option<String>,
    pub domain: Option<String>,
}

impl DomainParts {
    pub fn same_tld(&self, other: &DomainParts) -> bool {
        matches!((&self.tld, &other.tld), (Some(a), Some(b)) if a == b)
    }

    pub fn same_domain(&self, other: &DomainParts) -> bool {
        matches!((&self.domain, &other.domain), (Some(a), Some(b)) if a == b)
    }
}

pub fn split_domain(name: &str) -> DomainParts {
    let trimmed = name.trim().trim_end_matches('.');
    let mut labels = trimmed.rsplit('.');
    let tld = match labels.next() {
        Some(label) if !label.is_empty() => label.to_ascii_uppercase(),
        _ => return DomainParts::default(),
    };
    let domain = labels
        .next()
        .filter(|label| !label.is_empty())
        .map(|label| format!("{}.{}", label, tld).to_ascii_uppercase());
    DomainParts {
        tld: Some(tld),
        domain,
    }
}

/// Extracts a host from a URL or bare host input.
///
/// Accepts `https://www.example.com/path`, `www.example.com/path` and
/// `example.com`. Returns `None` for input that has no usable host.
pub fn host_from_input(input: &str) -> Option<String> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    let host = match Url::parse(input) {
        Ok(url) if url.has_host() => url.host_str()?.to_string(),
        _ => input
            .split(['/', '?', '#'])
            .next()
            .unwrap_or_default()
            .rsplit('@')
            .next()
            .unwrap_or_default()
            .split(':')
            .next()
            .unwrap_or_default()
            .to_string(),
    };
    let host = host.trim_end_matches('.').to_ascii_lowercase();
    let valid = !host.is_empty()
        && host.split('.').all(|label| {
            !label.is_empty()
                && label
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        });
    valid.then_some(host)
}

/// Registrable domain of a user-supplied root, upper-cased.
pub fn root_domain(input: &str) -> Option<String> {
    let host = host_from_input(input)?;
    if is_ip_literal(&host) {
        return None;
    }
    split_domain(&host).domain
}

pub fn is_ip_literal(name: &str) -> bool {
    let candidate = name
        .trim()
        .trim_start_matches('[')
        .trim_end_matches(']');
    let candidate = candidate.split('%').next().unwrap_or_default();
    candidate.parse::<IpAddr>().is_ok()
}

/// True for a name that is nothing more than a TLD, e.g. `com` or `com.`.
pub fn is_bare_tld(name: &str) -> bool {
    let parts = split_domain(name);
    parts.tld.is_some() && parts.domain.is_none()
}

pub fn is_wildcard(name: &str) -> bool {
    name.trim_start().starts_with('*')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_domain() {
        let parts = split_domain("ns1.Example.com");
        assert_eq!(parts.tld.as_deref(), Some("COM"));
        assert_eq!(parts.domain.as_deref(), Some("EXAMPLE.COM"));

        let parts = split_domain("com.");
        assert_eq!(parts.tld.as_deref(), Some("COM"));
        assert_eq!(parts.domain, None);

        assert_eq!(split_domain(""), DomainParts::default());
    }

    #[test]
    fn test_same_domain_and_tld() {
        let a = split_domain("ns1.example.com");
        let b = split_domain("EXAMPLE.COM");
        let c = split_domain("other.com");
        assert!(a.same_domain(&b));
        assert!(!a.same_domain(&c));
        assert!(a.same_tld(&c));
        assert!(!a.same_tld(&split_domain("example.net")));
    }

    #[test]
    fn test_root_domain_accepts_urls_and_hosts() {
        assert_eq!(root_domain("example.com").as_deref(), Some("EXAMPLE.COM"));
        assert_eq!(
            root_domain("https://www.example.com/some/path?q=1").as_deref(),
            Some("EXAMPLE.COM")
        );
        assert_eq!(root_domain("www.example.com/x").as_deref(), Some("EXAMPLE.COM"));
        assert_eq!(root_domain("com"), None);
        assert_eq!(root_domain(""), None);
        assert_eq!(root_domain("not a domain"), None);
        assert_eq!(root_domain("203.0.113.1"), None);
    }

    #[test]
    fn test_ip_literals() {
        assert!(is_ip_literal("203.0.113.1"));
        assert!(is_ip_literal("2001:db8::1"));
        assert!(is_ip_literal("[2001:db8::1]"));
        assert!(is_ip_literal("fe80::1%eth0"));
        assert!(!is_ip_literal("ns1.example.com"));
        assert!(!is_ip_literal("256.0.0.1"));
    }

    #[test]
    fn test_bare_tld_and_wildcard() {
        assert!(is_bare_tld("io"));
        assert!(!is_bare_tld("example.io"));
        assert!(is_wildcard("*.example.com"));
        assert!(!is_wildcard("ns1.example.com"));
    }
}

//! Recursive resolution of a domain into a delegation graph.
//!
//! Each fetched record is expanded into its own sub-graph and merged into
//! the caller's graph under the node that referenced it. Links are fetched
//! once per resolution through [`LinkCache`]; only the first claimant of a
//! link expands it, later references produce the bare node and pick up its
//! children through the merge.
//!
//! Nameservers in a different domain are resolved inline, one after another,
//! the first time their link is seen, so a dependency is in the cache before
//! any sibling needs it. Same-domain nameservers, zones and repeat links run
//! concurrently once the inline pass is done. A failure on the inline path
//! fails the domain; a concurrent failure only drops that sibling.

use crate::cache::LinkCache;
use crate::config::SourceConfig;
use crate::error::{FetchError, ResolveError};
use crate::http::{HttpDnsSource, RipeStatAsnSource};
use crate::retry::RetryPolicy;
use crate::source::{AsnSource, DnsDataSource, domain_link, nameserver_link, zone_link};
use crate::wire::{IpRecord, NameserverRef, Record, ZoneCatalogue, ZoneRef};
use dnsgraph_core::{
    DomainParts, Finding, GraphConfig, GraphError, NodeKind, classify_ip, is_bare_tld,
    is_ip_literal, is_wildcard, root_domain, split_domain,
};
use dnsgraph_graph::{Graph, Node, NodeIndex};
use futures_util::future::{BoxFuture, FutureExt, join_all};
use std::sync::Arc;

pub struct Resolver {
    dns: Arc<dyn DnsDataSource>,
    asn: Arc<dyn AsnSource>,
    retry: RetryPolicy,
}

impl Resolver {
    pub fn new(dns: Arc<dyn DnsDataSource>, asn: Arc<dyn AsnSource>) -> Self {
        Self {
            dns,
            asn,
            retry: RetryPolicy::default(),
        }
    }

    /// Resolver over the HTTP data and ASN sources described by `config`.
    pub fn from_config(config: &SourceConfig) -> Result<Self, FetchError> {
        let dns = HttpDnsSource::new(config)?;
        let asn = RipeStatAsnSource::new(config)?;
        Ok(Self::new(Arc::new(dns), Arc::new(asn)).with_retry(config.retry_policy()))
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Resolves `input` (a domain or URL) into a laid-out graph.
    pub async fn resolve(&self, input: &str, config: GraphConfig) -> Result<Graph, ResolveError> {
        let domain =
            root_domain(input).ok_or_else(|| ResolveError::InvalidDomain(input.trim().to_string()))?;
        tracing::info!(domain = %domain, "resolving");

        let zones = self.retry.run("/zones", || self.dns.zones()).await?;
        let pass = Pass {
            dns: self.dns.as_ref(),
            asn: self.asn.as_ref(),
            retry: self.retry,
            cache: LinkCache::new(),
            zones,
            config: Arc::new(config),
        };

        let mut graph = pass.resolve_link(domain_link(&domain), 0, None).await?;
        graph.assign_layout();
        tracing::info!(
            domain = %domain,
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            links = pass.cache.len(),
            "resolved"
        );
        Ok(graph)
    }
}

/// State shared by every step of one resolution.
struct Pass<'a> {
    dns: &'a dyn DnsDataSource,
    asn: &'a dyn AsnSource,
    retry: RetryPolicy,
    cache: LinkCache,
    zones: ZoneCatalogue,
    config: Arc<GraphConfig>,
}

/// How a nameserver listed on a domain record is resolved.
enum NameserverPlan {
    /// Same registrable domain: fetch the nameserver record itself.
    SameDomain { link: String },
    /// No registrable domain, only a TLD: resolve the zone.
    BareTld { link: String },
    /// Another registrable domain: map that domain under the nameserver.
    OtherDomain { domain: String },
}

impl<'a> Pass<'a> {
    fn new_graph(&self) -> Graph {
        Graph::with_shared_config(Arc::clone(&self.config))
    }

    fn resolve_link(
        &'a self,
        link: String,
        depth: usize,
        kind: Option<NodeKind>,
    ) -> BoxFuture<'a, Result<Graph, ResolveError>> {
        async move {
            let lookup = self
                .cache
                .get_or_fetch(&link, || async {
                    self.retry
                        .run(&link, || self.dns.record(&link))
                        .await
                        .map(Arc::new)
                })
                .await;
            let record = lookup.record?;
            if !lookup.owner {
                tracing::trace!(link = %link, "link already claimed");
            }
            self.expand(record, depth, kind, lookup.owner, false).await
        }
        .boxed()
    }

    /// Builds the sub-graph for one record. Without `follow` only the record's
    /// own node is produced.
    fn expand(
        &'a self,
        record: Arc<Record>,
        depth: usize,
        kind: Option<NodeKind>,
        follow: bool,
        preload: bool,
    ) -> BoxFuture<'a, Result<Graph, ResolveError>> {
        async move {
            let mut graph = self.new_graph();
            let mut node = Node::new(
                kind.unwrap_or(if record.is_nameserver() {
                    NodeKind::Nameserver
                } else {
                    NodeKind::Domain
                }),
                record.name.clone(),
            )
            .with_depth(depth);
            node.link = record.link.clone();
            node.preload = preload;
            if record.hazard {
                node.hazard = true;
                node.hazard_message = record.hazard_message.clone();
            }

            if record.is_domain() {
                node = node.with_domain(&record.name);
                let root = graph.insert_node(node);
                if follow {
                    self.expand_domain(&mut graph, root, &record, depth, preload).await?;
                }
            } else if record.is_nameserver() {
                node.zone = record.zone.as_ref().map(|z| z.name.clone());
                let root = graph.insert_node(node);
                if follow {
                    self.expand_nameserver(&mut graph, root, &record, depth).await?;
                }
            } else {
                return Err(ResolveError::UnexpectedRecord {
                    link: record.link.clone().unwrap_or_else(|| record.name.clone()),
                    kind: record.kind.clone(),
                });
            }
            Ok(graph)
        }
        .boxed()
    }

    async fn expand_domain(
        &'a self,
        graph: &mut Graph,
        root: NodeIndex,
        record: &Record,
        depth: usize,
        preload: bool,
    ) -> Result<(), ResolveError> {
        let mut deferred: Vec<BoxFuture<'a, Result<Graph, ResolveError>>> = Vec::new();

        if let Some(zone) = &record.zone {
            if self.config.resolve_zones {
                deferred.push(self.resolve_zone(zone.clone(), depth + 1));
            } else {
                graph.merge(root, self.zone_placeholder(&zone.name, depth + 1), true)?;
            }
        }

        let mut nameservers: Vec<(NameserverRef, bool)> =
            record.nameservers.iter().cloned().map(|ns| (ns, false)).collect();
        if self.config.resolve_archive {
            nameservers.extend(record.archive_nameservers.iter().cloned().map(|ns| (ns, true)));
        }

        let current = split_domain(&record.name);
        let mut claimed: Vec<String> = Vec::new();
        for (nameserver, archive) in nameservers {
            if is_ip_literal(&nameserver.name) {
                let sub = self.ip_literal_nameserver(&nameserver, &current, depth + 1);
                graph.merge(root, sub, true)?;
                continue;
            }

            let plan = plan(&nameserver, &record.name);
            let findings = nameserver_findings(&nameserver.name);
            let key = match &plan {
                NameserverPlan::SameDomain { .. } => None,
                NameserverPlan::BareTld { link } => Some(link.to_ascii_uppercase()),
                NameserverPlan::OtherDomain { domain } => {
                    Some(domain_link(domain).to_ascii_uppercase())
                }
            };
            let inline = match key {
                Some(key) if !claimed.contains(&key) => {
                    claimed.push(key);
                    true
                }
                _ => false,
            };

            match plan {
                // Synthesized domains never fetch their own nameservers
                NameserverPlan::SameDomain { .. } if preload => {
                    let mut sub = self.new_graph();
                    let mut node = Node::new(NodeKind::Nameserver, nameserver.name.clone())
                        .with_depth(depth + 1);
                    node.zone = split_domain(&nameserver.name).tld;
                    sub.insert_node(node);
                    finish_nameserver(&mut sub, archive, &findings);
                    graph.merge(root, sub, true)?;
                }
                NameserverPlan::SameDomain { link } => {
                    deferred.push(
                        async move {
                            let mut sub = self
                                .resolve_link(link, depth + 1, Some(NodeKind::Nameserver))
                                .await?;
                            finish_nameserver(&mut sub, archive, &findings);
                            Ok::<_, ResolveError>(sub)
                        }
                        .boxed(),
                    );
                }
                NameserverPlan::BareTld { link } => {
                    let step = async move {
                        let mut sub =
                            self.resolve_link(link, depth + 1, Some(NodeKind::Zone)).await?;
                        apply_findings(&mut sub, &findings);
                        Ok::<_, ResolveError>(sub)
                    };
                    if inline {
                        graph.merge(root, step.await?, true)?;
                    } else {
                        deferred.push(step.boxed());
                    }
                }
                NameserverPlan::OtherDomain { domain } => {
                    let step = async move {
                        let mut sub =
                            self.authoritative_nameserver(&nameserver, &domain, archive, depth + 1);
                        if !preload {
                            self.map_nameserver_domain(&mut sub, &domain, &nameserver, depth + 1)
                                .await?;
                        }
                        apply_findings(&mut sub, &findings);
                        Ok::<_, ResolveError>(sub)
                    };
                    if inline {
                        graph.merge(root, step.await?, true)?;
                    } else {
                        deferred.push(step.boxed());
                    }
                }
            }
        }

        for result in join_all(deferred).await {
            match result {
                Ok(sub) => {
                    graph.merge(root, sub, true)?;
                }
                Err(err) => {
                    tracing::warn!(domain = %record.name, error = %err, "Skipping unresolved sibling")
                }
            }
        }
        Ok(())
    }

    async fn expand_nameserver(
        &'a self,
        graph: &mut Graph,
        root: NodeIndex,
        record: &Record,
        depth: usize,
    ) -> Result<(), ResolveError> {
        let mut ips: Vec<(IpRecord, bool)> = record
            .ipv4
            .iter()
            .chain(&record.ipv6)
            .cloned()
            .map(|ip| (ip, false))
            .collect();
        if self.config.resolve_archive {
            ips.extend(
                record
                    .archive_ipv4
                    .iter()
                    .chain(&record.archive_ipv6)
                    .cloned()
                    .map(|ip| (ip, true)),
            );
        }

        let lookups = join_all(ips.iter().map(|(ip, _)| self.lookup_asns(&ip.name))).await;
        let owner = split_domain(&record.name)
            .domain
            .map(|d| d.to_ascii_lowercase())
            .unwrap_or_else(|| record.name.clone());

        for ((ip, archive), asns) in ips.into_iter().zip(lookups) {
            let asns = match asns {
                Ok(asns) => asns,
                Err(err) => {
                    tracing::warn!(ip = %ip.name, error = %err, "Skipping IP without ASN data");
                    continue;
                }
            };
            let mut node = Node::new(NodeKind::Ip, ip.name.clone()).with_depth(depth + 1);
            node.ip_version = ip.version;
            node.link = ip.link.clone();
            node.archive = archive;
            if asns.is_empty() {
                let message = Finding::NoAsn.message_on(&owner, &ip.name);
                node = node.with_finding(Finding::NoAsn, message);
            }
            node.asns = Some(asns);
            if let Some(class) = classify_ip(&ip.name) {
                let finding = class.finding();
                node = node.with_finding(finding, finding.message());
            }
            let index = graph.insert_node(node);
            graph.connect(root, index)?;
        }
        Ok(())
    }

    /// Resolves a nameserver's registrable domain and hangs it under the
    /// nameserver. When the domain can't be fetched and unmapped nodes are
    /// shown, a placeholder domain flagged as a hazard is built instead.
    async fn map_nameserver_domain(
        &'a self,
        sub: &mut Graph,
        domain: &str,
        nameserver: &NameserverRef,
        depth: usize,
    ) -> Result<(), ResolveError> {
        let link = domain_link(domain);
        let tld = split_domain(domain).tld.unwrap_or_default();
        let zone_known = self.zones.contains(&tld);

        let fetched = if zone_known {
            self.resolve_link(link.clone(), depth, None).await
        } else {
            Err(ResolveError::unavailable(&link, "zone is not in the catalogue"))
        };
        let mapped = match fetched {
            Ok(mapped) => mapped,
            Err(err) if self.config.show_unmapped_nodes => {
                let finding = if zone_known {
                    Finding::AvailableForRegistration
                } else {
                    Finding::InvalidTld
                };
                tracing::debug!(domain, error = %err, finding = %finding, "placeholder for unmapped domain");
                let placeholder = Record {
                    kind: "domain".into(),
                    name: domain.to_ascii_uppercase(),
                    link: Some(link),
                    zone: Some(ZoneRef { name: tld }),
                    nameservers: vec![nameserver.clone()],
                    hazard: true,
                    hazard_message: Some(finding.message().to_string()),
                    ..Record::default()
                };
                self.expand(Arc::new(placeholder), depth, None, true, true).await?
            }
            Err(err) => return Err(err),
        };

        let check_bidirectional = mapped.contains_name(&nameserver.name);
        let root = sub.root().ok_or(GraphError::MissingRoot)?;
        sub.merge(root, mapped, check_bidirectional)?;
        Ok(())
    }

    fn resolve_zone(&'a self, zone: ZoneRef, depth: usize) -> BoxFuture<'a, Result<Graph, ResolveError>> {
        async move {
            let link = zone_link(&zone.name);
            match self.resolve_link(link, depth, Some(NodeKind::Zone)).await {
                Ok(sub) => Ok(sub),
                Err(err) => {
                    tracing::debug!(zone = %zone.name, error = %err, "zone unavailable, using placeholder");
                    Ok(self.zone_placeholder(&zone.name, depth))
                }
            }
        }
        .boxed()
    }

    fn zone_placeholder(&self, zone: &str, depth: usize) -> Graph {
        let mut sub = self.new_graph();
        sub.insert_node(
            Node::new(NodeKind::Zone, zone.to_ascii_uppercase())
                .with_link(zone_link(zone))
                .with_depth(depth),
        );
        sub
    }

    fn ip_literal_nameserver(
        &self,
        nameserver: &NameserverRef,
        current: &DomainParts,
        depth: usize,
    ) -> Graph {
        let mut node = Node::new(NodeKind::Nameserver, nameserver.name.clone())
            .with_depth(depth)
            .with_finding(Finding::NsIpLiteral, Finding::NsIpLiteral.message());
        node.zone = current.tld.clone();
        if let Some(domain) = &current.domain {
            node = node.with_domain(domain);
        }
        let mut sub = self.new_graph();
        sub.insert_node(node);
        sub
    }

    fn authoritative_nameserver(
        &self,
        nameserver: &NameserverRef,
        domain: &str,
        archive: bool,
        depth: usize,
    ) -> Graph {
        let mut node = Node::new(NodeKind::Nameserver, nameserver.name.clone())
            .with_depth(depth)
            .with_domain(domain);
        node.archive = archive;
        node.zone = split_domain(&nameserver.name).tld;
        node.link = Some(
            nameserver
                .link
                .clone()
                .unwrap_or_else(|| nameserver_link(&nameserver.name)),
        );
        let mut sub = self.new_graph();
        sub.insert_node(node);
        sub
    }

    async fn lookup_asns(&self, ip: &str) -> Result<Vec<String>, ResolveError> {
        let link = format!("asn:{}", ip);
        self.retry.run(&link, || self.asn.asns(ip)).await
    }
}

/// Same-domain means the nameserver's registrable domain is the record itself;
/// zone records never have same-domain nameservers.
fn plan(nameserver: &NameserverRef, record_name: &str) -> NameserverPlan {
    let parts = split_domain(&nameserver.name);
    match parts.domain {
        Some(domain) if domain.eq_ignore_ascii_case(record_name.trim_end_matches('.')) => {
            NameserverPlan::SameDomain {
                link: nameserver
                    .link
                    .clone()
                    .unwrap_or_else(|| nameserver_link(&nameserver.name)),
            }
        }
        Some(domain) => NameserverPlan::OtherDomain { domain },
        None => NameserverPlan::BareTld {
            link: zone_link(parts.tld.as_deref().unwrap_or_default()),
        },
    }
}

fn nameserver_findings(name: &str) -> Vec<Finding> {
    let mut findings = Vec::new();
    if is_wildcard(name) {
        findings.push(Finding::NsWildcard);
    }
    if is_bare_tld(name) {
        findings.push(Finding::NsBareTld);
    }
    findings
}

fn apply_findings(sub: &mut Graph, findings: &[Finding]) {
    let Some(root) = sub.root() else {
        return;
    };
    for &finding in findings {
        sub.record_finding(root, finding);
    }
}

/// Tags a resolved nameserver and its IPs with the nameserver's branch.
fn finish_nameserver(sub: &mut Graph, archive: bool, findings: &[Finding]) {
    let Some(root) = sub.root() else {
        return;
    };
    let domain = split_domain(&sub[root].name).domain;
    sub[root].archive |= archive;
    sub.assign_domain(root, domain.as_deref());
    let ips: Vec<NodeIndex> = sub[root]
        .children()
        .iter()
        .copied()
        .filter(|&child| sub[child].kind == NodeKind::Ip)
        .collect();
    for ip in ips {
        sub.assign_domain(ip, domain.as_deref());
    }
    apply_findings(sub, findings);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nameserver_findings() {
        assert_eq!(nameserver_findings("*.example.com"), vec![Finding::NsWildcard]);
        assert_eq!(nameserver_findings("io."), vec![Finding::NsBareTld]);
        assert!(nameserver_findings("ns1.example.com").is_empty());
    }

    #[test]
    fn test_finish_nameserver_joins_domain_branch() {
        let mut sub = Graph::new(GraphConfig::show_all());
        let ns = sub.insert_node(Node::new(NodeKind::Nameserver, "ns1.example.com").with_depth(1));
        let message = Finding::NoAsn.message_on("example.com", "203.0.113.2");
        let ip = sub.insert_node(
            Node::new(NodeKind::Ip, "203.0.113.2")
                .with_depth(2)
                .with_finding(Finding::NoAsn, message),
        );
        sub.connect(ns, ip).unwrap();

        finish_nameserver(&mut sub, true, &[Finding::NsWildcard]);

        assert!(sub[ns].archive);
        assert_eq!(sub[ns].domain.as_deref(), Some("EXAMPLE.COM"));
        assert_eq!(sub[ip].domain.as_deref(), Some("EXAMPLE.COM"));
        assert!(sub[ns].hazard, "IP hazard spreads to the nameserver");
        let branch = sub.branch("EXAMPLE.COM").unwrap();
        assert_eq!(branch.nodes, vec![ns, ip]);
        assert_eq!(
            branch.hazard_messages,
            vec!["example.com's IP 203.0.113.2 does not have an AS".to_string()]
        );
        assert_eq!(sub[ip].warnings, vec![Finding::NsWildcard.message().to_string()]);
    }
}

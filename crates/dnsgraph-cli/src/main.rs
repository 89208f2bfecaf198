use anyhow::{Context, Result};
use clap::Parser;
use dnsgraph_core::{GraphConfig, NodeKind};
use dnsgraph_resolve::{Resolver, SourceConfig};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Builds the DNS delegation graph of a domain", long_about = None)]
struct Args {
    /// Domain or URL to resolve
    domain: String,

    /// JSON file with `graph` and `source` sections
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Fetch zone records instead of using placeholders
    #[arg(long)]
    resolve_zones: bool,

    /// Include archived nameservers and IPs
    #[arg(long)]
    resolve_archive: bool,

    /// Node kinds to hide (replaces the configured set)
    #[arg(long, value_delimiter = ',')]
    hide: Option<Vec<NodeKind>>,

    /// Node kinds to group (replaces the configured set)
    #[arg(long, value_delimiter = ',')]
    accumulate: Option<Vec<NodeKind>>,

    /// Fail instead of drawing placeholders for unresolvable domains
    #[arg(long)]
    no_unmapped: bool,

    #[arg(long)]
    no_branch_colors: bool,

    /// DNS data API root
    #[arg(long)]
    base_url: Option<String>,

    /// Write the graph here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[arg(long)]
    pretty: bool,

    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    graph: GraphConfig,
    source: SourceConfig,
}

impl FileConfig {
    fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("Invalid config {}", path.display()))
    }

    fn apply(&mut self, args: &Args) {
        let graph = &mut self.graph;
        graph.resolve_zones |= args.resolve_zones;
        graph.resolve_archive |= args.resolve_archive;
        if let Some(hide) = &args.hide {
            graph.hide_nodes = hide.iter().copied().collect::<BTreeSet<_>>();
        }
        if let Some(accumulate) = &args.accumulate {
            graph.accumulation_nodes = accumulate.iter().copied().collect::<BTreeSet<_>>();
        }
        if args.no_unmapped {
            graph.show_unmapped_nodes = false;
        }
        if args.no_branch_colors {
            graph.match_branch_colors = false;
        }
        if let Some(base_url) = &args.base_url {
            self.source.base_url = base_url.clone();
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "dnsgraph=debug,info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let mut config = match &args.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    config.apply(&args);

    let resolver = Resolver::from_config(&config.source).context("Failed to set up upstream clients")?;
    let graph = resolver
        .resolve(&args.domain, config.graph)
        .await
        .with_context(|| format!("Failed to resolve {}", args.domain))?;

    let snapshot = graph.snapshot();
    info!(summary = %snapshot.overview, "graph ready");
    let json = if args.pretty {
        serde_json::to_string_pretty(&snapshot)?
    } else {
        serde_json::to_string(&snapshot)?
    };

    match &args.output {
        Some(path) => std::fs::write(path, json)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => println!("{}", json),
    }
    Ok(())
}

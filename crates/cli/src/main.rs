use anyhow::Context;
use clap::Parser;
use rootwalk_domain::{Candidate, CliOverrides, RecordType};
use rootwalk_infrastructure::dns::IterativeResolver;
use rootwalk_infrastructure::http::HttpProbe;
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

mod bootstrap;
mod output;

#[derive(Parser)]
#[command(name = "rootwalk")]
#[command(version)]
#[command(about = "Resolve a hostname by walking the DNS delegation chain from the root")]
struct Cli {
    /// Hostname to resolve
    hostname: String,

    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// Per-exchange receive timeout in milliseconds
    #[arg(short = 't', long, value_name = "MS")]
    timeout_ms: Option<u64>,

    /// Overall resolution deadline in milliseconds
    #[arg(long, value_name = "MS")]
    deadline_ms: Option<u64>,

    /// Destination port for every stage
    #[arg(short = 'p', long)]
    port: Option<u16>,

    /// Query type (A or AAAA)
    #[arg(long, value_name = "TYPE")]
    record_type: Option<RecordType>,

    /// Root server as NAME=IP; repeat to build the whole table
    #[arg(long = "root", value_name = "NAME=IP")]
    roots: Vec<Candidate>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Issue an HTTP GET to the first IPv4 answer
    #[arg(long)]
    fetch: bool,

    /// Write the fetched body to FILE
    #[arg(short = 'o', long, value_name = "FILE", requires = "fetch")]
    output: Option<PathBuf>,

    /// HTTP port for --fetch
    #[arg(long, default_value_t = 80)]
    http_port: u16,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        query_timeout_ms: cli.timeout_ms,
        deadline_ms: cli.deadline_ms,
        port: cli.port,
        record_type: cli.record_type,
        root_servers: (!cli.roots.is_empty()).then(|| cli.roots.clone()),
        log_level: cli.log_level.clone(),
        json_logs: cli.json_logs,
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;

    bootstrap::init_logging(&config.logging);

    info!(hostname = %cli.hostname, "Starting rootwalk v{}", env!("CARGO_PKG_VERSION"));

    let query_timeout = config.resolver.query_timeout();
    let resolver = IterativeResolver::new(config.resolver);

    let resolution = resolver
        .resolve(&cli.hostname)
        .await
        .map_err(|e| anyhow::anyhow!(output::failure_message(&e)))?;

    let fetch = if cli.fetch {
        let probe = HttpProbe::new(query_timeout)?.with_port(cli.http_port);
        let fetch = probe.fetch_first(&resolution).await?;
        if let Some(path) = &cli.output {
            std::fs::write(path, &fetch.body)
                .with_context(|| format!("Failed to write body to {}", path.display()))?;
            info!(path = %path.display(), bytes = fetch.body.len(), "Body written");
        }
        Some(fetch)
    } else {
        None
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if cli.json {
        let response = output::ResolutionResponse::from_resolution(&resolution, fetch.as_ref());
        serde_json::to_writer_pretty(&mut out, &response)?;
        writeln!(out)?;
    } else {
        output::write_report(&mut out, &resolution)?;
        if let Some(fetch) = &fetch {
            output::write_fetch(&mut out, fetch)?;
        }
    }

    Ok(())
}

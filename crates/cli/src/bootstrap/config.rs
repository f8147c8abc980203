use rootwalk_domain::{CliOverrides, Config};
use tracing::debug;

pub fn load_config(path: Option<&str>, overrides: CliOverrides) -> anyhow::Result<Config> {
    let config = Config::load(path, overrides)?;
    debug!(
        roots = config.resolver.root_servers.len(),
        port = config.resolver.port,
        record_type = %config.resolver.record_type,
        "Configuration loaded"
    );
    Ok(config)
}

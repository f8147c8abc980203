use serde::{Deserialize, Serialize};

use super::errors::ConfigError;
use super::logging::LoggingConfig;
use super::resolver::ResolverConfig;
use crate::dns_record::RecordType;
use crate::resolution::Candidate;

const LOCAL_CONFIG_FILE: &str = "rootwalk.toml";

/// Main configuration structure
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Resolution walk settings (timeouts, port, root table)
    #[serde(default)]
    pub resolver: ResolverConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. rootwalk.toml in current directory
    /// 3. Default configuration
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else if std::path::Path::new(LOCAL_CONFIG_FILE).exists() {
            Self::from_file(LOCAL_CONFIG_FILE)?
        } else {
            Self::default()
        };

        config.apply_cli_overrides(cli_overrides);
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Apply command-line overrides to configuration
    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(timeout) = overrides.query_timeout_ms {
            self.resolver.query_timeout_ms = timeout;
        }
        if let Some(deadline) = overrides.deadline_ms {
            self.resolver.deadline_ms = Some(deadline);
        }
        if let Some(port) = overrides.port {
            self.resolver.port = port;
        }
        if let Some(record_type) = overrides.record_type {
            self.resolver.record_type = record_type;
        }
        if let Some(roots) = overrides.root_servers {
            self.resolver.root_servers = roots;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
        if overrides.json_logs {
            self.logging.json = true;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let resolver = &self.resolver;

        if resolver.query_timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "Query timeout cannot be 0".to_string(),
            ));
        }

        if resolver.port == 0 {
            return Err(ConfigError::Validation("Port cannot be 0".to_string()));
        }

        if resolver.root_servers.is_empty() {
            return Err(ConfigError::Validation(
                "No root servers configured".to_string(),
            ));
        }

        if let Some(root) = resolver.root_servers.iter().find(|c| !c.address.is_ipv4()) {
            return Err(ConfigError::Validation(format!(
                "Root server {} is not an IPv4 address",
                root
            )));
        }

        if !resolver.record_type.is_address() {
            return Err(ConfigError::Validation(format!(
                "Record type {} is not supported, use A or AAAA",
                resolver.record_type
            )));
        }

        if let Some(deadline) = resolver.deadline_ms {
            if deadline < resolver.query_timeout_ms {
                return Err(ConfigError::Validation(format!(
                    "Deadline ({}ms) is shorter than the query timeout ({}ms)",
                    deadline, resolver.query_timeout_ms
                )));
            }
        }

        Ok(())
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub query_timeout_ms: Option<u64>,
    pub deadline_ms: Option<u64>,
    pub port: Option<u16>,
    pub record_type: Option<RecordType>,
    pub root_servers: Option<Vec<Candidate>>,
    pub log_level: Option<String>,
    pub json_logs: bool,
}

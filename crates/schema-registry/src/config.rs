//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Configuration management for the schema registry host
//!
//! This module provides configuration structures, layered loading and
//! validation for listener resolution, metrics bridging and logging.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use crate::error::{ListenerResult, SchemaRegistryHostError, SchemaRegistryHostResult};
use crate::listeners::{
    parse_listeners, ListenerSet, ProtocolAliasTable, SupportedSchemes, HTTP, HTTPS,
};

/// Environment variable prefix
pub const ENV_PREFIX: &str = "SCHEMA_REGISTRY";

/// Schema registry host configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaRegistryHostConfig {
    /// Listener configuration
    pub listeners: ListenersConfig,

    /// Metrics bridge configuration
    pub metrics: MetricsConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Listener configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListenersConfig {
    /// Listener URIs, e.g. `http://0.0.0.0:8081`
    pub listeners: Vec<String>,

    /// Scheme alias to transport scheme, e.g. `internal = "https"`
    pub protocol_map: HashMap<String, String>,

    /// Deprecated single port, used only when `listeners` is empty
    pub port: u16,

    /// Scheme of the listener synthesized from `port`
    pub default_scheme: String,

    /// Transport schemes bound natively
    pub supported_schemes: Vec<String>,

    /// Scheme used for instance-to-instance calls; empty means plaintext
    pub inter_instance_protocol: String,

    /// Host name advertised to other instances
    pub host_name: String,
}

impl Default for ListenersConfig {
    fn default() -> Self {
        Self {
            listeners: Vec::new(),
            protocol_map: HashMap::new(),
            port: 8081,
            default_scheme: HTTP.to_string(),
            supported_schemes: vec![HTTP.to_string(), HTTPS.to_string()],
            inter_instance_protocol: String::new(),
            host_name: "localhost".to_string(),
        }
    }
}

impl ListenersConfig {
    /// Alias table with lower-cased keys
    pub fn alias_table(&self) -> ProtocolAliasTable {
        self.protocol_map.iter().collect()
    }

    pub fn supported_schemes(&self) -> SupportedSchemes {
        SupportedSchemes::new(self.supported_schemes.iter().cloned())
    }

    /// Resolve the configured listeners
    pub fn resolve(&self) -> ListenerResult<ListenerSet> {
        parse_listeners(
            &self.listeners,
            &self.alias_table(),
            self.port,
            &self.supported_schemes(),
            &self.default_scheme,
        )
    }
}

/// Metrics bridge configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Enable gauge publishing
    pub enabled: bool,

    /// Prefix for published gauge names
    pub prefix: String,

    /// Gauge publication interval in seconds
    pub publish_interval_secs: u64,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            prefix: "kafka.schema.registry".to_string(),
            publish_interval_secs: 15,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level
    pub log_level: String,

    /// Log format
    pub log_format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
        }
    }
}

/// Log format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogFormat {
    /// JSON format
    Json,

    /// Text format
    Text,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Json => write!(f, "json"),
            LogFormat::Text => write!(f, "text"),
        }
    }
}

/// Address this instance advertises to its peers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvertisedIdentity {
    pub host: String,
    pub scheme: String,
    pub port: u16,
}

impl fmt::Display for AdvertisedIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}:{}", self.scheme, self.host, self.port)
    }
}

/// `<PREFIX>__SECTION__KEY` variables; list keys take comma separated values
fn environment_source(prefix: &str) -> config::Environment {
    config::Environment::with_prefix(prefix)
        .separator("__")
        .list_separator(",")
        .with_list_parse_key("listeners.listeners")
        .with_list_parse_key("listeners.supported_schemes")
        .try_parsing(true)
}

impl SchemaRegistryHostConfig {
    /// Load configuration from file
    pub fn from_file(path: &PathBuf) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path.as_path()))
            .add_source(environment_source(ENV_PREFIX))
            .build()?;

        settings.try_deserialize().map_err(|e| match e {
            config::ConfigError::NotFound(key) => config::ConfigError::NotFound(format!(
                "{} (in config file: {})",
                key,
                path.display()
            )),
            config::ConfigError::FileParse { uri, cause } => config::ConfigError::FileParse {
                uri: Some(format!(
                    "{} (config file: {})",
                    uri.as_deref().unwrap_or("unknown"),
                    path.display()
                )),
                cause,
            },
            _ => e,
        })
    }

    /// Load configuration from multiple sources with precedence
    ///
    /// Defaults, then the file, then `<env_prefix>__SECTION__KEY` variables.
    pub fn from_sources(
        config_file: Option<&PathBuf>,
        env_prefix: &str,
    ) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder().add_source(config::File::from_str(
            &Self::generate_example(),
            config::FileFormat::Toml,
        ));

        if let Some(path) = config_file {
            builder = builder.add_source(config::File::from(path.as_path()));
        }

        builder = builder.add_source(environment_source(env_prefix));

        builder.build()?.try_deserialize()
    }

    /// Load configuration with defaults
    pub fn load_with_defaults() -> Result<Self, config::ConfigError> {
        let config_paths = [
            PathBuf::from("config/schema-registry-host.toml"),
            PathBuf::from("schema-registry-host.toml"),
            PathBuf::from("config/schema-registry-host.yaml"),
            PathBuf::from("schema-registry-host.yaml"),
            PathBuf::from("config/schema-registry-host.json"),
            PathBuf::from("schema-registry-host.json"),
        ];

        match config_paths.iter().find(|path| path.exists()) {
            Some(path) => Self::from_sources(Some(path), ENV_PREFIX),
            None => Self::from_sources(None, ENV_PREFIX),
        }
    }

    /// Generate example configuration
    pub fn generate_example() -> String {
        r#"# Schema Registry Host Configuration Example

[listeners]
# Listener URIs. Leave empty to bind the deprecated `port` on 0.0.0.0.
listeners = []
# Deprecated single port
port = 8081
default_scheme = "http"
supported_schemes = ["http", "https"]
# Scheme used for instance-to-instance calls (empty = http)
inter_instance_protocol = ""
host_name = "localhost"

# Alias schemes, e.g. internal://0.0.0.0:8082 bound as https
[listeners.protocol_map]

[metrics]
enabled = true
prefix = "kafka.schema.registry"
publish_interval_secs = 15

[logging]
log_level = "info"
log_format = "Text"  # Text, Json
"#
        .to_string()
    }

    /// Resolve the configured listeners
    pub fn resolve_listeners(&self) -> SchemaRegistryHostResult<ListenerSet> {
        Ok(self.listeners.resolve()?)
    }

    /// Host, scheme and port other instances should use to reach this one
    pub fn advertised_identity(&self) -> SchemaRegistryHostResult<AdvertisedIdentity> {
        let listeners = self.resolve_listeners()?;
        let found = listeners.scheme_and_port(&self.listeners.inter_instance_protocol)?;
        Ok(AdvertisedIdentity {
            host: self.listeners.host_name.clone(),
            scheme: found.scheme,
            port: found.port,
        })
    }

    /// Validate configuration with detailed error reporting
    pub fn validate(&self) -> SchemaRegistryHostResult<()> {
        let mut errors = Vec::new();

        self.validate_listeners(&mut errors);
        self.validate_metrics(&mut errors);
        self.validate_logging(&mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SchemaRegistryHostError::config_with_details(
                &format!("validation failed with {} error(s)", errors.len()),
                errors.join("\n"),
            ))
        }
    }

    fn validate_listeners(&self, errors: &mut Vec<String>) {
        let listeners = &self.listeners;

        if listeners.supported_schemes.is_empty() {
            errors.push("listeners.supported_schemes: cannot be empty".to_string());
        }

        if listeners.listeners.is_empty() && listeners.port == 0 {
            errors.push(
                "listeners.port: must be greater than 0 when no listeners are configured"
                    .to_string(),
            );
        }

        if !listeners.supported_schemes.contains(&listeners.default_scheme) {
            errors.push(format!(
                "listeners.default_scheme: '{}' is not a supported scheme",
                listeners.default_scheme
            ));
        }

        for (alias, protocol) in &listeners.protocol_map {
            if alias.is_empty() {
                errors.push("listeners.protocol_map: alias cannot be empty".to_string());
            }
            if !listeners.supported_schemes.contains(protocol) {
                errors.push(format!(
                    "listeners.protocol_map.{}: '{}' is not a supported scheme",
                    alias, protocol
                ));
            }
        }

        if listeners.host_name.is_empty() {
            errors.push("listeners.host_name: cannot be empty".to_string());
        }

        if let Err(e) = listeners.resolve() {
            errors.push(format!("listeners.listeners: {}", e));
        }
    }

    fn validate_metrics(&self, errors: &mut Vec<String>) {
        if self.metrics.enabled && self.metrics.publish_interval_secs == 0 {
            errors.push("metrics.publish_interval_secs: must be greater than 0".to_string());
        }
    }

    fn validate_logging(&self, errors: &mut Vec<String>) {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.log_level.to_lowercase().as_str()) {
            errors.push(format!(
                "logging.log_level: must be one of {}",
                valid_levels.join(", ")
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ListenerError;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = SchemaRegistryHostConfig::default();
        assert_eq!(config.listeners.port, 8081);
        assert!(config.listeners.listeners.is_empty());
        assert!(config.metrics.enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_config_falls_back_to_deprecated_port() {
        let listeners = SchemaRegistryHostConfig::default()
            .resolve_listeners()
            .unwrap();
        assert_eq!(listeners.len(), 1);
        assert_eq!(listeners.as_slice()[0].port(), 8081);
        assert_eq!(listeners.as_slice()[0].scheme(), "http");
    }

    #[test]
    fn test_config_validation() {
        let mut config = SchemaRegistryHostConfig::default();
        config.listeners.port = 0;
        assert!(config.validate().is_err());

        config.listeners.port = 8081;
        config.listeners.default_scheme = "ftp".to_string();
        assert!(config.validate().is_err());

        config.listeners.default_scheme = "http".to_string();
        config.logging.log_level = "loud".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_reports_every_problem() {
        let mut config = SchemaRegistryHostConfig::default();
        config
            .listeners
            .protocol_map
            .insert("internal".to_string(), "grpc".to_string());
        config.listeners.listeners = vec!["http://0.0.0.0".to_string()];
        config.metrics.publish_interval_secs = 0;

        let message = config.validate().unwrap_err().to_string();
        assert!(message.contains("3 error(s)"), "{}", message);
        assert!(message.contains("listeners.protocol_map.internal"));
        assert!(message.contains("must specify a port"));
        assert!(message.contains("metrics.publish_interval_secs"));
    }

    #[test]
    fn test_advertised_identity_uses_inter_instance_protocol() {
        let mut config = SchemaRegistryHostConfig::default();
        config.listeners.listeners = vec![
            "http://0.0.0.0:8081".to_string(),
            "internal://0.0.0.0:8082".to_string(),
        ];
        config
            .listeners
            .protocol_map
            .insert("Internal".to_string(), "https".to_string());
        config.listeners.host_name = "registry-0.registry".to_string();
        config.listeners.inter_instance_protocol = "https".to_string();

        let identity = config.advertised_identity().unwrap();
        assert_eq!(identity.port, 8082);
        assert_eq!(identity.to_string(), "https://registry-0.registry:8082");

        config.listeners.inter_instance_protocol = String::new();
        assert_eq!(config.advertised_identity().unwrap().port, 8081);
    }

    #[test]
    fn test_advertised_identity_without_matching_listener() {
        let mut config = SchemaRegistryHostConfig::default();
        config.listeners.inter_instance_protocol = "https".to_string();
        let err = config.advertised_identity().unwrap_err();
        assert!(matches!(
            err,
            SchemaRegistryHostError::Listener(ListenerError::NoMatchingListener { .. })
        ));
    }

    #[test]
    fn test_from_sources_reads_file_over_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[listeners]
listeners = ["http://0.0.0.0:8081", "internal://0.0.0.0:8082"]

[listeners.protocol_map]
internal = "https"

[metrics]
publish_interval_secs = 30
"#
        )
        .unwrap();

        let path = file.path().to_path_buf();
        let config =
            SchemaRegistryHostConfig::from_sources(Some(&path), "SCHEMA_REGISTRY_HOST_TEST")
                .unwrap();

        assert_eq!(config.metrics.publish_interval_secs, 30);
        assert_eq!(config.metrics.prefix, "kafka.schema.registry");
        assert_eq!(config.listeners.port, 8081);

        let listeners = config.resolve_listeners().unwrap();
        assert_eq!(
            listeners.by_name("internal").map(|l| l.scheme().to_string()),
            Some("https".to_string())
        );
    }

    #[test]
    fn test_environment_sets_listener_lists() {
        std::env::set_var(
            "SCHEMA_REGISTRY_HOST_ENV_TEST__LISTENERS__LISTENERS",
            "http://0.0.0.0:8081,internal://0.0.0.0:8082",
        );
        std::env::set_var(
            "SCHEMA_REGISTRY_HOST_ENV_TEST__LISTENERS__PROTOCOL_MAP__INTERNAL",
            "https",
        );
        std::env::set_var("SCHEMA_REGISTRY_HOST_ENV_TEST__LISTENERS__PORT", "9092");

        let config =
            SchemaRegistryHostConfig::from_sources(None, "SCHEMA_REGISTRY_HOST_ENV_TEST").unwrap();

        assert_eq!(
            config.listeners.listeners,
            vec![
                "http://0.0.0.0:8081".to_string(),
                "internal://0.0.0.0:8082".to_string()
            ]
        );
        assert_eq!(config.listeners.port, 9092);
        assert_eq!(config.listeners.supported_schemes, vec!["http", "https"]);

        let listeners = config.resolve_listeners().unwrap();
        assert_eq!(listeners.len(), 2);
        assert_eq!(listeners.by_name("internal").map(|l| l.port()), Some(8082));
    }

    #[test]
    fn test_environment_sets_single_supported_scheme() {
        std::env::set_var(
            "SCHEMA_REGISTRY_HOST_SCHEMES_TEST__LISTENERS__SUPPORTED_SCHEMES",
            "https",
        );
        let config =
            SchemaRegistryHostConfig::from_sources(None, "SCHEMA_REGISTRY_HOST_SCHEMES_TEST")
                .unwrap();
        assert_eq!(config.listeners.supported_schemes, vec!["https"]);
    }

    #[test]
    fn test_from_file_reports_missing_file() {
        let path = PathBuf::from("/nonexistent/schema-registry-host.toml");
        assert!(SchemaRegistryHostConfig::from_file(&path).is_err());
    }

    #[test]
    fn test_generated_example_matches_defaults() {
        let config = SchemaRegistryHostConfig::from_sources(None, "SCHEMA_REGISTRY_HOST_EXAMPLE")
            .unwrap();
        assert_eq!(config, SchemaRegistryHostConfig::default());
    }
}

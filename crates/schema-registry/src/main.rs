//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Schema registry host binary
//!
//! Operator tooling for inspecting how the host will bind and advertise
//! itself, and for managing its configuration file.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::error;

use schema_registry_host::{
    config::{LoggingConfig, ENV_PREFIX},
    logging::init_tracing,
    SchemaRegistryHostConfig, SCHEMA_REGISTRY_HOST_VERSION,
};

#[derive(Parser)]
#[command(name = "schema-registry-host")]
#[command(about = "Schema registry host listener and metrics tooling")]
#[command(version = SCHEMA_REGISTRY_HOST_VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Listener inspection
    Listeners {
        #[command(subcommand)]
        command: ListenerCommands,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ListenerCommands {
    /// Resolve the configured listeners
    Resolve {
        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format (text, json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Find the port bound for a scheme
    Lookup {
        /// Requested scheme; empty means http
        #[arg(short, long, default_value = "")]
        scheme: String,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Show the address advertised to other instances
    Identity {
        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Generate example configuration file
    Generate {
        /// Output file path
        #[arg(short, long, default_value = "schema-registry-host.toml")]
        output: PathBuf,

        /// Configuration format
        #[arg(long, default_value = "toml")]
        format: String,
    },

    /// Validate configuration file
    Validate {
        /// Configuration file path
        #[arg(short, long)]
        config: PathBuf,
    },

    /// Show current configuration
    Show {
        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn load_config(path: Option<&PathBuf>) -> Result<SchemaRegistryHostConfig> {
    let config = match path {
        Some(path) => SchemaRegistryHostConfig::from_sources(Some(path), ENV_PREFIX)?,
        None => SchemaRegistryHostConfig::load_with_defaults()?,
    };
    Ok(config)
}

/// Configuration a command runs with, including its logging section
fn command_config(command: &Commands) -> Result<SchemaRegistryHostConfig> {
    match command {
        Commands::Listeners { command } => match command {
            ListenerCommands::Resolve { config, .. }
            | ListenerCommands::Lookup { config, .. }
            | ListenerCommands::Identity { config } => load_config(config.as_ref()),
        },
        Commands::Config { command } => match command {
            ConfigCommands::Generate { .. } => Ok(SchemaRegistryHostConfig::default()),
            ConfigCommands::Validate { config } => {
                Ok(SchemaRegistryHostConfig::from_file(config)?)
            }
            ConfigCommands::Show { config } => load_config(config.as_ref()),
        },
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match command_config(&cli.command) {
        Ok(config) => config,
        Err(e) => {
            init_tracing(&LoggingConfig::default())?;
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };
    init_tracing(&config.logging)?;

    match cli.command {
        Commands::Listeners { command } => match command {
            ListenerCommands::Resolve { format, .. } => {
                let listeners = match config.resolve_listeners() {
                    Ok(listeners) => listeners,
                    Err(e) => {
                        error!("Failed to resolve listeners: {}", e);
                        std::process::exit(1);
                    }
                };

                match format.as_str() {
                    "json" => println!("{}", serde_json::to_string_pretty(listeners.as_slice())?),
                    "text" => {
                        for listener in &listeners {
                            println!("{}", listener);
                        }
                    }
                    _ => {
                        error!("Unsupported format: {}", format);
                        std::process::exit(1);
                    }
                }
            }

            ListenerCommands::Lookup { scheme, .. } => {
                match config
                    .resolve_listeners()
                    .map_err(anyhow::Error::from)
                    .and_then(|listeners| Ok(listeners.scheme_and_port(&scheme)?))
                {
                    Ok(found) => println!("{}", found),
                    Err(e) => {
                        error!("{}", e);
                        std::process::exit(1);
                    }
                }
            }

            ListenerCommands::Identity { .. } => match config.advertised_identity() {
                Ok(identity) => println!("{}", identity),
                Err(e) => {
                    error!("{}", e);
                    std::process::exit(1);
                }
            },
        },

        Commands::Config { command } => match command {
            ConfigCommands::Generate { output, format } => {
                let content = match format.as_str() {
                    "toml" => SchemaRegistryHostConfig::generate_example(),
                    "yaml" | "yml" => serde_yaml::to_string(&SchemaRegistryHostConfig::default())?,
                    "json" => serde_json::to_string_pretty(&SchemaRegistryHostConfig::default())?,
                    _ => {
                        error!("Unsupported format: {}", format);
                        std::process::exit(1);
                    }
                };

                std::fs::write(&output, content)?;
                println!("Configuration file generated: {}", output.display());
            }

            ConfigCommands::Validate { .. } => {
                if let Err(e) = config.validate() {
                    error!("Configuration validation failed");
                    eprintln!("{}", e);
                    std::process::exit(1);
                }

                println!("Configuration validation passed");
                if let Ok(listeners) = config.resolve_listeners() {
                    for listener in &listeners {
                        println!("  Listener: {}", listener);
                    }
                }
                println!("  Metrics: {}", config.metrics.enabled);
                println!("  Log Level: {}", config.logging.log_level);
            }

            ConfigCommands::Show { .. } => {
                println!("{}", serde_json::to_string_pretty(&config)?);
            }
        },
    }

    Ok(())
}

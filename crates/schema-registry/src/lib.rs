//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Schema registry host
//!
//! Runtime support for embedding a schema registry engine: resolving the
//! configured listeners into validated bindings, answering which scheme and
//! port to advertise to peers, and bridging the engine's metrics into the
//! `metrics` facade.

pub mod config;
pub mod error;
pub mod listeners;
pub mod logging;
pub mod metrics;

// Re-export main types
pub use crate::config::{AdvertisedIdentity, SchemaRegistryHostConfig};
pub use crate::error::{
    ListenerError, ListenerResult, MetricsBridgeError, SchemaRegistryHostError,
    SchemaRegistryHostResult,
};
pub use crate::listeners::{
    parse_listeners, scheme_and_port, ListenerSet, ProtocolAliasTable, ResolvedListener,
    SchemeAndPort, SupportedSchemes,
};
pub use crate::metrics::{GaugeBridge, GaugePublisher, MetricsReporter, ObservedMetric};

/// Schema registry host version
pub const SCHEMA_REGISTRY_HOST_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Schema registry host name
pub const SCHEMA_REGISTRY_HOST_NAME: &str = "schema-registry-host";

/// Schema registry host bootstrap
///
/// Holds what the embedding process needs once configuration is resolved.
pub struct SchemaRegistryHost {
    /// Configuration
    config: SchemaRegistryHostConfig,
    /// Resolved listeners
    listeners: ListenerSet,
    /// Reporter handed to the registry engine
    reporter: std::sync::Arc<crate::metrics::RecorderBridge>,
    /// Gauge publisher
    publisher: GaugePublisher,
}

impl SchemaRegistryHost {
    /// Validate configuration, resolve listeners and build the metrics bridge
    pub fn new(config: SchemaRegistryHostConfig) -> SchemaRegistryHostResult<Self> {
        config.validate()?;
        let listeners = config.resolve_listeners()?;

        let collector = crate::metrics::MetricsCollector::new(SCHEMA_REGISTRY_HOST_NAME.to_string());
        collector.record_listeners(&listeners);
        let (reporter, publisher) = crate::metrics::recorder_bridge(&config.metrics, collector);

        for listener in &listeners {
            tracing::info!(listener = %listener, "Configured listener");
        }

        Ok(Self {
            config,
            listeners,
            reporter,
            publisher,
        })
    }

    /// Start background publication of bridged gauges
    pub fn start(&mut self) {
        self.publisher.start();
    }

    pub fn config(&self) -> &SchemaRegistryHostConfig {
        &self.config
    }

    pub fn listeners(&self) -> &ListenerSet {
        &self.listeners
    }

    /// Reporter to install into the registry engine
    pub fn reporter(&self) -> std::sync::Arc<dyn MetricsReporter> {
        self.reporter.clone()
    }

    /// Scheme and port for instance-to-instance calls
    pub fn inter_instance_scheme_and_port(&self) -> ListenerResult<SchemeAndPort> {
        self.listeners
            .scheme_and_port(&self.config.listeners.inter_instance_protocol)
    }

    /// Shutdown the host
    pub async fn shutdown(mut self) -> SchemaRegistryHostResult<()> {
        self.reporter.close();
        self.publisher.shutdown().await;

        tracing::info!("Schema registry host shutdown completed");

        Ok(())
    }
}

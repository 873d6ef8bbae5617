//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Self metrics for the schema registry host

use metrics::{counter, gauge};

use crate::listeners::ListenerSet;

/// Metrics collector for host-level events
#[derive(Debug, Clone)]
pub struct MetricsCollector {
    /// Registry name for metrics
    registry_name: String,
}

impl MetricsCollector {
    /// Create a new metrics collector
    pub fn new(registry_name: String) -> Self {
        Self { registry_name }
    }

    pub fn registry_name(&self) -> &str {
        &self.registry_name
    }

    /// Record a gauge bridged from the engine
    pub fn record_gauge_registered(&self) {
        counter!("schema_registry_host.bridge.gauges.registered", 1,
            "registry" => self.registry_name.clone()
        );
    }

    /// Record a bridged gauge being retracted
    pub fn record_gauge_removed(&self) {
        counter!("schema_registry_host.bridge.gauges.removed", 1,
            "registry" => self.registry_name.clone()
        );
    }

    /// Record a registration the sink refused
    pub fn record_registration_failure(&self) {
        counter!("schema_registry_host.bridge.gauges.registration_failed", 1,
            "registry" => self.registry_name.clone()
        );
    }

    /// Record the resolved listener layout
    pub fn record_listeners(&self, listeners: &ListenerSet) {
        gauge!("schema_registry_host.listeners.total", listeners.len() as f64,
            "registry" => self.registry_name.clone()
        );
        gauge!("schema_registry_host.listeners.named", listeners.named().count() as f64,
            "registry" => self.registry_name.clone()
        );
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new("schema-registry".to_string())
    }
}

//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Metric lifecycle notifications from the embedded registry engine
//!
//! The engine owns its metrics and tells registered reporters when they are
//! created, updated or removed. Callbacks may arrive from the engine's own
//! background threads.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use crate::error::MetricsBridgeError;

/// Identity of an engine metric
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MetricName {
    name: String,
    group: String,
    description: String,
    tags: BTreeMap<String, String>,
}

impl MetricName {
    pub fn new(name: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            group: group.into(),
            description: String::new(),
            tags: BTreeMap::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn tags(&self) -> &BTreeMap<String, String> {
        &self.tags
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group, self.name)?;
        if !self.tags.is_empty() {
            let tags: Vec<String> = self
                .tags
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            write!(f, "{{{}}}", tags.join(","))?;
        }
        Ok(())
    }
}

/// Current value of an engine metric
#[derive(Debug, Clone, PartialEq)]
pub enum MetricValue {
    Double(f64),
    Long(i64),
    Text(String),
    Missing,
}

impl MetricValue {
    /// Value reported to gauges; anything but a double reads as `0.0`
    pub fn as_gauge_value(&self) -> f64 {
        match self {
            MetricValue::Double(value) => *value,
            _ => 0.0,
        }
    }
}

impl From<f64> for MetricValue {
    fn from(value: f64) -> Self {
        MetricValue::Double(value)
    }
}

/// Source of a metric's current value
pub trait Measurable: Send + Sync {
    fn metric_value(&self) -> MetricValue;
}

impl<F> Measurable for F
where
    F: Fn() -> MetricValue + Send + Sync,
{
    fn metric_value(&self) -> MetricValue {
        self()
    }
}

/// An engine metric as delivered to reporters
#[derive(Clone)]
pub struct ObservedMetric {
    name: MetricName,
    source: Arc<dyn Measurable>,
}

impl ObservedMetric {
    pub fn new(name: MetricName, source: impl Measurable + 'static) -> Self {
        Self {
            name,
            source: Arc::new(source),
        }
    }

    /// Metric that always reports `value`
    pub fn constant(name: MetricName, value: MetricValue) -> Self {
        Self::new(name, move || value.clone())
    }

    pub fn metric_name(&self) -> &MetricName {
        &self.name
    }

    pub fn metric_value(&self) -> MetricValue {
        self.source.metric_value()
    }
}

impl fmt::Debug for ObservedMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservedMetric")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Labels describing the process the metrics belong to
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricsContext {
    pub labels: BTreeMap<String, String>,
}

/// Receiver of metric lifecycle notifications
///
/// Implementations must not panic or block for long: they run on the
/// engine's reporting threads.
pub trait MetricsReporter: Send + Sync {
    /// Reporter settings handed over by the engine
    fn configure(&self, _configs: &HashMap<String, String>) {}

    /// Metrics that already exist when the reporter is installed
    fn init(&self, metrics: &[ObservedMetric]);

    /// A metric was created or replaced
    fn metric_change(&self, metric: &ObservedMetric);

    /// A metric was removed
    fn metric_removal(&self, metric: &ObservedMetric);

    fn reconfigurable_configs(&self) -> HashSet<String> {
        HashSet::new()
    }

    fn validate_reconfiguration(
        &self,
        _configs: &HashMap<String, String>,
    ) -> Result<(), MetricsBridgeError> {
        Ok(())
    }

    fn reconfigure(&self, _configs: &HashMap<String, String>) {}

    fn context_change(&self, _context: &MetricsContext) {}

    /// Release resources; no notifications are acted on afterwards
    fn close(&self);
}

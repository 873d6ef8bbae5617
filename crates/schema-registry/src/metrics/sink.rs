//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Gauge sinks
//!
//! A sink owns externally visible gauges. Each gauge is bound to a reader
//! that the sink calls whenever it wants the current value.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use metrics::{register_gauge, Gauge, Label};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use super::reporter::MetricName;
use crate::error::MetricsBridgeError;

/// Reads the current value of a gauge
pub type GaugeReader = Arc<dyn Fn() -> f64 + Send + Sync>;

/// Gauge identity: metric name plus its full tag set
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GaugeKey {
    name: String,
    tags: BTreeMap<String, String>,
}

impl GaugeKey {
    pub fn new(name: impl Into<String>, tags: BTreeMap<String, String>) -> Self {
        Self {
            name: name.into(),
            tags,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tags(&self) -> &BTreeMap<String, String> {
        &self.tags
    }
}

impl From<&MetricName> for GaugeKey {
    fn from(name: &MetricName) -> Self {
        Self::new(name.name(), name.tags().clone())
    }
}

impl fmt::Display for GaugeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
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

/// Destination for pull-style gauges
pub trait GaugeSink: Send + Sync {
    /// Register a gauge; registering an existing key is an error
    fn register_gauge(&self, key: &GaugeKey, reader: GaugeReader) -> Result<(), MetricsBridgeError>;

    /// Remove a gauge; unknown keys are ignored
    fn deregister_gauge(&self, key: &GaugeKey);
}

impl<T: GaugeSink + ?Sized> GaugeSink for Arc<T> {
    fn register_gauge(&self, key: &GaugeKey, reader: GaugeReader) -> Result<(), MetricsBridgeError> {
        (**self).register_gauge(key, reader)
    }

    fn deregister_gauge(&self, key: &GaugeKey) {
        (**self).deregister_gauge(key)
    }
}

/// Sink that keeps gauges in process and reads them on request
#[derive(Default)]
pub struct InMemoryGaugeSink {
    gauges: DashMap<GaugeKey, GaugeReader>,
}

impl InMemoryGaugeSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value of a gauge
    pub fn read(&self, key: &GaugeKey) -> Option<f64> {
        self.gauges.get(key).map(|reader| (reader.value())())
    }

    /// Every gauge with its current value
    pub fn snapshot(&self) -> BTreeMap<GaugeKey, f64> {
        self.gauges
            .iter()
            .map(|entry| (entry.key().clone(), (entry.value())()))
            .collect()
    }

    pub fn contains(&self, key: &GaugeKey) -> bool {
        self.gauges.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.gauges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gauges.is_empty()
    }
}

impl GaugeSink for InMemoryGaugeSink {
    fn register_gauge(&self, key: &GaugeKey, reader: GaugeReader) -> Result<(), MetricsBridgeError> {
        match self.gauges.entry(key.clone()) {
            Entry::Occupied(_) => Err(MetricsBridgeError::registration(
                &key.to_string(),
                "gauge already registered",
            )),
            Entry::Vacant(entry) => {
                entry.insert(reader);
                Ok(())
            }
        }
    }

    fn deregister_gauge(&self, key: &GaugeKey) {
        self.gauges.remove(key);
    }
}

struct RecordedGauge {
    handle: Gauge,
    reader: GaugeReader,
}

/// Sink backed by the `metrics` facade
///
/// The facade is push based, so values are copied from the readers into the
/// installed recorder by [`RecorderGaugeSink::publish`], normally driven by a
/// [`super::publisher::GaugePublisher`]. The facade cannot retract a gauge:
/// a deregistered gauge keeps its last published value in the exporter.
pub struct RecorderGaugeSink {
    prefix: Option<String>,
    gauges: DashMap<GaugeKey, RecordedGauge>,
}

impl RecorderGaugeSink {
    pub fn new() -> Self {
        Self {
            prefix: None,
            gauges: DashMap::new(),
        }
    }

    /// Publish gauges as `<prefix>.<name>`
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        Self {
            prefix: (!prefix.is_empty()).then_some(prefix),
            gauges: DashMap::new(),
        }
    }

    /// Name the gauge is published under
    pub fn published_name(&self, key: &GaugeKey) -> String {
        match &self.prefix {
            Some(prefix) => format!("{}.{}", prefix, key.name()),
            None => key.name().to_string(),
        }
    }

    /// Copy every reader's current value into the recorder
    pub fn publish(&self) -> usize {
        let mut published = 0;
        for entry in self.gauges.iter() {
            entry.handle.set((entry.reader)());
            published += 1;
        }
        published
    }

    pub fn len(&self) -> usize {
        self.gauges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gauges.is_empty()
    }
}

impl Default for RecorderGaugeSink {
    fn default() -> Self {
        Self::new()
    }
}

impl GaugeSink for RecorderGaugeSink {
    fn register_gauge(&self, key: &GaugeKey, reader: GaugeReader) -> Result<(), MetricsBridgeError> {
        match self.gauges.entry(key.clone()) {
            Entry::Occupied(_) => Err(MetricsBridgeError::registration(
                &key.to_string(),
                "gauge already registered",
            )),
            Entry::Vacant(entry) => {
                let labels: Vec<Label> = key
                    .tags()
                    .iter()
                    .map(|(k, v)| Label::new(k.clone(), v.clone()))
                    .collect();
                let handle = register_gauge!(self.published_name(key), labels);
                handle.set(reader());
                entry.insert(RecordedGauge { handle, reader });
                Ok(())
            }
        }
    }

    fn deregister_gauge(&self, key: &GaugeKey) {
        self.gauges.remove(key);
    }
}

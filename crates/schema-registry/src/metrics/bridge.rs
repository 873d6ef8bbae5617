//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Bridge from engine metric notifications to a gauge sink
//!
//! One gauge exists per distinct metric name and tag set. The sink's reader
//! goes through a cell that every update rebinds, so a replaced metric
//! instance is picked up without touching the sink registration.
//!
//! Sink calls happen under a per-gauge lock only. The map's shard locks are
//! held just long enough to insert or rebind a slot, so registrations for
//! distinct gauges never wait on each other.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::collector::MetricsCollector;
use super::reporter::{MetricsReporter, ObservedMetric};
use super::sink::{GaugeKey, GaugeReader, GaugeSink};
use crate::error::MetricsBridgeError;

/// State for one bridged gauge
///
/// A slot that is in the map, not retired and whose registration lock is
/// free is registered with the sink.
struct GaugeSlot {
    metric: RwLock<ObservedMetric>,
    /// Held across every sink call for this gauge
    registration: Mutex<()>,
    /// Set once the slot's sink registration failed or was withdrawn
    retired: AtomicBool,
}

impl GaugeSlot {
    fn new(metric: ObservedMetric) -> Arc<Self> {
        Arc::new(Self {
            metric: RwLock::new(metric),
            registration: Mutex::new(()),
            retired: AtomicBool::new(false),
        })
    }

    fn rebind(&self, metric: &ObservedMetric) {
        *self.metric.write() = metric.clone();
    }

    fn value(&self) -> f64 {
        let current = self.metric.read().clone();
        current.metric_value().as_gauge_value()
    }

    fn is_retired(&self) -> bool {
        self.retired.load(Ordering::Acquire)
    }

    fn retire(&self) {
        self.retired.store(true, Ordering::Release);
    }
}

/// Forwards metric lifecycle notifications into a [`GaugeSink`]
pub struct GaugeBridge<S: GaugeSink> {
    sink: S,
    gauges: DashMap<GaugeKey, Arc<GaugeSlot>>,
    collector: MetricsCollector,
    /// Callbacks hold it shared for their whole run; close takes it exclusively
    closed: RwLock<bool>,
}

impl<S: GaugeSink> GaugeBridge<S> {
    pub fn new(sink: S) -> Self {
        Self::with_collector(sink, MetricsCollector::default())
    }

    pub fn with_collector(sink: S, collector: MetricsCollector) -> Self {
        Self {
            sink,
            gauges: DashMap::new(),
            collector,
            closed: RwLock::new(false),
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Register a gauge for a new metric, or rebind an existing one
    ///
    /// Returns `true` when a gauge was registered with the sink.
    pub fn on_metric_created_or_updated(
        &self,
        metric: &ObservedMetric,
    ) -> Result<bool, MetricsBridgeError> {
        let closed = self.closed.read();
        if *closed {
            return Err(MetricsBridgeError::Closed);
        }

        let key = GaugeKey::from(metric.metric_name());
        let slot = GaugeSlot::new(metric.clone());
        let registration = slot.registration.lock();

        match self.gauges.entry(key.clone()) {
            Entry::Occupied(entry) if !entry.get().is_retired() => {
                entry.get().rebind(metric);
                return Ok(false);
            }
            Entry::Occupied(mut entry) => {
                entry.insert(Arc::clone(&slot));
            }
            Entry::Vacant(entry) => {
                entry.insert(Arc::clone(&slot));
            }
        }

        let reader_slot = Arc::clone(&slot);
        let reader: GaugeReader = Arc::new(move || reader_slot.value());

        if let Err(e) = self.sink.register_gauge(&key, reader) {
            slot.retire();
            drop(registration);
            self.gauges
                .remove_if(&key, |_, current| Arc::ptr_eq(current, &slot));
            self.collector.record_registration_failure();
            return Err(e);
        }

        debug!(gauge = %key, "Registered gauge");
        self.collector.record_gauge_registered();
        Ok(true)
    }

    /// Retract the gauge for a removed metric
    ///
    /// Returns `true` when a gauge was deregistered.
    pub fn on_metric_removed(&self, metric: &ObservedMetric) -> bool {
        let closed = self.closed.read();
        if *closed {
            return false;
        }

        let key = GaugeKey::from(metric.metric_name());
        let slot = match self.gauges.get(&key) {
            Some(entry) => Arc::clone(entry.value()),
            None => return false,
        };

        let registration = slot.registration.lock();
        if slot.is_retired() {
            return false;
        }
        // The slot stays in the map until the sink has let go of the key, so
        // a concurrent create either rebinds it or replaces it once retired.
        self.sink.deregister_gauge(&key);
        slot.retire();
        drop(registration);

        self.gauges
            .remove_if(&key, |_, current| Arc::ptr_eq(current, &slot));
        self.collector.record_gauge_removed();
        debug!(gauge = %key, "Deregistered gauge");
        true
    }

    /// Value the sink would currently read for `key`
    pub fn current_value(&self, key: &GaugeKey) -> Option<f64> {
        let slot = self.gauges.get(key).map(|entry| Arc::clone(entry.value()))?;
        Some(slot.value())
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

    pub fn is_closed(&self) -> bool {
        *self.closed.read()
    }

    /// Stop acting on notifications and drop tracked metrics
    ///
    /// Waits for callbacks already in flight. Gauges already handed to the
    /// sink stay registered there.
    pub fn shutdown(&self) {
        let mut closed = self.closed.write();
        if *closed {
            return;
        }
        *closed = true;

        let tracked = self.gauges.len();
        self.gauges.clear();
        info!(tracked, "Metrics bridge closed");
    }

    fn record(&self, metric: &ObservedMetric) {
        match self.on_metric_created_or_updated(metric) {
            Ok(_) => {}
            Err(MetricsBridgeError::Closed) => {
                debug!(metric = %metric.metric_name(), "Ignoring metric update after close");
            }
            Err(e) => {
                warn!(metric = %metric.metric_name(), error = %e, "Skipping gauge registration");
            }
        }
    }
}

impl<S: GaugeSink> MetricsReporter for GaugeBridge<S> {
    fn init(&self, metrics: &[ObservedMetric]) {
        for metric in metrics {
            self.record(metric);
        }
    }

    fn metric_change(&self, metric: &ObservedMetric) {
        self.record(metric);
    }

    fn metric_removal(&self, metric: &ObservedMetric) {
        self.on_metric_removed(metric);
    }

    fn close(&self) {
        self.shutdown();
    }
}

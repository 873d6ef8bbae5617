//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Metrics for the schema registry host
//!
//! The embedded registry engine reports its own metrics through the
//! [`MetricsReporter`] contract. [`GaugeBridge`] turns those notifications
//! into gauges on a [`GaugeSink`], and [`GaugePublisher`] pushes the gauges
//! of a [`RecorderGaugeSink`] into the `metrics` facade.

pub mod bridge;
pub mod collector;
pub mod publisher;
pub mod reporter;
pub mod sink;

use std::sync::Arc;

pub use bridge::GaugeBridge;
pub use collector::MetricsCollector;
pub use publisher::GaugePublisher;
pub use reporter::{
    Measurable, MetricName, MetricValue, MetricsContext, MetricsReporter, ObservedMetric,
};
pub use sink::{GaugeKey, GaugeReader, GaugeSink, InMemoryGaugeSink, RecorderGaugeSink};

use crate::config::MetricsConfig;

/// Bridge wired to the `metrics` facade
pub type RecorderBridge = GaugeBridge<Arc<RecorderGaugeSink>>;

/// Build a bridge publishing into the `metrics` facade, plus its publisher
///
/// The bridge is handed to the registry engine as its reporter; the
/// publisher still has to be started inside a Tokio runtime.
pub fn recorder_bridge(
    config: &MetricsConfig,
    collector: MetricsCollector,
) -> (Arc<RecorderBridge>, GaugePublisher) {
    let sink = Arc::new(RecorderGaugeSink::with_prefix(config.prefix.clone()));
    let bridge = Arc::new(GaugeBridge::with_collector(Arc::clone(&sink), collector));
    let publisher = GaugePublisher::new(config.clone(), sink);
    (bridge, publisher)
}

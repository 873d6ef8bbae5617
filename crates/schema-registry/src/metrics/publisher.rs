//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Periodic publication of bridged gauges

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use super::sink::RecorderGaugeSink;
use crate::config::MetricsConfig;

/// Copies gauge readers into the `metrics` recorder on a fixed interval
pub struct GaugePublisher {
    /// Configuration
    config: MetricsConfig,

    /// Sink whose gauges are published
    sink: Arc<RecorderGaugeSink>,

    /// Background task handle
    task_handle: Option<JoinHandle<()>>,
}

impl GaugePublisher {
    /// Create a new publisher
    pub fn new(config: MetricsConfig, sink: Arc<RecorderGaugeSink>) -> Self {
        Self {
            config,
            sink,
            task_handle: None,
        }
    }

    /// Start publishing; must be called within a Tokio runtime
    pub fn start(&mut self) {
        if !self.config.enabled {
            info!("Gauge publishing is disabled");
            return;
        }
        if self.task_handle.is_some() {
            return;
        }

        let sink = Arc::clone(&self.sink);
        let period = self.interval();

        let handle = tokio::spawn(async move {
            let mut interval_timer = tokio::time::interval(period);
            interval_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                interval_timer.tick().await;
                let published = sink.publish();
                debug!(published, "Published bridged gauges");
            }
        });

        info!(interval_secs = period.as_secs(), "Gauge publisher started");
        self.task_handle = Some(handle);
    }

    /// Stop publishing, after one final publication
    pub async fn shutdown(&mut self) {
        if let Some(handle) = self.task_handle.take() {
            handle.abort();
            let _ = handle.await;
            self.sink.publish();
        }

        debug!("Gauge publisher shutdown completed");
    }

    pub fn is_running(&self) -> bool {
        self.task_handle
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }

    /// Publication interval
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.config.publish_interval_secs.max(1))
    }

    pub fn sink(&self) -> &Arc<RecorderGaugeSink> {
        &self.sink
    }
}

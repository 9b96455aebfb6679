//! Metrics source
//!
//! Resolves the metrics panel: derived from the current detection result when it
//! carries statistics, otherwise fetched from the service's metrics endpoint. Re-runs
//! only when the result's statistics or the refresh signal change.
//!
//! A failed fetch degrades to empty metrics (every field absent) and is never
//! surfaced as an error.

use crate::models::{DetectionStatistics, ModelMetrics, NormalizedResult};
use crate::services::transport::MetricsFetcher;
use chrono::Utc;
use railwatch_common::events::{EventBus, SessionEvent};
use std::sync::Arc;

/// What the metrics panel shows
#[derive(Debug, Clone, PartialEq)]
pub enum MetricsState {
    /// Independent fetch outstanding
    Loading,
    Ready(ModelMetrics),
}

#[derive(Debug, Clone, PartialEq)]
struct ResolveInputs {
    statistics: Option<DetectionStatistics>,
    refresh_signal: u64,
}

pub struct MetricsSource {
    fetcher: Arc<dyn MetricsFetcher>,
    event_bus: EventBus,
    state: MetricsState,
    last_inputs: Option<ResolveInputs>,
}

impl MetricsSource {
    pub fn new(fetcher: Arc<dyn MetricsFetcher>, event_bus: EventBus) -> Self {
        Self {
            fetcher,
            event_bus,
            state: MetricsState::Ready(ModelMetrics::default()),
            last_inputs: None,
        }
    }

    pub fn state(&self) -> &MetricsState {
        &self.state
    }

    /// Resolved metrics, or `None` while loading
    pub fn metrics(&self) -> Option<&ModelMetrics> {
        match &self.state {
            MetricsState::Ready(metrics) => Some(metrics),
            MetricsState::Loading => None,
        }
    }

    /// Re-resolve for the given inputs; a no-op when neither changed
    pub async fn resolve(
        &mut self,
        current: Option<&NormalizedResult>,
        refresh_signal: u64,
    ) -> &MetricsState {
        let inputs = ResolveInputs {
            statistics: current.and_then(|r| r.statistics.clone()),
            refresh_signal,
        };
        if self.last_inputs.as_ref() == Some(&inputs) {
            return &self.state;
        }

        match current.and_then(|r| r.statistics.as_ref()) {
            Some(statistics) => {
                self.state = MetricsState::Ready(ModelMetrics::from_statistics(statistics));
                tracing::debug!(refresh_signal, "Metrics derived from detection result");
                self.event_bus.emit_lossy(SessionEvent::MetricsResolved {
                    fetched: false,
                    timestamp: Utc::now(),
                });
            }
            None => {
                self.state = MetricsState::Loading;
                self.event_bus.emit_lossy(SessionEvent::MetricsLoading {
                    timestamp: Utc::now(),
                });

                let metrics = match self.fetcher.fetch_metrics().await {
                    Ok(metrics) => {
                        tracing::debug!(refresh_signal, "Metrics fetched from service");
                        metrics
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Metrics fetch failed, showing placeholders");
                        ModelMetrics::default()
                    }
                };
                self.state = MetricsState::Ready(metrics);
                self.event_bus.emit_lossy(SessionEvent::MetricsResolved {
                    fetched: true,
                    timestamp: Utc::now(),
                });
            }
        }

        // Recorded after completion so an abandoned fetch is retried next time
        self.last_inputs = Some(inputs);
        &self.state
    }
}

// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Metrics instrumentation for solr-bridge.
//!
//! Uses the `metrics` crate for backend-agnostic collection; the embedding
//! application chooses the exporter (Prometheus, OTEL, etc.)
//!
//! # Metric Naming Convention
//! - `solr_bridge_` prefix for all metrics
//! - `_total` suffix for counters
//! - `_seconds` suffix for duration histograms
//!
//! # Labels
//! - `stage`: compile, execute, map
//! - `outcome`: success, or an error label from [`SolrError::outcome_label`](crate::SolrError::outcome_label)

use metrics::{counter, histogram};
use std::time::{Duration, Instant};

/// Record a completed search request by outcome.
pub fn record_query(outcome: &str) {
    counter!(
        "solr_bridge_queries_total",
        "outcome" => outcome.to_string()
    )
    .increment(1);
}

/// Record per-stage latency (compile, execute, map).
pub fn record_stage_latency(stage: &str, duration: Duration) {
    histogram!(
        "solr_bridge_stage_seconds",
        "stage" => stage.to_string()
    )
    .record(duration.as_secs_f64());
}

/// Record how many hits a query found (`numFound`, not the page size).
pub fn record_result_count(count: u64) {
    histogram!("solr_bridge_results").record(count as f64);
}

/// Record how many filter clauses a compiled query carried.
pub fn record_filter_clauses(count: usize) {
    histogram!("solr_bridge_filter_clauses").record(count as f64);
}

/// A timing guard that records stage latency on drop.
pub struct StageTimer {
    stage: &'static str,
    start: Instant,
}

impl StageTimer {
    pub fn new(stage: &'static str) -> Self {
        Self {
            stage,
            start: Instant::now(),
        }
    }
}

impl Drop for StageTimer {
    fn drop(&mut self) {
        record_stage_latency(self.stage, self.start.elapsed());
    }
}

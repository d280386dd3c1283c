//! Prometheus registration for the ingestion/worker/dashboard observability
//! surface. Exporting `render()` over HTTP is the transport layer's job;
//! this module only owns registration and recording.

use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};
use std::time::Instant;

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,

    // Counters
    pub events_ingested_total: IntCounterVec,
    pub worker_failures_total: IntCounterVec,

    // Histograms
    pub ingest_latency_seconds: HistogramVec,
    pub worker_processing_latency_seconds: HistogramVec,
    pub dashboard_query_latency_seconds: HistogramVec,
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let events_ingested_total = IntCounterVec::new(
            Opts::new("events_ingested_total", "Total events accepted at ingest"),
            &["type", "status"], // status: ok|validation_error|error
        )
        .expect("metric");

        let worker_failures_total = IntCounterVec::new(
            Opts::new("worker_failures_total", "Total worker processing failures"),
            &["type"],
        )
        .expect("metric");

        let ingest_latency_seconds = HistogramVec::new(
            HistogramOpts::new("ingest_latency_seconds", "Ingest call duration seconds"),
            &["status"],
        )
        .expect("metric");

        let worker_processing_latency_seconds = HistogramVec::new(
            HistogramOpts::new(
                "worker_processing_latency_seconds",
                "Worker processing duration seconds",
            ),
            &["type"],
        )
        .expect("metric");

        let dashboard_query_latency_seconds = HistogramVec::new(
            HistogramOpts::new(
                "dashboard_query_latency_seconds",
                "Dashboard query duration seconds",
            ),
            &["endpoint"],
        )
        .expect("metric");

        registry
            .register(Box::new(events_ingested_total.clone()))
            .unwrap();
        registry
            .register(Box::new(worker_failures_total.clone()))
            .unwrap();
        registry
            .register(Box::new(ingest_latency_seconds.clone()))
            .unwrap();
        registry
            .register(Box::new(worker_processing_latency_seconds.clone()))
            .unwrap();
        registry
            .register(Box::new(dashboard_query_latency_seconds.clone()))
            .unwrap();

        Self {
            registry,
            events_ingested_total,
            worker_failures_total,
            ingest_latency_seconds,
            worker_processing_latency_seconds,
            dashboard_query_latency_seconds,
        }
    }

    pub fn render(&self) -> Result<String, String> {
        let encoder = TextEncoder::new();
        let mf = self.registry.gather();
        let mut buf = Vec::new();
        encoder.encode(&mf, &mut buf).map_err(|e| e.to_string())?;
        String::from_utf8(buf).map_err(|e| e.to_string())
    }

    pub fn timer() -> Instant {
        Instant::now()
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

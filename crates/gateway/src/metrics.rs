use opentelemetry::{
    KeyValue, global,
    metrics::{Counter, Histogram},
};
use std::time::Duration;

const METER_NAME: &str = "classifier-gateway";

/// Request metrics. Recording is a no-op until a meter provider is installed.
#[derive(Clone)]
pub struct ClassifierMetrics {
    duration: Histogram<f64>,
    requests: Counter<u64>,
    failures: Counter<u64>,
}

impl ClassifierMetrics {
    pub fn new() -> Self {
        let meter = global::meter(METER_NAME);
        let latency_buckets = [
            0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 0.75, 1.0, 1.5, 2.0, 3.0, 5.0, 10.0,
        ];

        Self {
            duration: meter
                .f64_histogram("classification_duration_seconds")
                .with_description("Time to classify one upload with every available model")
                .with_unit("s")
                .with_boundaries(latency_buckets.to_vec())
                .build(),
            requests: meter
                .u64_counter("classification_requests_total")
                .with_description("Total classification requests")
                .build(),
            failures: meter
                .u64_counter("classification_failures_total")
                .with_description("Classification requests that failed")
                .build(),
        }
    }

    pub fn record_request(&self) {
        self.requests.add(1, &[]);
    }

    pub fn record_success(&self, elapsed: Duration, models: usize) {
        self.duration.record(
            elapsed.as_secs_f64(),
            &[KeyValue::new("models", models as i64)],
        );
    }

    pub fn record_failure(&self, stage: &'static str) {
        self.failures.add(1, &[KeyValue::new("stage", stage)]);
    }
}

impl Default for ClassifierMetrics {
    fn default() -> Self {
        Self::new()
    }
}

//! Relay counters.
//!
//! Backed by OpenTelemetry instruments with the `metrics` feature; every
//! method is a no-op without it.

use bedrock_relay_models::RequestVariant;
use bedrock_relay_stream::RelaySummary;
use std::time::Duration;

#[cfg(feature = "metrics")]
use opentelemetry::{
    KeyValue, global,
    metrics::{Counter, Histogram},
};

/// Per-request relay metrics, labelled by request variant.
#[derive(Clone)]
pub struct RelayMetrics {
    #[cfg(feature = "metrics")]
    requests: Counter<u64>,
    #[cfg(feature = "metrics")]
    fragments: Counter<u64>,
    #[cfg(feature = "metrics")]
    bytes: Counter<u64>,
    #[cfg(feature = "metrics")]
    upstream_errors: Counter<u64>,
    #[cfg(feature = "metrics")]
    skipped_chunks: Counter<u64>,
    #[cfg(feature = "metrics")]
    duration: Histogram<f64>,
}

impl std::fmt::Debug for RelayMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayMetrics")
            .field("enabled", &cfg!(feature = "metrics"))
            .finish()
    }
}

impl Default for RelayMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl RelayMetrics {
    /// Registers the instruments with the global meter provider.
    pub fn new() -> Self {
        #[cfg(feature = "metrics")]
        {
            let meter = global::meter("bedrock_relay");
            Self {
                requests: meter
                    .u64_counter("relay.requests")
                    .with_description("Streaming requests accepted")
                    .build(),
                fragments: meter
                    .u64_counter("relay.fragments")
                    .with_description("Text fragments written to clients")
                    .build(),
                bytes: meter
                    .u64_counter("relay.bytes")
                    .with_description("Text bytes written to clients")
                    .with_unit("By")
                    .build(),
                upstream_errors: meter
                    .u64_counter("relay.upstream_errors")
                    .with_description("Upstream failures, before or during streaming")
                    .build(),
                skipped_chunks: meter
                    .u64_counter("relay.skipped_chunks")
                    .with_description("Upstream chunks that failed to decode")
                    .build(),
                duration: meter
                    .f64_histogram("relay.duration")
                    .with_description("Time from upstream stream open to relay close")
                    .with_unit("s")
                    .build(),
            }
        }

        #[cfg(not(feature = "metrics"))]
        {
            Self {}
        }
    }

    /// Counts an accepted streaming request.
    pub fn record_request(&self, variant: RequestVariant) {
        #[cfg(feature = "metrics")]
        self.requests.add(1, &[label(variant)]);

        #[cfg(not(feature = "metrics"))]
        let _ = variant;
    }

    /// Counts an upstream failure.
    pub fn record_upstream_error(&self, variant: RequestVariant) {
        #[cfg(feature = "metrics")]
        self.upstream_errors.add(1, &[label(variant)]);

        #[cfg(not(feature = "metrics"))]
        let _ = variant;
    }

    /// Records the outcome of one relay.
    pub fn record_relay(&self, variant: RequestVariant, summary: &RelaySummary, elapsed: Duration) {
        #[cfg(feature = "metrics")]
        {
            let attrs = [label(variant)];
            self.fragments.add(*summary.fragments(), &attrs);
            self.bytes.add(*summary.bytes(), &attrs);
            self.skipped_chunks.add(*summary.skipped_chunks(), &attrs);
            self.duration.record(elapsed.as_secs_f64(), &attrs);
        }

        #[cfg(not(feature = "metrics"))]
        let _ = (variant, summary, elapsed);
    }
}

#[cfg(feature = "metrics")]
fn label(variant: RequestVariant) -> KeyValue {
    KeyValue::new("variant", variant.as_ref().to_string())
}

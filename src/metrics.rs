//! Prometheus metrics for model invocations
//!
//! Counts classified invocation outcomes and histogram-tracks provider call
//! latency. The binary can print the registry in Prometheus text format.

use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::Arc;

/// Outcome label for `model_invoker_invocations_total`
///
/// Closed set, so the counter has at most four time series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// 2xx with a body
    Success,
    /// Non-2xx or no body
    Empty,
    /// Provider rejected the input as too long
    ContextLengthExceeded,
    /// Configuration, transport, or serialization failure
    Failed,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Success => "success",
            Outcome::Empty => "empty",
            Outcome::ContextLengthExceeded => "context_length_exceeded",
            Outcome::Failed => "failed",
        }
    }
}

/// Metrics collector for the invoker
#[derive(Clone)]
pub struct Metrics {
    pub registry: Arc<Registry>,
    invocations_total: IntCounterVec,
    provider_call_duration: HistogramVec,
}

impl Metrics {
    /// Create a new Metrics instance with its own registry
    ///
    /// # Errors
    ///
    /// Returns an error if metric registration fails.
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let invocations_total = IntCounterVec::new(
            Opts::new(
                "model_invoker_invocations_total",
                "Total number of model invocations by classified outcome",
            ),
            &["outcome"],
        )?;

        let provider_call_duration = HistogramVec::new(
            HistogramOpts::new(
                "model_invoker_provider_call_duration_ms",
                "Latency of the provider HTTP call in milliseconds",
            )
            .buckets(vec![
                50.0, 100.0, 250.0, 500.0, 1000.0, 2500.0, 5000.0, 10000.0, 30000.0, 60000.0,
            ]),
            &["model"],
        )?;

        registry.register(Box::new(invocations_total.clone()))?;
        registry.register(Box::new(provider_call_duration.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            invocations_total,
            provider_call_duration,
        })
    }

    /// Count one classified invocation
    pub fn record_outcome(&self, outcome: Outcome) {
        self.invocations_total
            .with_label_values(&[outcome.as_str()])
            .inc();
    }

    /// Observe a provider call duration
    ///
    /// NaN, infinite, and negative durations are dropped with a warning.
    pub fn record_provider_call(&self, model: &str, duration_ms: f64) {
        if !duration_ms.is_finite() || duration_ms < 0.0 {
            tracing::warn!(
                model = model,
                duration_ms = duration_ms,
                "Dropping invalid provider call duration"
            );
            return;
        }
        self.provider_call_duration
            .with_label_values(&[model])
            .observe(duration_ms);
    }

    /// Current count for `outcome`
    pub fn outcome_count(&self, outcome: Outcome) -> u64 {
        self.invocations_total
            .with_label_values(&[outcome.as_str()])
            .get()
    }

    /// Gather all metrics and encode them in Prometheus text format
    ///
    /// # Errors
    ///
    /// Returns an error if metric encoding fails.
    pub fn gather(&self) -> Result<String, prometheus::Error> {
        let metric_families = self.registry.gather();

        let mut buffer = Vec::new();
        TextEncoder::new()
            .encode(&metric_families, &mut buffer)
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    metric_family_count = metric_families.len(),
                    "Prometheus text encoder failed"
                );
                e
            })?;

        String::from_utf8(buffer).map_err(|e| {
            prometheus::Error::Msg(format!(
                "Prometheus encoder produced invalid UTF-8 at byte {}",
                e.utf8_error().valid_up_to()
            ))
        })
    }
}

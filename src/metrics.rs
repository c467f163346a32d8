use crate::error::HolderError;
use anyhow::{Context, Result};
use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

/// Request outcome counters exposed at `/metrics`.
#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    requests: IntCounterVec,
}

impl Metrics {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();
        let requests = IntCounterVec::new(
            Opts::new("holder_requests_total", "Holder selection requests by outcome"),
            &["outcome"],
        )
        .context("Failed to create request counter")?;
        registry
            .register(Box::new(requests.clone()))
            .context("Failed to register request counter")?;

        Ok(Self { registry, requests })
    }

    pub fn record(&self, outcome: &str) {
        self.requests.with_label_values(&[outcome]).inc();
    }

    pub fn record_error(&self, err: &HolderError) {
        self.record(error_outcome(err));
    }

    pub fn count(&self, outcome: &str) -> u64 {
        self.requests.with_label_values(&[outcome]).get()
    }

    pub fn render(&self) -> Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new()
            .encode(&self.registry.gather(), &mut buffer)
            .context("Failed to encode metrics")?;
        String::from_utf8(buffer).context("Metrics output is not UTF-8")
    }
}

fn error_outcome(err: &HolderError) -> &'static str {
    match err {
        HolderError::InvalidAddress | HolderError::InvalidWalletAddress => "invalid_address",
        HolderError::NoEligibleHolders => "no_eligible_holders",
        _ => "upstream_error",
    }
}

//! Prometheus metrics for the bridge client.
//!
//! All metrics are aggregated in the [`Metrics`] struct.

use alloy_primitives::U256;
use metrics::{counter, describe_counter, describe_gauge, gauge};

/// Aggregated metrics for the bridge client.
///
/// Metric descriptions are registered with the global registry on creation.
#[derive(Debug, Clone)]
pub struct Metrics {
    _private: (),
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub fn new() -> Self {
        Self::register_descriptions();
        Self { _private: () }
    }

    fn register_descriptions() {
        describe_counter!("bridge_quotes_total", "Total number of relay quotes fetched");
        describe_counter!(
            "bridge_approvals_total",
            "Total number of confirmed token approvals"
        );
        describe_counter!(
            "bridge_deposits_total",
            "Total number of confirmed bridge deposits"
        );
        describe_counter!(
            "bridge_deposit_amount_total",
            "Total input amount bridged, in the token's smallest unit"
        );
        describe_counter!(
            "bridge_step_failure_total",
            "Total failed steps by step name"
        );

        describe_gauge!(
            "bridge_allowance",
            "Last observed allowance of the origin SpokePool"
        );
        describe_gauge!(
            "bridge_pending_deposits",
            "Number of deposits not yet filled on the destination chain"
        );
        describe_gauge!(
            "bridge_pending_deposit_amount",
            "Total input amount of deposits not yet filled"
        );
    }

    pub fn record_quote(&self) {
        counter!("bridge_quotes_total").increment(1);
    }

    pub fn record_approval(&self) {
        counter!("bridge_approvals_total").increment(1);
    }

    /// Record a confirmed deposit of `amount` (smallest unit).
    pub fn record_deposit(&self, amount: U256) {
        counter!("bridge_deposits_total").increment(1);
        counter!("bridge_deposit_amount_total").increment(saturating_u64(amount));
    }

    pub fn record_step_failure(&self, step: &str) {
        counter!("bridge_step_failure_total", "step" => step.to_string()).increment(1);
    }

    pub fn set_allowance(&self, allowance: U256) {
        gauge!("bridge_allowance").set(f64::from(allowance));
    }

    pub fn set_pending_deposits(&self, count: usize, amount: U256) {
        gauge!("bridge_pending_deposits").set(count as f64);
        gauge!("bridge_pending_deposit_amount").set(f64::from(amount));
    }
}

fn saturating_u64(value: U256) -> u64 {
    u64::try_from(value).unwrap_or(u64::MAX)
}

/// Install the Prometheus metrics exporter and start the HTTP server.
///
/// Returns an error if the server fails to bind to the specified port.
pub fn install_prometheus_exporter(port: u16) -> eyre::Result<()> {
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::net::SocketAddr;

    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| eyre::eyre!("Failed to install Prometheus exporter: {}", e))?;

    Ok(())
}

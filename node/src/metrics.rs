//! Prometheus metrics for the restake node.
//!
//! The [`RestakeMetrics`] struct owns a dedicated [`Registry`] that can be
//! encoded into the Prometheus text exposition format with
//! [`RestakeMetrics::encode`].

use prometheus::{
    register_gauge_with_registry, register_histogram_with_registry,
    register_int_counter_with_registry, Encoder, Gauge, Histogram, HistogramOpts, IntCounter,
    Opts, Registry, TextEncoder,
};

use crate::NodeError;

pub struct RestakeMetrics {
    /// The Prometheus registry that owns every metric below.
    pub registry: Registry,

    // ── Counters ────────────────────────────────────────────────────────
    pub blocks_executed: IntCounter,
    pub txs_committed: IntCounter,
    /// Transactions whose effects were discarded after a failed message.
    pub txs_rolled_back: IntCounter,
    pub auto_restakes_executed: IntCounter,
    /// Reward withdrawals that produced nothing to restake.
    pub auto_restakes_skipped: IntCounter,
    pub auto_restakes_failed: IntCounter,
    pub unbondings_completed: IntCounter,

    // ── Gauges ──────────────────────────────────────────────────────────
    /// The auto-restake ratio in effect after the last block.
    pub auto_restake_ratio: Gauge,

    // ── Histograms ──────────────────────────────────────────────────────
    pub block_execution_time_ms: Histogram,
}

fn counter(registry: &Registry, name: &str, help: &str) -> Result<IntCounter, NodeError> {
    Ok(register_int_counter_with_registry!(Opts::new(name, help), registry)?)
}

impl RestakeMetrics {
    /// Create a fresh set of metrics, all registered under a new
    /// [`Registry`].
    pub fn new() -> Result<Self, NodeError> {
        let registry = Registry::new();

        let blocks_executed =
            counter(&registry, "restake_blocks_executed_total", "Total blocks executed")?;
        let txs_committed = counter(
            &registry,
            "restake_txs_committed_total",
            "Total transactions committed",
        )?;
        let txs_rolled_back = counter(
            &registry,
            "restake_txs_rolled_back_total",
            "Total transactions rolled back",
        )?;
        let auto_restakes_executed = counter(
            &registry,
            "restake_auto_restakes_executed_total",
            "Total auto-restakes executed at end of block",
        )?;
        let auto_restakes_skipped = counter(
            &registry,
            "restake_auto_restakes_skipped_total",
            "Total reward withdrawals skipped by the harvester",
        )?;
        let auto_restakes_failed = counter(
            &registry,
            "restake_auto_restakes_failed_total",
            "Total auto-restakes that failed and were rolled back",
        )?;

        let unbondings_completed = counter(
            &registry,
            "restake_unbondings_completed_total",
            "Total matured unbondings paid out",
        )?;

        let auto_restake_ratio = register_gauge_with_registry!(
            Opts::new("restake_auto_restake_ratio", "Current auto-restake ratio"),
            registry
        )?;

        // 0.1 ms → ~1.6 s
        let block_execution_time_ms = register_histogram_with_registry!(
            HistogramOpts::new(
                "restake_block_execution_time_ms",
                "Block execution time in milliseconds"
            )
            .buckets(prometheus::exponential_buckets(0.1, 2.0, 15)?),
            registry
        )?;

        Ok(Self {
            registry,
            blocks_executed,
            txs_committed,
            txs_rolled_back,
            auto_restakes_executed,
            auto_restakes_skipped,
            auto_restakes_failed,
            unbondings_completed,
            auto_restake_ratio,
            block_execution_time_ms,
        })
    }

    /// Render every metric in the Prometheus text format.
    pub fn encode(&self) -> Result<String, NodeError> {
        let mut buf = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buf)?;
        String::from_utf8(buf).map_err(|e| NodeError::Other(e.to_string()))
    }
}

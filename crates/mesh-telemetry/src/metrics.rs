//! Prometheus metrics for the coordination core.
//!
//! All metrics follow the naming convention: `mc_<area>_<metric>_<unit>`.
//! Counters can be incremented before `register_metrics` runs; registration
//! only makes them visible to `encode_metrics`.

use lazy_static::lazy_static;
use prometheus::{Counter, CounterVec, Encoder, Histogram, Opts, Registry, TextEncoder};
use std::sync::Arc;

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // PEER RESOLUTION
    // =========================================================================

    /// Peer resolutions by outcome
    pub static ref PEER_RESOLUTIONS: CounterVec = CounterVec::new(
        Opts::new("mc_peer_resolutions_total", "Peer set resolutions"),
        &["outcome"]  // outcome: ok/error
    ).expect("metric creation failed");

    /// Size of resolved peer lists
    pub static ref PEERS_RESOLVED: Histogram = Histogram::with_opts(
        prometheus::HistogramOpts::new(
            "mc_peer_resolution_peers",
            "Number of peers returned per resolution"
        ).buckets(vec![1.0, 2.0, 4.0, 8.0, 16.0, 32.0, 64.0, 128.0, 256.0, 512.0, 1024.0, 2048.0])
    ).expect("metric creation failed");

    /// Staleness checks by result
    pub static ref STALENESS_CHECKS: CounterVec = CounterVec::new(
        Opts::new("mc_staleness_checks_total", "Network map staleness checks"),
        &["result"]  // result: stale/fresh/refresh_failed/lookup_failed
    ).expect("metric creation failed");

    // =========================================================================
    // NODE TRANSLATION
    // =========================================================================

    /// Wire node translations by outcome
    pub static ref NODE_TRANSLATIONS: CounterVec = CounterVec::new(
        Opts::new("mc_node_translations_total", "Machine to wire node translations"),
        &["outcome"]  // outcome: ok/error
    ).expect("metric creation failed");

    // =========================================================================
    // MACHINE REGISTRY
    // =========================================================================

    /// Route enable requests by outcome
    pub static ref ROUTE_CHANGES: CounterVec = CounterVec::new(
        Opts::new("mc_route_changes_total", "Route enable requests"),
        &["outcome"]  // outcome: applied/invalid/not_advertised
    ).expect("metric creation failed");

    /// Expiry recomputations by decision
    pub static ref EXPIRY_CLAMPS: CounterVec = CounterVec::new(
        Opts::new("mc_expiry_clamps_total", "Registration expiry recomputations"),
        &["decision"]  // decision: max/default/requested
    ).expect("metric creation failed");

    /// Machine deletions by mode
    pub static ref MACHINE_DELETIONS: CounterVec = CounterVec::new(
        Opts::new("mc_machine_deletions_total", "Machine deletions"),
        &["mode"]  // mode: soft/hard
    ).expect("metric creation failed");

    /// Completed registrations
    pub static ref REGISTRATIONS: Counter = Counter::new(
        "mc_registrations_total",
        "Machines that completed registration"
    ).expect("metric creation failed");

    /// Map update signals emitted
    pub static ref MAP_UPDATES_REQUESTED: Counter = Counter::new(
        "mc_map_updates_requested_total",
        "Map update requests signalled to connected peers"
    ).expect("metric creation failed");
}

/// Handle for the metrics registry
pub struct MetricsHandle {
    _registry: Arc<Registry>,
}

/// Register all metrics with the global registry.
pub fn register_metrics() -> Result<MetricsHandle, TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        // Peer resolution
        Box::new(PEER_RESOLUTIONS.clone()),
        Box::new(PEERS_RESOLVED.clone()),
        Box::new(STALENESS_CHECKS.clone()),
        // Translation
        Box::new(NODE_TRANSLATIONS.clone()),
        // Registry
        Box::new(ROUTE_CHANGES.clone()),
        Box::new(EXPIRY_CLAMPS.clone()),
        Box::new(MACHINE_DELETIONS.clone()),
        Box::new(REGISTRATIONS.clone()),
        Box::new(MAP_UPDATES_REQUESTED.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }

    Ok(MetricsHandle {
        _registry: Arc::new(REGISTRY.clone()),
    })
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

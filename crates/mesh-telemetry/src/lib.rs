//! # Mesh Telemetry
//!
//! Observability bootstrap for the coordination core.
//!
//! ## Components
//!
//! - **Logs**: `tracing` events rendered by `tracing-subscriber`, pretty in
//!   development and JSON in containers
//! - **Metrics**: Prometheus counters for peer resolution, staleness checks,
//!   translation, route changes, expiry clamps and deletions
//!
//! ## Usage
//!
//! ```rust,ignore
//! use mesh_telemetry::{init_telemetry, TelemetryConfig};
//!
//! let _guard = init_telemetry(TelemetryConfig::from_env())?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `MC_SERVICE_NAME` | `mesh-control` | Service name in logs |
//! | `MC_LOG_LEVEL` | `info` | Log filter |
//! | `MC_JSON_LOGS` | `false` | JSON output |

mod config;
mod logging;
pub mod metrics;

pub use config::TelemetryConfig;
pub use logging::init_logging;
pub use metrics::{encode_metrics, register_metrics, MetricsHandle};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Global subscriber already installed")]
    AlreadyInitialized,

    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Initialize logging and metrics.
///
/// Returns a guard that must be held for the lifetime of the application.
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    let metrics_handle = register_metrics()?;
    init_logging(&config)?;

    Ok(TelemetryGuard {
        _metrics: metrics_handle,
    })
}

/// Guard that keeps telemetry active.
pub struct TelemetryGuard {
    _metrics: MetricsHandle,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!("Shutting down telemetry");
    }
}

/// Convenience macro for recording a metric increment.
#[macro_export]
macro_rules! metric_inc {
    ($metric:expr) => {
        $metric.inc()
    };
    ($metric:expr, $labels:expr) => {
        $metric.with_label_values($labels).inc()
    };
}

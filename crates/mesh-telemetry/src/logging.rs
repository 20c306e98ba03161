//! Structured logging setup.
//!
//! Installs a `tracing-subscriber` registry with an `EnvFilter` and either a
//! human-readable or a JSON `fmt` layer. JSON lines carry `target`, `file`
//! and `line` so log shippers can index them without parsing messages.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::{TelemetryConfig, TelemetryError};

/// Initialize the global tracing subscriber.
///
/// Fails with `AlreadyInitialized` when a subscriber is already installed,
/// which lets test harnesses call it more than once.
pub fn init_logging(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let env_filter = EnvFilter::try_new(&config.log_level)
        .map_err(|e| TelemetryError::Config(format!("log filter {:?}: {e}", config.log_level)))?;

    let registry = tracing_subscriber::registry().with(env_filter);

    let result = match (config.console_output, config.json_logs) {
        (false, _) => registry.try_init(),
        (true, true) => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .try_init(),
        (true, false) => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_ansi(true),
            )
            .try_init(),
    };
    result.map_err(|_| TelemetryError::AlreadyInitialized)?;

    tracing::info!(
        service = %config.service_name,
        json_logs = config.json_logs,
        "Logging initialized"
    );

    Ok(())
}

/// Log a machine-scoped event with standard fields.
#[macro_export]
macro_rules! log_machine_event {
    ($level:ident, $machine:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            machine = %$machine.name,
            machine_id = $machine.id,
            namespace = %$machine.namespace.name,
            $($($field)*,)?
            $msg
        )
    };
}

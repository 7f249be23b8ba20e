//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Environment variable holding the log filter directives.
pub const LOG_ENV_VAR: &str = "LEADSCORE_LOG";

/// Filter used when `LEADSCORE_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "lead_scoring=info,lead_core=info";

/// Initialize the tracing/logging system.
///
/// Reads `LEADSCORE_LOG` for per-module log levels, e.g.
/// `LEADSCORE_LOG=lead_scoring::pipeline=debug,lead_core=warn`.
///
/// Idempotent: later calls are no-ops. A subscriber installed elsewhere
/// first is left in place.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        let _ = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .with(filter)
            .try_init();
    });
}

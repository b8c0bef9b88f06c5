//! tracing-subscriber setup
//!
//! Logs always go to stderr so stdout stays parseable.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::cli::LogFormat;

/// Level used when `RUST_LOG` is unset
pub fn default_level(logging: bool) -> &'static str {
    if logging {
        "debug"
    } else {
        "warn"
    }
}

/// Install the global subscriber. Repeated calls are ignored.
pub fn init_logging(logging: bool, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level(logging)))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let registry = tracing_subscriber::registry().with(filter);
    let result = match format {
        LogFormat::Text => registry
            .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
            .try_init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
    };
    // Ignore error if already initialized
    result.ok();
}

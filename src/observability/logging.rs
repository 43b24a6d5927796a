//! Structured logging.
//!
//! `RUST_LOG` wins over the configured level. Access records keep flowing
//! at `info` whatever the base level is, since emitting them is already
//! gated by the verbosity flag.

use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, util::TryInitError, EnvFilter,
};

use crate::config::{LogFormat, ObservabilityConfig};
use crate::observability::access_log::ACCESS_TARGET;

/// Filter directives derived from configuration.
pub fn default_directives(config: &ObservabilityConfig) -> String {
    format!(
        "blob_node={level},tower_http={level},{ACCESS_TARGET}=info",
        level = config.log_level
    )
}

/// Install the global subscriber.
pub fn init(config: &ObservabilityConfig) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(config)));

    let registry = tracing_subscriber::registry().with(filter);
    match config.log_format {
        LogFormat::Json => registry.with(fmt::layer().json()).try_init(),
        LogFormat::Pretty => registry.with(fmt::layer()).try_init(),
    }
}

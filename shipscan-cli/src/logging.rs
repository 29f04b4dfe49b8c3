//! Tracing setup for the shipscan CLI.
//!
//! Builds the global `tracing-subscriber` from the `[general]` config
//! section. `RUST_LOG` takes precedence over the configured level so a
//! one-off invocation can raise verbosity without editing the file.

use anyhow::{Result, anyhow};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use shipscan_core::config::GeneralConfig;

/// Initialize the global tracing subscriber. Call once, before any
/// tracing macro fires.
pub fn init_tracing(config: &GeneralConfig) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let registry = tracing_subscriber::registry().with(filter);

    let init_result = match config.log_format.as_str() {
        "json" => registry.with(fmt::layer().json()).try_init(),
        "pretty" => registry.with(fmt::layer().pretty()).try_init(),
        other => {
            return Err(anyhow!(
                "unknown log format '{other}', expected 'json' or 'pretty'"
            ));
        }
    };
    init_result.map_err(|e| anyhow!("failed to initialize tracing subscriber: {e}"))
}

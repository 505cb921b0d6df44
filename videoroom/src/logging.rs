//! Logging bootstrap

use tracing_subscriber::EnvFilter;
use videoroom_core::{Result, VideoRoomError};

/// Install a global `tracing` subscriber
///
/// `RUST_LOG` wins when set; otherwise the level is `debug` or `info`
/// depending on `debug`. Fails when a subscriber is already installed.
pub fn init_logging(debug: bool) -> Result<()> {
    let default_level = if debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| VideoRoomError::Initialization {
            reason: format!("Failed to install tracing subscriber: {}", e),
        })?;

    tracing::debug!("Logging initialized");
    Ok(())
}

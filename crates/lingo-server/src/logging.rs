use lingo_types::error::ConfigError;
use tracing_subscriber::EnvFilter;

use crate::config::Mode;

/// Installs global fmt subscriber, `RUST_LOG` overrides the mode default
pub fn init_logging(mode: Mode) -> Result<(), ConfigError> {
    let default_level = match mode {
        Mode::Development => "debug",
        Mode::Production => "info",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| ConfigError::new(format!("Logging already initialized: {e}")))
}

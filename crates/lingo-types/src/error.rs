pub type Result<T, E = anyhow::Error> = std::result::Result<T, E>;

/// Invalid or missing configuration, fatal at startup
#[derive(Debug, thiserror::Error)]
#[error("Configuration error: {0}")]
pub struct ConfigError(String);

impl ConfigError {
    pub fn new(msg: impl Into<String>) -> Self {
        ConfigError(msg.into())
    }
}

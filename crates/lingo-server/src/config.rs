use std::{net::IpAddr, time::Duration};

use crate::error::Result;
pub use clap::Parser;
use lingo_types::{config::BackendConfig, error::ConfigError};
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Mode {
    Development,
    Production,
}

#[derive(Debug, Clone, clap::Parser)]
pub struct ServerConfig {
    #[arg(
        short,
        long,
        default_value_t = 3000,
        env = "LINGO_LISTEN_PORT",
        help = "Port to listen on"
    )]
    pub port: u16,
    #[arg(
        short,
        long,
        default_value = "127.0.0.1",
        env = "LINGO_LISTEN_ADDRESS",
        help = "Address to listen on"
    )]
    pub listen_address: String,

    #[command(flatten)]
    pub backend: BackendConfig,

    #[arg(
        long,
        env = "LINGO_OIDC_CONFIG",
        help = "Path to OIDC configuration file with additional login providers"
    )]
    pub oidc_config: Option<String>,

    #[arg(long, env = "LINGO_GOOGLE_CLIENT_ID", help = "Google OAuth client id")]
    pub google_client_id: Option<String>,

    #[arg(
        long,
        env = "LINGO_GOOGLE_CLIENT_SECRET",
        hide_env_values = true,
        help = "Google OAuth client secret"
    )]
    pub google_client_secret: Option<String>,

    #[arg(
        long,
        env = "LINGO_BASE_URL",
        default_value = "http://localhost:3000",
        help = "Base URL of the server, as visible to users, login callbacks are built from it"
    )]
    pub base_url: Url,

    #[arg(
        long,
        env = "LINGO_LOGIN_REDIRECT_PATH",
        help = "Path (relative to base URL) where user is redirected after login, JSON is returned if not set"
    )]
    pub login_redirect_path: Option<String>,

    #[arg(
        long,
        env = "LINGO_TOKEN_SECRET",
        hide_env_values = true,
        help = "Secret for signing API tokens, random secret stored in data directory is used if not set"
    )]
    pub token_secret: Option<String>,

    #[arg(
        long,
        env = "LINGO_TOKEN_VALIDITY",
        default_value = "1 day",
        help = "Default token validity in human friendly format (e.g. 1d, 1h, 1m, 1s - or combined)",
        value_parser = humantime::parse_duration
    )]
    pub token_validity: Duration,

    #[arg(
        long,
        value_enum,
        env = "LINGO_MODE",
        default_value = "development",
        help = "Run mode, production uses secure cookies and less verbose logging"
    )]
    pub mode: Mode,

    #[arg(long, env = "LINGO_NO_CORS", help = "Disable CORS")]
    pub no_cors: bool,
}

impl ServerConfig {
    pub fn load() -> Result<Self> {
        ServerConfig::try_parse().map_err(|e| e.into())
    }

    pub fn is_production(&self) -> bool {
        self.mode == Mode::Production
    }

    pub fn listen_ip(&self) -> Result<IpAddr, ConfigError> {
        self.listen_address
            .parse()
            .map_err(|e| ConfigError::new(format!("Invalid listen address: {e}")))
    }

    /// Checks values that clap cannot, login providers are checked when state is built
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::new("Port must not be 0"));
        }
        self.listen_ip()?;
        self.backend.validate()?;
        if self.token_secret.as_deref().is_some_and(|s| s.is_empty()) {
            return Err(ConfigError::new("Token secret must not be empty"));
        }
        if self.token_validity.is_zero() {
            return Err(ConfigError::new("Token validity must be positive"));
        }
        if let Some(path) = &self.login_redirect_path {
            self.base_url.join(path).map_err(|e| {
                ConfigError::new(format!("Invalid login redirect path {path}: {e}"))
            })?;
        }
        Ok(())
    }
}

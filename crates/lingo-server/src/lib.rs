pub mod config;
pub mod error;
pub mod logging;
pub mod run;

use std::path::Path;

use config::ServerConfig;
pub use error::{Error, Result};
use lingo_app::state::{AppConfig, AppState};
use lingo_auth::token::TokenManager;
use lingo_types::{error::ConfigError, oidc::OIDCConfig};
use tokio::{fs, io::AsyncWriteExt as _, task::spawn_blocking};
use tracing::info;

pub async fn build_state(config: &ServerConfig) -> Result<AppState> {
    config.validate()?;
    let data_dir = config.backend.data_dir();
    if !data_dir.is_dir() {
        fs::create_dir_all(&data_dir).await?;
        info!("Created data directory {}", data_dir.display());
    }

    let mut oidc_config = match config.oidc_config.clone() {
        Some(file) => spawn_blocking(move || OIDCConfig::load_config(&file)).await??,
        None => OIDCConfig::default(),
    };
    if let Some(client_id) = config.google_client_id.clone() {
        oidc_config = oidc_config.with_google(client_id, config.google_client_secret.clone());
    }
    if oidc_config.is_empty() {
        return Err(ConfigError::new("No login provider is configured").into());
    }
    info!(
        "Login providers: {}",
        oidc_config.available_providers().join(", ")
    );

    let app_config = AppConfig {
        base_url: config.base_url.clone(),
        login_redirect_path: config.login_redirect_path.clone(),
        secure_cookies: config.is_production(),
    };

    let pool = lingo_dal::new_pool(&config.backend.database_url()).await?;
    lingo_dal::migrate(&pool).await?;

    let secret = match &config.token_secret {
        Some(secret) => secret.as_bytes().to_vec(),
        None => read_secret(&data_dir).await?,
    };
    let tokens = TokenManager::new(&secret, config.token_validity);
    Ok(AppState::new(oidc_config, app_config, pool, tokens))
}

async fn read_secret(data_dir: &Path) -> Result<Vec<u8>, std::io::Error> {
    let secret_file = data_dir.join("secret");

    let secret = if fs::try_exists(&secret_file).await? {
        fs::read(&secret_file).await?
    } else {
        let random_bytes = rand::random::<[u8; 32]>();
        #[cfg(unix)]
        let mut file = {
            use std::fs::OpenOptions;
            use std::os::unix::fs::OpenOptionsExt;
            {
                // Only current user can read the secret
                let _f = OpenOptions::new()
                    .mode(0o600)
                    .create(true)
                    .write(true)
                    .truncate(true)
                    .open(&secret_file)?;
            }
            fs::File::options().write(true).open(&secret_file).await?
        };
        #[cfg(not(unix))]
        let mut file = fs::File::create(&secret_file).await?;

        file.write_all(&random_bytes).await?;
        random_bytes.as_ref().to_vec()
    };
    Ok(secret)
}

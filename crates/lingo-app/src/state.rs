use std::sync::Arc;

use lingo_auth::token::TokenManager;
use lingo_dal::Pool;
use lingo_types::oidc::{OIDCConfig, OIDCProviderConfig};
use url::Url;

/// Shared application state, cheap to clone
#[derive(Clone)]
pub struct AppState {
    state: Arc<AppStateInner>,
}

impl AppState {
    pub fn new(
        oidc_config: OIDCConfig,
        app_config: AppConfig,
        pool: Pool,
        tokens: TokenManager,
    ) -> Self {
        AppState {
            state: Arc::new(AppStateInner {
                oidc_providers_config: oidc_config,
                app_config,
                pool,
                tokens,
            }),
        }
    }

    pub fn get_oidc_provider(&self, name: &str) -> Option<OIDCProviderConfig> {
        self.state.oidc_providers_config.get_provider(name).cloned()
    }

    pub fn config(&self) -> &AppConfig {
        &self.state.app_config
    }

    pub fn build_url(&self, relative_url: &str) -> Result<Url, url::ParseError> {
        self.config().base_url.join(relative_url)
    }

    pub fn pool(&self) -> &Pool {
        &self.state.pool
    }

    pub fn tokens(&self) -> &TokenManager {
        &self.state.tokens
    }
}

struct AppStateInner {
    pool: Pool,
    oidc_providers_config: OIDCConfig,
    app_config: AppConfig,
    tokens: TokenManager,
}

pub struct AppConfig {
    /// Public URL of the server, callback URLs are derived from it
    pub base_url: Url,
    /// Where browser goes after login, token or error is added as query parameter
    pub login_redirect_path: Option<String>,
    /// Cookies are only sent over https
    pub secure_cookies: bool,
}

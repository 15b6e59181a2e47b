use std::{
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock},
};

use crate::{auth::token::token_cookie, error::ApiError, state::AppState};
use axum::{
    extract::{FromRequestParts, Path, Query, State},
    response::{IntoResponse, Redirect, Response},
    Extension, Json, RequestPartsExt,
};
use http::{request::Parts, StatusCode};
use lingo_auth::oidc::{OIDCClient, OIDCSecrets};
use lingo_dal::user::{ExternalUser, User, UserRepository};
use lingo_types::claim::ApiClaim;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_cookies::Cookies;
use tower_sessions::Session;
use tracing::{debug, error, info, warn};

const SESSION_SECRETS_KEY: &str = "oidc_secrets";

crate::repository_from_request!(UserRepository);

#[derive(Debug, Deserialize)]
pub struct ProviderParams {
    provider: String,
}

impl FromRequestParts<AppState> for OIDCClient {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Path(ProviderParams { provider }) = parts
            .extract::<Path<ProviderParams>>()
            .await
            .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;

        let Extension(cache) = parts
            .extract::<Extension<ProvidersCache>>()
            .await
            .map_err(|e| {
                error!("Failed to get providers cache: {e}");
                ApiError::Internal(anyhow::anyhow!("Providers cache is missing"))
            })?;
        if let Some(client) = cache.get_provider(&provider) {
            return Ok(client);
        }

        let Some(provider_config) = state.get_oidc_provider(&provider) else {
            warn!("Unknown OIDC provider: {}", provider);
            return Err(ApiError::InvalidRequest(format!(
                "Unknown login provider {provider}"
            )));
        };
        let redirect_url = state
            .build_url(&format!("auth/{provider}/redirect"))
            .map_err(|e| {
                error!("Failed to build auth callback URL: {e}");
                ApiError::Internal(e.into())
            })?;
        let client = OIDCClient::discover(&provider_config, redirect_url)
            .await
            .map_err(|e| {
                error!("Failed to discover OIDC provider {}: {}", provider, e);
                ApiError::Internal(anyhow::anyhow!("Login provider is not available"))
            })?;
        cache.set_provider(&provider, client.clone());
        Ok(client)
    }
}

/// Discovered providers, discovery runs once per provider
#[derive(Clone, Default)]
pub struct ProvidersCache {
    providers: Arc<RwLock<HashMap<String, OIDCClient>>>,
}

impl ProvidersCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_provider(&self, name: impl AsRef<str>) -> Option<OIDCClient> {
        self.providers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name.as_ref())
            .cloned()
    }

    pub fn set_provider(&self, name: impl Into<String>, client: OIDCClient) {
        self.providers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.into(), client);
    }
}

pub async fn login(client: OIDCClient, session: Session) -> Result<impl IntoResponse, ApiError> {
    let (url, secrets) = client.auth_url();
    session
        .insert(SESSION_SECRETS_KEY, secrets)
        .await
        .map_err(|e| {
            error!("Failed to store secrets in session: {e}");
            ApiError::Internal(e.into())
        })?;
    Ok(Redirect::temporary(url.as_str()))
}

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum LoginFailure {
    #[error("No user found")]
    NoUser,
    #[error("{0}")]
    Unexpected(String),
}

impl LoginFailure {
    fn unexpected(e: impl std::fmt::Display) -> Self {
        LoginFailure::Unexpected(e.to_string())
    }

    fn redirect_code(&self) -> &'static str {
        match self {
            LoginFailure::NoUser => "NoUserFound",
            LoginFailure::Unexpected(_) => "UnexpectedError",
        }
    }

    fn into_json_response(self) -> Response {
        match self {
            LoginFailure::NoUser => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "No user found" })),
            )
                .into_response(),
            LoginFailure::Unexpected(details) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Authentication failed", "details": details })),
            )
                .into_response(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginResult {
    pub user: User,
    pub token: String,
}

async fn authenticate(
    client: Result<OIDCClient, ApiError>,
    session: &Session,
    users: &UserRepository,
    params: CallbackQuery,
) -> Result<User, LoginFailure> {
    if let Some(error) = params.error {
        info!("Login was not granted by provider: {error}");
        return Err(LoginFailure::NoUser);
    }
    let (Some(code), Some(state)) = (params.code, params.state) else {
        return Err(LoginFailure::NoUser);
    };
    let client = client.map_err(LoginFailure::unexpected)?;
    let secrets = session
        .remove::<OIDCSecrets>(SESSION_SECRETS_KEY)
        .await
        .map_err(LoginFailure::unexpected)?
        .ok_or_else(|| LoginFailure::unexpected("Login session is missing or expired"))?;

    let identity = client
        .exchange_code(code, &state, secrets)
        .await
        .map_err(LoginFailure::unexpected)?;
    debug!("Provider authenticated subject {}", identity.subject);

    let name = identity.display_name();
    users
        .find_or_create_by_google_id(ExternalUser {
            google_id: identity.subject,
            name,
            email: identity.email,
        })
        .await
        .map_err(LoginFailure::unexpected)
}

fn redirect_after_login(state: &AppState, path: &str, param: (&str, &str)) -> Response {
    match state.build_url(path) {
        Ok(mut url) => {
            url.query_pairs_mut().append_pair(param.0, param.1);
            Redirect::to(url.as_str()).into_response()
        }
        Err(e) => {
            error!("Invalid login redirect path {path}: {e}");
            ApiError::Internal(e.into()).into_response()
        }
    }
}

/// Provider errors are reported before the provider client is resolved,
/// so a denied login never triggers discovery.
pub async fn callback(
    client: Result<OIDCClient, ApiError>,
    session: Session,
    cookies: Cookies,
    State(state): State<AppState>,
    users: UserRepository,
    Query(params): Query<CallbackQuery>,
) -> Response {
    let redirect_path = state.config().login_redirect_path.clone();
    let issued = match authenticate(client, &session, &users, params).await {
        Ok(user) => state
            .tokens()
            .issue(ApiClaim::new_expired(user.id.to_string()))
            .map(|token| (user, token))
            .map_err(LoginFailure::unexpected),
        Err(e) => Err(e),
    };

    match issued {
        Ok((user, token)) => {
            info!("User {} logged in", user.id);
            cookies.add(token_cookie(&state, token.clone()));
            match redirect_path {
                Some(path) => redirect_after_login(&state, &path, ("token", &token)),
                None => Json(LoginResult { user, token }).into_response(),
            }
        }
        Err(failure) => {
            warn!("Login failed: {failure}");
            match redirect_path {
                Some(path) => redirect_after_login(&state, &path, ("error", failure.redirect_code())),
                None => failure.into_json_response(),
            }
        }
    }
}

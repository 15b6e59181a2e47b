use crate::state::AppState;
use axum::{routing::get, Extension};

pub mod oidc;
pub mod token;

const SESSION_COOKIE_NAME: &str = "lingo";
pub const TOKEN_COOKIE_NAME: &str = "lingo_token";
const SESSION_EXPIRY_SECS: i64 = 600;

/// Builds authentication router - must be nested on /auth path!
///
/// Token cookie is set through `tower_cookies`, so `CookieManagerLayer` must wrap the router.
pub fn auth_router(secure_cookies: bool) -> axum::Router<AppState> {
    let session_store = tower_sessions::MemoryStore::default();
    let session_layer = tower_sessions::SessionManagerLayer::new(session_store)
        .with_name(SESSION_COOKIE_NAME)
        .with_secure(secure_cookies)
        .with_expiry(tower_sessions::Expiry::OnInactivity(
            time::Duration::seconds(SESSION_EXPIRY_SECS),
        ));
    axum::Router::new()
        .route("/{provider}", get(oidc::login))
        .route("/{provider}/redirect", get(oidc::callback))
        .layer(session_layer)
        .layer(Extension(oidc::ProvidersCache::new()))
}

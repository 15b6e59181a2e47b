use crate::{error::ApiError, state::AppState};
use axum::{extract::FromRequestParts, RequestPartsExt};
use axum_extra::TypedHeader;
use cookie::{Cookie, Expiration, SameSite};
use headers::{authorization::Bearer, Authorization};
use http::request::Parts;
use lingo_types::claim::ApiClaim;
use time::OffsetDateTime;
use tower_cookies::Cookies;
use tracing::{debug, error};

use super::TOKEN_COOKIE_NAME;

/// Claim of authenticated caller, from bearer token or from token cookie
impl FromRequestParts<AppState> for ApiClaim {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let mut token = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .ok()
            .map(|h| h.0.token().to_string());

        if token.is_none() {
            if let Ok(cookies) = parts.extract::<Cookies>().await {
                token = cookies
                    .get(TOKEN_COOKIE_NAME)
                    .map(|c| c.value().to_string());
            } else {
                debug!("Cookies are not available for this route");
            }
        }

        match token {
            Some(token) => state.tokens().validate::<ApiClaim>(&token).map_err(|e| {
                error!("Failed to validate token: {}", e);
                ApiError::Unauthorized
            }),
            None => {
                debug!("No token found");
                Err(ApiError::Unauthorized)
            }
        }
    }
}

pub(crate) fn token_cookie(state: &AppState, signed_token: String) -> Cookie<'static> {
    Cookie::build((TOKEN_COOKIE_NAME, signed_token))
        .http_only(true)
        .secure(state.config().secure_cookies)
        .path("/")
        .same_site(SameSite::Lax)
        .expires(Expiration::DateTime(
            OffsetDateTime::now_utc() + state.tokens().default_validity(),
        ))
        .build()
}

//! Extractor wrapper which validates extracted payload with garde.
//!
//! Both inner extractor rejections and validation failures are turned into [`ApiError`],
//! so clients always get `400` with JSON `{"message": ...}` body.

use std::ops::{Deref, DerefMut};

use axum::extract::{FromRequest, FromRequestParts, Request};
use garde::Validate;
use http::request::Parts;
use tracing::debug;

use crate::{error::ApiError, state::AppState};

#[derive(Debug, Clone, Copy, Default)]
pub struct Valid<E>(pub E);

impl<E> Deref for Valid<E> {
    type Target = E;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<E> DerefMut for Valid<E> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<E> Valid<E> {
    pub fn into_inner(self) -> E {
        self.0
    }
}

fn rejected(rejection: impl std::fmt::Display) -> ApiError {
    debug!("Request extraction failed: {rejection}");
    ApiError::InvalidRequest(rejection.to_string())
}

impl<Extractor, T> FromRequest<AppState> for Valid<Extractor>
where
    T: Validate<Context = ()>,
    Extractor: Deref<Target = T> + FromRequest<AppState>,
    Extractor::Rejection: std::fmt::Display,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let inner = Extractor::from_request(req, state)
            .await
            .map_err(rejected)?;
        inner.deref().validate()?;
        Ok(Valid(inner))
    }
}

impl<Extractor, T> FromRequestParts<AppState> for Valid<Extractor>
where
    T: Validate<Context = ()>,
    Extractor: Deref<Target = T> + FromRequestParts<AppState>,
    Extractor::Rejection: std::fmt::Display,
{
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let inner = Extractor::from_request_parts(parts, state)
            .await
            .map_err(rejected)?;
        inner.deref().validate()?;
        Ok(Valid(inner))
    }
}

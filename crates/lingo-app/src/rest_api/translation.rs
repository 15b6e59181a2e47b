use std::collections::BTreeMap;

use axum::{
    extract::{Path, Query},
    response::IntoResponse,
    routing::{get, post, put},
    Json,
};
use garde::Validate;
use http::StatusCode;
use lingo_dal::translation::{
    CreateTranslation, FlatTranslation, TranslationRepository, UpdateTranslation,
};
use lingo_types::claim::ApiClaim;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{error::ApiResult, rest_api::Paging, state::AppState, validate::Valid};

crate::repository_from_request!(TranslationRepository);

#[derive(Debug, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NewTranslation {
    #[garde(length(min = 1, max = 255))]
    pub word: String,
    /// Language code to text
    #[garde(skip)]
    pub translations: BTreeMap<String, String>,
}

/// Changes translation found by `word`, only included language codes are changed
#[derive(Debug, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct TranslationChange {
    #[garde(length(min = 1, max = 255))]
    pub word: String,
    /// New key for the translation
    #[garde(length(min = 1, max = 255))]
    pub key: Option<String>,
    #[garde(skip)]
    pub translations: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct TranslateParams {
    #[garde(length(min = 1, max = 16))]
    pub language: String,
}

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct TranslateResult {
    pub translation: String,
}

#[cfg_attr(feature = "openapi", utoipa::path(get, path = "", tag = "Translation", operation_id = "listTranslation",
    params(Paging), responses((status = StatusCode::OK, description = "List paginated, language codes are keys of each item"))))]
pub async fn list(
    repository: TranslationRepository,
    Valid(Query(paging)): Valid<Query<Paging>>,
) -> ApiResult<impl IntoResponse> {
    let page = repository.list(&paging.into_page_request()?).await?;
    Ok((StatusCode::OK, Json(page.map(FlatTranslation::from))))
}

#[cfg_attr(feature = "openapi", utoipa::path(get, path = "/{word}", tag = "Translation", operation_id = "translate",
    params(TranslateParams), responses((status = StatusCode::OK, description = "Translated text, word itself when translation is missing", body = TranslateResult))))]
pub async fn translate(
    Path(word): Path<String>,
    repository: TranslationRepository,
    Valid(Query(params)): Valid<Query<TranslateParams>>,
) -> impl IntoResponse {
    let translation = repository.translate(&word, &params.language).await;
    Json(TranslateResult { translation })
}

#[cfg_attr(feature = "openapi", utoipa::path(post, path = "/create", tag = "Translation", operation_id = "createTranslation",
    responses((status = StatusCode::CREATED, description = "Created translation", body = lingo_dal::translation::Translation))))]
pub async fn create(
    claim: ApiClaim,
    repository: TranslationRepository,
    Valid(Json(payload)): Valid<Json<NewTranslation>>,
) -> ApiResult<impl IntoResponse> {
    let translation = repository
        .create(CreateTranslation {
            key: payload.word,
            translations: payload.translations,
        })
        .await?;
    info!("Translation {} created by user {}", translation.key, claim.sub);
    Ok((StatusCode::CREATED, Json(translation)))
}

#[cfg_attr(feature = "openapi", utoipa::path(put, path = "/update", tag = "Translation", operation_id = "updateTranslation",
    responses((status = StatusCode::NO_CONTENT, description = "Translation updated"))))]
pub async fn update(
    _claim: ApiClaim,
    repository: TranslationRepository,
    Valid(Json(payload)): Valid<Json<TranslationChange>>,
) -> ApiResult<impl IntoResponse> {
    repository
        .update(
            &payload.word,
            UpdateTranslation {
                key: payload.key,
                translations: payload.translations,
            },
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(feature = "openapi")]
#[derive(utoipa::OpenApi)]
#[openapi(paths(list, translate, create, update))]
struct ApiDocs;

#[cfg(feature = "openapi")]
pub fn api_docs() -> utoipa::openapi::OpenApi {
    use utoipa::OpenApi as _;
    ApiDocs::openapi()
}

pub fn router() -> axum::Router<AppState> {
    axum::Router::new()
        .route("/", get(list))
        .route("/create", post(create))
        .route("/update", put(update))
        .route("/{word}", get(translate))
}

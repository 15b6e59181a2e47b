use axum::{
    extract::Query,
    response::IntoResponse,
    routing::{get, post, put},
    Json,
};
use garde::Validate;
use http::StatusCode;
use lingo_dal::language::{CreateLanguage, LanguageRepository, UpdateLanguage};
#[cfg(feature = "openapi")]
use lingo_dal::{language::Language, Page};
use lingo_types::claim::ApiClaim;
use serde::Deserialize;
use tracing::info;

use crate::{error::ApiResult, rest_api::Paging, state::AppState, validate::Valid};

crate::repository_from_request!(LanguageRepository);

/// Language is addressed by its code, name is the only changeable field
#[derive(Debug, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct LanguageChange {
    #[garde(length(min = 1, max = 16))]
    pub code: String,
    #[garde(length(min = 1, max = 255))]
    pub name: String,
}

#[cfg_attr(feature = "openapi", utoipa::path(get, path = "", tag = "Language", operation_id = "listLanguage",
    params(Paging), responses((status = StatusCode::OK, description = "List paginated", body = Page<Language>))))]
pub async fn list(
    repository: LanguageRepository,
    Valid(Query(paging)): Valid<Query<Paging>>,
) -> ApiResult<impl IntoResponse> {
    let page = repository.list(&paging.into_page_request()?).await?;
    Ok((StatusCode::OK, Json(page)))
}

#[cfg_attr(feature = "openapi", utoipa::path(post, path = "/create", tag = "Language", operation_id = "createLanguage",
    responses((status = StatusCode::CREATED, description = "Created language", body = Language))))]
pub async fn create(
    claim: ApiClaim,
    repository: LanguageRepository,
    Valid(Json(payload)): Valid<Json<CreateLanguage>>,
) -> ApiResult<impl IntoResponse> {
    let language = repository.create(payload).await?;
    info!("Language {} created by user {}", language.code, claim.sub);
    Ok((StatusCode::CREATED, Json(language)))
}

#[cfg_attr(feature = "openapi", utoipa::path(put, path = "/update", tag = "Language", operation_id = "updateLanguage",
    responses((status = StatusCode::NO_CONTENT, description = "Language updated"))))]
pub async fn update(
    _claim: ApiClaim,
    repository: LanguageRepository,
    Valid(Json(payload)): Valid<Json<LanguageChange>>,
) -> ApiResult<impl IntoResponse> {
    repository
        .update(&payload.code, UpdateLanguage { name: payload.name })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(feature = "openapi")]
#[derive(utoipa::OpenApi)]
#[openapi(paths(list, create, update))]
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
}

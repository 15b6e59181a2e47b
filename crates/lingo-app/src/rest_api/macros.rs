/// Generates list/get/create/update/delete handlers, their docs and router for an entity
/// whose repository soft deletes records. Update and delete take the record id in the body.
#[macro_export]
macro_rules! crud_api {
    ($entity:ty, $repository:ty, $create:ty, $update:ty) => {
        $crate::repository_from_request!($repository);

        pub mod crud_api {
            use super::*;
            use $crate::error::ApiResult;
            use $crate::rest_api::{Paging, RecordId, WithId};
            use $crate::validate::Valid;
            use axum::{
                extract::{Path, Query},
                response::IntoResponse,
                Json,
            };
            use http::StatusCode;
            #[cfg(feature = "openapi")]
            use lingo_dal::Page;
            use lingo_types::claim::ApiClaim;
            use tracing::debug;

            #[cfg_attr(feature = "openapi", utoipa::path(get, path = "", tag = stringify!($entity), operation_id = concat!("list", stringify!($entity)),
                params(Paging), responses((status = StatusCode::OK, description = "List paginated", body = Page<$entity>))))]
            pub async fn list(
                repository: $repository,
                Valid(Query(paging)): Valid<Query<Paging>>,
            ) -> ApiResult<impl IntoResponse> {
                let page = repository.list(&paging.into_page_request()?).await?;
                Ok((StatusCode::OK, Json(page)))
            }

            #[cfg_attr(feature = "openapi", utoipa::path(get, path = "/{id}", tag = stringify!($entity), operation_id = concat!("get", stringify!($entity)),
                params(("id" = i64, Path, description = "Record id")),
                responses((status = StatusCode::OK, description = "Get one", body = $entity))))]
            pub async fn get(
                Valid(Path(RecordId { id })): Valid<Path<RecordId>>,
                repository: $repository,
            ) -> ApiResult<impl IntoResponse> {
                let record = repository.get(id).await?;
                Ok((StatusCode::OK, Json(record)))
            }

            #[cfg_attr(feature = "openapi", utoipa::path(post, path = "/create", tag = stringify!($entity), operation_id = concat!("create", stringify!($entity)),
                request_body = $create,
                responses((status = StatusCode::CREATED, description = concat!("Created ", stringify!($entity)), body = $entity))))]
            pub async fn create(
                claim: ApiClaim,
                repository: $repository,
                Valid(Json(payload)): Valid<Json<$create>>,
            ) -> ApiResult<impl IntoResponse> {
                let record = repository.create(payload).await?;
                debug!("{} {} created by user {}", stringify!($entity), record.id, claim.sub);
                Ok((StatusCode::CREATED, Json(record)))
            }

            #[cfg_attr(feature = "openapi", utoipa::path(put, path = "/update", tag = stringify!($entity), operation_id = concat!("update", stringify!($entity)),
                request_body = WithId<$update>,
                responses((status = StatusCode::OK, description = concat!("Updated ", stringify!($entity)), body = $entity))))]
            pub async fn update(
                _claim: ApiClaim,
                repository: $repository,
                Valid(Json(payload)): Valid<Json<WithId<$update>>>,
            ) -> ApiResult<impl IntoResponse> {
                let record = repository.update(payload.id, payload.changes).await?;
                Ok((StatusCode::OK, Json(record)))
            }

            #[cfg_attr(feature = "openapi", utoipa::path(delete, path = "/delete", tag = stringify!($entity), operation_id = concat!("delete", stringify!($entity)),
                request_body = RecordId,
                responses((status = StatusCode::OK, description = concat!("Removed ", stringify!($entity)), body = $entity))))]
            pub async fn delete(
                claim: ApiClaim,
                repository: $repository,
                Valid(Json(payload)): Valid<Json<RecordId>>,
            ) -> ApiResult<impl IntoResponse> {
                let record = repository.delete(payload.id).await?;
                debug!("{} {} removed by user {}", stringify!($entity), payload.id, claim.sub);
                Ok((StatusCode::OK, Json(record)))
            }

            #[cfg(feature = "openapi")]
            #[derive(utoipa::OpenApi)]
            #[openapi(paths(list, get, create, update, delete))]
            struct ApiDocs;

            #[cfg(feature = "openapi")]
            pub fn api_docs() -> utoipa::openapi::OpenApi {
                use utoipa::OpenApi as _;
                ApiDocs::openapi()
            }
        }

        #[cfg(feature = "openapi")]
        pub use crud_api::api_docs;

        pub fn router() -> axum::Router<$crate::state::AppState> {
            use axum::routing::{delete, get, post, put};
            axum::Router::new()
                .route("/", get(crud_api::list))
                .route("/create", post(crud_api::create))
                .route("/update", put(crud_api::update))
                .route("/delete", delete(crud_api::delete))
                .route("/{id}", get(crud_api::get))
        }
    };
}

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use http::StatusCode;
use lingo_dal::ErrorKind;
use serde_json::json;
use tracing::{debug, error};

pub type ApiResult<T, E = ApiError> = std::result::Result<T, E>;

const INTERNAL_ERROR_MSG: &str = "Internal server error";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    DatabaseError(#[from] lingo_dal::Error),

    #[error("{}", report_message(.0))]
    ValidationError(#[from] garde::Report),

    #[error("{0}")]
    InvalidRequest(String),

    #[error("{0}")]
    InvalidQuery(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("{0}")]
    Internal(#[from] anyhow::Error),
}

/// Joins report items to `path: message` list separated by `. `
pub fn report_message(report: &garde::Report) -> String {
    report
        .iter()
        .map(|(path, error)| {
            let path = path.to_string();
            if path.is_empty() {
                error.message().to_string()
            } else {
                format!("{path}: {}", error.message())
            }
        })
        .collect::<Vec<_>>()
        .join(". ")
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::DatabaseError(e) => match e.kind() {
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::Invalid => StatusCode::BAD_REQUEST,
                ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::ValidationError(_)
            | ApiError::InvalidRequest(_)
            | ApiError::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::DatabaseError(lingo_dal::Error::ValidationError(report)) => {
                report_message(report)
            }
            e => e.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("Request failed: {self}");
            INTERNAL_ERROR_MSG.to_string()
        } else {
            debug!("Request rejected with {status}: {self}");
            self.message()
        };
        (status, Json(json!({ "message": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(items: &[(&str, &str)]) -> garde::Report {
        let mut report = garde::Report::new();
        for (path, message) in items {
            let path = if path.is_empty() {
                garde::Path::empty()
            } else {
                garde::Path::new(*path)
            };
            report.append(path, garde::Error::new(*message));
        }
        report
    }

    #[test]
    fn test_report_message() {
        let r = report(&[("name", "length is lower than 1"), ("code", "too long")]);
        assert_eq!(
            report_message(&r),
            "name: length is lower than 1. code: too long"
        );
        let r = report(&[("", "key must not be blank")]);
        assert_eq!(report_message(&r), "key must not be blank");
    }

    #[test]
    fn test_status_mapping() {
        let e = ApiError::from(lingo_dal::Error::RecordNotFound("Course".into()));
        assert_eq!(e.status(), StatusCode::NOT_FOUND);
        assert_eq!(e.to_string(), "Course not found");

        let e = ApiError::from(lingo_dal::Error::InvalidLanguageCode("xx".into()));
        assert_eq!(e.status(), StatusCode::BAD_REQUEST);

        let e = ApiError::from(lingo_dal::Error::InvalidStoredData("broken".into()));
        assert_eq!(e.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let e = ApiError::from(lingo_dal::Error::ValidationError(report(&[(
            "name",
            "too short",
        )])));
        assert_eq!(e.message(), "name: too short");
    }

    #[tokio::test]
    #[tracing_test::traced_test]
    async fn test_internal_error_masked() {
        let response = ApiError::from(anyhow::anyhow!("disk on fire")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = axum::body::to_bytes(response.into_body(), 1024)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["message"], INTERNAL_ERROR_MSG);
        assert!(logs_contain("disk on fire"));
    }
}

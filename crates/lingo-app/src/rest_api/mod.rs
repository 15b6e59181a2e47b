use garde::Validate;
use serde::Deserialize;

mod macros;

pub mod course;
pub mod language;
mod paging;
pub mod subject;
pub mod translation;

pub use paging::{Paging, SortOrder};

/// Body of requests addressing a single record
#[derive(Debug, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RecordId {
    #[garde(range(min = 1))]
    pub id: i64,
}

/// Update body, record id together with changed fields.
///
/// Only the id is checked here, changes are validated by the repository.
#[derive(Debug, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct WithId<T> {
    #[garde(range(min = 1))]
    pub id: i64,
    #[serde(flatten)]
    #[garde(skip)]
    pub changes: T,
}

#[cfg(test)]
mod tests {
    use lingo_dal::subject::UpdateSubject;

    use super::*;

    #[test]
    fn test_update_body() {
        let body: WithId<UpdateSubject> =
            serde_json::from_str(r#"{"id": 3, "name": "Physics"}"#).unwrap();
        assert_eq!(body.id, 3);
        assert_eq!(body.changes.name.as_deref(), Some("Physics"));
        assert!(body.changes.description.is_none());
        assert!(body.validate().is_ok());
    }

    #[test]
    fn test_update_body_needs_positive_id() {
        let body: WithId<UpdateSubject> = serde_json::from_str(r#"{"id": 0}"#).unwrap();
        let report = body.validate().unwrap_err();
        let paths: Vec<String> = report.iter().map(|(path, _)| path.to_string()).collect();
        assert_eq!(paths, ["id"]);
    }
}

use std::{fmt::Display, str::FromStr};

use crate::{
    error::Result,
    language::blank_report,
    store::{Changes, Collection, Value},
    ChosenDB, ChosenRow, Error, Filter, Page, PageRequest,
};
use garde::Validate;
use serde::{Deserialize, Serialize};
use sqlx::{Pool, Row};
use time::OffsetDateTime;
use tracing::debug;

pub(crate) const COURSES: Collection = Collection {
    entity: "Course",
    table: "course",
    alias: "c",
    joins: "JOIN subject s ON s.id = c.subject_id",
    columns: "c.id, c.name, c.description, c.status, c.remove_date, \
              s.id AS subject_id, s.name AS subject_name",
    fields: &[
        ("id", "c.id"),
        ("name", "c.name"),
        ("description", "c.description"),
        ("status", "c.status"),
        ("subject", "c.subject_id"),
        ("removeDate", "c.remove_date"),
    ],
    soft_delete: Some("remove_date"),
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum CourseStatus {
    #[default]
    Active,
    Closed,
}

impl CourseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CourseStatus::Active => "active",
            CourseStatus::Closed => "closed",
        }
    }
}

impl Display for CourseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CourseStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(CourseStatus::Active),
            "closed" => Ok(CourseStatus::Closed),
            other => Err(format!("Invalid course status: {other}")),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CreateCourse {
    #[garde(length(min = 1, max = 255))]
    pub name: String,
    #[garde(length(max = 4096))]
    #[serde(default)]
    pub description: String,
    /// Id of subject the course belongs to
    #[garde(range(min = 1))]
    pub subject: i64,
    #[garde(skip)]
    #[serde(default)]
    pub status: CourseStatus,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UpdateCourse {
    #[garde(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[garde(length(max = 4096))]
    pub description: Option<String>,
    #[garde(range(min = 1))]
    pub subject: Option<i64>,
    #[garde(skip)]
    pub status: Option<CourseStatus>,
}

impl Changes for UpdateCourse {
    fn changes(&self) -> Vec<(&'static str, Value)> {
        let mut changes = Vec::new();
        if let Some(name) = &self.name {
            changes.push(("name", name.trim().into()));
        }
        if let Some(description) = &self.description {
            changes.push(("description", description.as_str().into()));
        }
        if let Some(subject) = self.subject {
            changes.push(("subject_id", subject.into()));
        }
        if let Some(status) = self.status {
            changes.push(("status", status.as_str().into()));
        }
        changes
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SubjectShort {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub status: CourseStatus,
    pub subject: SubjectShort,
    #[serde(with = "time::serde::rfc3339::option", default)]
    pub remove_date: Option<OffsetDateTime>,
}

impl sqlx::FromRow<'_, ChosenRow> for Course {
    fn from_row(row: &ChosenRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            status: row.try_get("status")?,
            subject: SubjectShort {
                id: row.try_get("subject_id")?,
                name: row.try_get("subject_name")?,
            },
            remove_date: row.try_get("remove_date")?,
        })
    }
}

pub type CourseRepository = CourseRepositoryImpl<Pool<ChosenDB>>;

pub struct CourseRepositoryImpl<E> {
    executor: E,
}

impl<'c, E> CourseRepositoryImpl<E>
where
    for<'a> &'a E: sqlx::Executor<'c, Database = ChosenDB>,
{
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    async fn check_subject(&self, subject_id: i64) -> Result<()> {
        let found: Option<i64> =
            sqlx::query_scalar("SELECT id FROM subject WHERE id = ? AND remove_date IS NULL")
                .bind(subject_id)
                .fetch_optional(&self.executor)
                .await?;
        found
            .map(|_| ())
            .ok_or_else(|| Error::not_found(crate::subject::SUBJECTS.entity))
    }

    pub async fn create(&self, payload: CreateCourse) -> Result<Course> {
        payload.validate()?;
        let name = payload.name.trim();
        if name.is_empty() {
            return Err(Error::ValidationError(blank_report("name")));
        }
        self.check_subject(payload.subject).await?;
        let result = sqlx::query(
            "INSERT INTO course (name, description, status, subject_id) VALUES (?, ?, ?, ?)",
        )
        .bind(name)
        .bind(&payload.description)
        .bind(payload.status)
        .bind(payload.subject)
        .execute(&self.executor)
        .await?;
        let id = result.last_insert_rowid();
        debug!("Created course {name} with id {id}");
        self.get(id).await
    }

    pub async fn get(&self, id: i64) -> Result<Course> {
        COURSES.get_by_id_or_fail(&self.executor, id).await
    }

    pub async fn list(&self, request: &PageRequest) -> Result<Page<Course>> {
        COURSES.fetch_page(&self.executor, request).await
    }

    pub async fn find_by_subject(
        &self,
        subject_id: i64,
        request: PageRequest,
    ) -> Result<Page<Course>> {
        let request = request.with_filter(Filter::eq("subject", subject_id.to_string()));
        COURSES.fetch_page(&self.executor, &request).await
    }

    pub async fn update(&self, id: i64, payload: UpdateCourse) -> Result<Course> {
        if payload.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(Error::ValidationError(blank_report("name")));
        }
        if let Some(subject_id) = payload.subject {
            self.check_subject(subject_id).await?;
        }
        COURSES
            .update_by_id_or_fail(&self.executor, id, &payload)
            .await
    }

    /// Soft delete, record stays in database with removal timestamp
    pub async fn delete(&self, id: i64) -> Result<Course> {
        let course: Course = COURSES.soft_delete_by_id_or_fail(&self.executor, id).await?;
        debug!("Removed course {id}");
        Ok(course)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse() {
        assert_eq!("Closed ".parse::<CourseStatus>().unwrap(), CourseStatus::Closed);
        assert!("archived".parse::<CourseStatus>().is_err());
        assert_eq!(CourseStatus::default().to_string(), "active");
    }

    #[test]
    fn test_changes_use_columns() {
        let update = UpdateCourse {
            subject: Some(2),
            status: Some(CourseStatus::Closed),
            ..Default::default()
        };
        let changes = update.changes();
        assert_eq!(
            changes,
            vec![
                ("subject_id", Value::Integer(2)),
                ("status", Value::Text("closed".into()))
            ]
        );
    }
}

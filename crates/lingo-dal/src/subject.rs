use crate::{
    error::Result,
    store::{Changes, Collection, Value},
    ChosenDB, Error, Page, PageRequest,
};
use garde::Validate;
use serde::{Deserialize, Serialize};
use sqlx::Pool;
use time::OffsetDateTime;
use tracing::debug;

pub(crate) const SUBJECTS: Collection = Collection {
    entity: "Subject",
    table: "subject",
    alias: "s",
    joins: "",
    columns: "s.id, s.name, s.description, s.remove_date",
    fields: &[
        ("id", "s.id"),
        ("name", "s.name"),
        ("description", "s.description"),
        ("removeDate", "s.remove_date"),
    ],
    soft_delete: Some("remove_date"),
};

#[derive(Debug, Serialize, Deserialize, Clone, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CreateSubject {
    #[garde(length(min = 1, max = 255))]
    pub name: String,
    #[garde(length(max = 4096))]
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UpdateSubject {
    #[garde(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[garde(length(max = 4096))]
    pub description: Option<String>,
}

impl Changes for UpdateSubject {
    fn changes(&self) -> Vec<(&'static str, Value)> {
        let mut changes = Vec::new();
        if let Some(name) = &self.name {
            changes.push(("name", name.trim().into()));
        }
        if let Some(description) = &self.description {
            changes.push(("description", description.as_str().into()));
        }
        changes
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, sqlx::FromRow)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: i64,
    pub name: String,
    pub description: String,
    #[serde(with = "time::serde::rfc3339::option", default)]
    pub remove_date: Option<OffsetDateTime>,
}

pub type SubjectRepository = SubjectRepositoryImpl<Pool<ChosenDB>>;

pub struct SubjectRepositoryImpl<E> {
    executor: E,
}

impl<'c, E> SubjectRepositoryImpl<E>
where
    for<'a> &'a E: sqlx::Executor<'c, Database = ChosenDB>,
{
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    pub async fn create(&self, payload: CreateSubject) -> Result<Subject> {
        payload.validate()?;
        let name = payload.name.trim();
        if name.is_empty() {
            return Err(Error::ValidationError(crate::language::blank_report("name")));
        }
        let result = sqlx::query("INSERT INTO subject (name, description) VALUES (?, ?)")
            .bind(name)
            .bind(&payload.description)
            .execute(&self.executor)
            .await?;
        let id = result.last_insert_rowid();
        debug!("Created subject {name} with id {id}");
        self.get(id).await
    }

    pub async fn get(&self, id: i64) -> Result<Subject> {
        SUBJECTS.get_by_id_or_fail(&self.executor, id).await
    }

    pub async fn list(&self, request: &PageRequest) -> Result<Page<Subject>> {
        SUBJECTS.fetch_page(&self.executor, request).await
    }

    pub async fn update(&self, id: i64, payload: UpdateSubject) -> Result<Subject> {
        if payload.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(Error::ValidationError(crate::language::blank_report("name")));
        }
        SUBJECTS
            .update_by_id_or_fail(&self.executor, id, &payload)
            .await
    }

    /// Soft delete, record stays in database with removal timestamp
    pub async fn delete(&self, id: i64) -> Result<Subject> {
        let subject: Subject = SUBJECTS
            .soft_delete_by_id_or_fail(&self.executor, id)
            .await?;
        debug!("Removed subject {id}");
        Ok(subject)
    }
}

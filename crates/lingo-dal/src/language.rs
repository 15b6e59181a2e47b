use crate::{
    error::Result,
    store::{Changes, Collection, Value},
    Error, Page, PageRequest,
};
use garde::Validate;
use lingo_types::general::{normalize, LanguageCode};
use serde::{Deserialize, Serialize};
use sqlx::Pool;
use tracing::debug;

const DUPLICATE_MSG: &str = "This language already exists";

pub(crate) const LANGUAGES: Collection = Collection {
    entity: "Language",
    table: "language",
    alias: "l",
    joins: "",
    columns: "l.id, l.name, l.code",
    fields: &[("id", "l.id"), ("name", "l.name"), ("code", "l.code")],
    soft_delete: None,
};

#[derive(Debug, Serialize, Deserialize, Clone, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CreateLanguage {
    #[garde(length(min = 1, max = 255))]
    pub name: String,
    #[garde(length(min = 1, max = 16))]
    pub code: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UpdateLanguage {
    #[garde(length(min = 1, max = 255))]
    pub name: String,
}

impl Changes for UpdateLanguage {
    fn changes(&self) -> Vec<(&'static str, Value)> {
        vec![("name", normalize(&self.name).into())]
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, sqlx::FromRow)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Language {
    pub id: i64,
    pub name: String,
    pub code: String,
}

pub type LanguageRepository = LanguageRepositoryImpl<Pool<crate::ChosenDB>>;

pub struct LanguageRepositoryImpl<E> {
    executor: E,
}

impl<'c, E> LanguageRepositoryImpl<E>
where
    for<'a> &'a E: sqlx::Executor<'c, Database = crate::ChosenDB>,
{
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    pub async fn create(&self, payload: CreateLanguage) -> Result<Language> {
        payload.validate()?;
        let name = normalize(&payload.name);
        let code = LanguageCode::new(&payload.code);
        if name.is_empty() {
            return Err(Error::ValidationError(blank_report("name")));
        }
        if code.is_empty() {
            return Err(Error::ValidationError(blank_report("code")));
        }
        let result = sqlx::query("INSERT INTO language (name, code) VALUES (?, ?)")
            .bind(&name)
            .bind(code.as_str())
            .execute(&self.executor)
            .await
            .map_err(Error::on_duplicate(DUPLICATE_MSG))?;

        let id = result.last_insert_rowid();
        debug!("Created language {code} with id {id}");
        self.get(id).await
    }

    /// Language is identified by its code, only name can change
    pub async fn update(&self, code: &str, payload: UpdateLanguage) -> Result<Language> {
        if normalize(&payload.name).is_empty() {
            return Err(Error::ValidationError(blank_report("name")));
        }
        let language = self.get_by_code(code).await?;
        LANGUAGES
            .update_by_id_or_fail(&self.executor, language.id, &payload)
            .await
    }

    pub async fn list(&self, request: &PageRequest) -> Result<Page<Language>> {
        LANGUAGES.fetch_page(&self.executor, request).await
    }

    pub async fn get(&self, id: i64) -> Result<Language> {
        LANGUAGES.get_by_id_or_fail(&self.executor, id).await
    }

    pub async fn find_by_code(&self, code: &str) -> Result<Option<Language>> {
        let code = LanguageCode::new(code);
        let record = sqlx::query_as::<_, Language>(
            "SELECT l.id, l.name, l.code FROM language l WHERE l.code = ?",
        )
        .bind(code.as_str())
        .fetch_optional(&self.executor)
        .await?;
        Ok(record)
    }

    pub async fn get_by_code(&self, code: &str) -> Result<Language> {
        self.find_by_code(code)
            .await?
            .ok_or_else(|| Error::not_found(LANGUAGES.entity))
    }
}

/// Report for values which are blank once trimmed
pub(crate) fn blank_report(field: &str) -> garde::Report {
    let mut report = garde::Report::new();
    report.append(
        garde::Path::empty(),
        garde::Error::new(format!("{field} must not be blank")),
    );
    report
}

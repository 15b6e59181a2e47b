mod validation;

use std::collections::BTreeMap;

use crate::{error::Result, store::Collection, ChosenDB, Error, Page, PageRequest};
use garde::Validate;
use lingo_types::general::{LanguageCode, TranslationKey};
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, Acquire, Executor, Pool};
use tracing::{debug, error, warn};

use validation::{check_language_codes, merge_translations, normalize_key};

const DUPLICATE_MSG: &str = "A translation for this word already exists";

pub(crate) const TRANSLATIONS: Collection = Collection {
    entity: "Translation",
    table: "translation",
    alias: "t",
    joins: "",
    columns: "t.id, t.key, t.translations",
    fields: &[("id", "t.id"), ("key", "t.key")],
    soft_delete: None,
};

#[derive(Debug, Serialize, Deserialize, Clone, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CreateTranslation {
    #[garde(length(min = 1, max = 255))]
    pub key: String,
    #[garde(skip)]
    pub translations: BTreeMap<String, String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UpdateTranslation {
    /// New key, when the phrase itself is renamed
    #[garde(length(min = 1, max = 255))]
    pub key: Option<String>,
    #[garde(skip)]
    pub translations: Option<BTreeMap<String, String>>,
}

#[derive(Debug, sqlx::FromRow)]
struct TranslationRecord {
    id: i64,
    key: String,
    translations: Json<BTreeMap<String, String>>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Translation {
    pub id: i64,
    pub key: String,
    pub translations: BTreeMap<String, String>,
}

impl From<TranslationRecord> for Translation {
    fn from(value: TranslationRecord) -> Self {
        Self {
            id: value.id,
            key: value.key,
            translations: value.translations.0,
        }
    }
}

/// Translation with language codes as top level keys, e.g. `{"key": "hello", "en": "Hello"}`
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FlatTranslation {
    pub key: String,
    #[serde(flatten)]
    pub translations: BTreeMap<String, String>,
}

impl From<Translation> for FlatTranslation {
    fn from(value: Translation) -> Self {
        Self {
            key: value.key,
            translations: value.translations,
        }
    }
}

pub type TranslationRepository = TranslationRepositoryImpl<Pool<ChosenDB>>;

pub struct TranslationRepositoryImpl<E> {
    executor: E,
}

impl<'c, E> TranslationRepositoryImpl<E>
where
    for<'a> &'a E: Executor<'c, Database = ChosenDB> + Acquire<'c, Database = ChosenDB>,
{
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    /// Stores new translation, all language codes must be known, otherwise nothing is stored
    pub async fn create(&self, payload: CreateTranslation) -> Result<Translation> {
        payload.validate()?;
        let key = normalize_key(&payload.key)?;

        let mut tx = self.executor.begin().await?;
        let translations = check_language_codes(&mut tx, payload.translations).await?;
        let result = sqlx::query("INSERT INTO translation (key, translations) VALUES (?, ?)")
            .bind(key.as_str())
            .bind(Json(&translations))
            .execute(&mut *tx)
            .await
            .map_err(Error::on_duplicate(DUPLICATE_MSG))?;
        tx.commit().await?;

        let id = result.last_insert_rowid();
        debug!("Created translation {key} with id {id}");
        self.get(id).await
    }

    /// Updates translation found by key. Included language codes are checked and merged into
    /// stored ones, codes not included stay untouched. Any unknown code cancels whole update.
    pub async fn update(&self, key: &str, payload: UpdateTranslation) -> Result<Translation> {
        payload.validate()?;
        let current_key = TranslationKey::new(key);
        let new_key = payload.key.as_deref().map(normalize_key).transpose()?;

        let mut tx = self.executor.begin().await?;
        let stored = sqlx::query_as::<_, TranslationRecord>(
            "SELECT t.id, t.key, t.translations FROM translation t WHERE t.key = ?",
        )
        .bind(current_key.as_str())
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| Error::not_found(TRANSLATIONS.entity))?;

        let translations = match payload.translations {
            Some(changes) => {
                let changes = check_language_codes(&mut tx, changes).await?;
                merge_translations(stored.translations.0, changes)
            }
            None => stored.translations.0,
        };
        let key = new_key.unwrap_or(current_key);

        sqlx::query("UPDATE translation SET key = ?, translations = ? WHERE id = ?")
            .bind(key.as_str())
            .bind(Json(&translations))
            .bind(stored.id)
            .execute(&mut *tx)
            .await
            .map_err(Error::on_duplicate(DUPLICATE_MSG))?;
        tx.commit().await?;

        self.get(stored.id).await
    }

    pub async fn list(&self, request: &PageRequest) -> Result<Page<Translation>> {
        let page = TRANSLATIONS
            .fetch_page::<_, TranslationRecord>(&self.executor, request)
            .await?;
        Ok(page.map(Translation::from))
    }

    pub async fn get(&self, id: i64) -> Result<Translation> {
        TRANSLATIONS
            .get_by_id_or_fail::<_, TranslationRecord>(&self.executor, id)
            .await
            .map(Translation::from)
    }

    pub async fn find_by_key(&self, key: &str) -> Result<Option<Translation>> {
        let key = TranslationKey::new(key);
        let record = sqlx::query_as::<_, TranslationRecord>(
            "SELECT t.id, t.key, t.translations FROM translation t WHERE t.key = ?",
        )
        .bind(key.as_str())
        .fetch_optional(&self.executor)
        .await?;
        Ok(record.map(Translation::from))
    }

    /// Text of phrase in given language. Missing translation is not an error,
    /// it is logged and the key is returned as it was given.
    pub async fn translate(&self, key: &str, language_code: &str) -> String {
        let normalized_key = TranslationKey::new(key);
        let code = LanguageCode::new(language_code);
        match self.find_by_key(normalized_key.as_str()).await {
            Ok(Some(translation)) => {
                if let Some(text) = translation
                    .translations
                    .get(code.as_str())
                    .filter(|t| !t.is_empty())
                {
                    return text.clone();
                }
            }
            Ok(None) => {}
            Err(e) => error!("Translation lookup for '{normalized_key}' failed: {e}"),
        }
        warn!(
            "Asked for a translation for the word '{normalized_key}' to the language '{code}' and it is unavailable."
        );
        key.to_string()
    }
}

use std::{collections::BTreeMap, path::PathBuf};

use anyhow::Context as _;
use clap::Parser;
use lingo_dal::{
    language::{CreateLanguage, LanguageRepository},
    translation::{CreateTranslation, TranslationRepository, UpdateTranslation},
    Pool,
};
use lingo_types::config::BackendConfig;
use serde::Deserialize;
use tracing::{debug, info};

use crate::commands::{open_database, Executor};

#[derive(Parser, Debug)]
pub struct SeedCmd {
    #[command(flatten)]
    backend: BackendConfig,
    #[arg(
        short,
        long,
        help = "JSON file with `languages` and `translations` arrays, built-in demo data if not given"
    )]
    file: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Default)]
pub struct SeedData {
    #[serde(default)]
    pub languages: Vec<CreateLanguage>,
    #[serde(default)]
    pub translations: Vec<CreateTranslation>,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub languages_created: usize,
    pub translations_created: usize,
    pub translations_updated: usize,
}

impl SeedData {
    pub fn demo() -> Self {
        let languages = [("english", "en"), ("español", "es"), ("français", "fr")]
            .into_iter()
            .map(|(name, code)| CreateLanguage {
                name: name.to_string(),
                code: code.to_string(),
            })
            .collect();
        let translations = [
            ("hello", [("en", "hello"), ("es", "hola"), ("fr", "bonjour")]),
            (
                "welcome",
                [("en", "welcome"), ("es", "bienvenido"), ("fr", "bienvenue")],
            ),
        ]
        .into_iter()
        .map(|(key, texts)| CreateTranslation {
            key: key.to_string(),
            translations: texts
                .into_iter()
                .map(|(code, text)| (code.to_string(), text.to_string()))
                .collect::<BTreeMap<_, _>>(),
        })
        .collect();
        SeedData {
            languages,
            translations,
        }
    }

    /// Languages go first so translations pass code validation.
    /// Existing languages are kept, existing translations get missing texts merged in.
    pub async fn load(self, pool: Pool) -> anyhow::Result<SeedSummary> {
        let mut summary = SeedSummary::default();
        let languages = LanguageRepository::new(pool.clone());
        for language in self.languages {
            if languages.find_by_code(&language.code).await?.is_some() {
                debug!("Language {} already exists", language.code);
                continue;
            }
            languages.create(language).await?;
            summary.languages_created += 1;
        }

        let translations = TranslationRepository::new(pool);
        for translation in self.translations {
            if translations.find_by_key(&translation.key).await?.is_some() {
                translations
                    .update(
                        &translation.key,
                        UpdateTranslation {
                            key: None,
                            translations: Some(translation.translations),
                        },
                    )
                    .await?;
                summary.translations_updated += 1;
            } else {
                translations.create(translation).await?;
                summary.translations_created += 1;
            }
        }
        Ok(summary)
    }
}

impl Executor for SeedCmd {
    async fn run(self) -> anyhow::Result<()> {
        let data = match &self.file {
            Some(file) => {
                let content = tokio::fs::read(file)
                    .await
                    .with_context(|| format!("Cannot read seed file {}", file.display()))?;
                serde_json::from_slice::<SeedData>(&content)
                    .with_context(|| format!("Invalid seed file {}", file.display()))?
            }
            None => SeedData::demo(),
        };
        let pool = open_database(&self.backend).await?;
        let summary = data.load(pool).await?;
        info!(
            "Seeded {} languages, {} new and {} updated translations",
            summary.languages_created, summary.translations_created, summary.translations_updated
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_pool() -> (tempfile::TempDir, Pool) {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().to_string_lossy().to_string();
        let backend =
            BackendConfig::try_parse_from(["seed", "--data-dir", data_dir.as_str()]).unwrap();
        let pool = open_database(&backend).await.unwrap();
        (dir, pool)
    }

    #[tokio::test]
    async fn test_demo_seed_is_repeatable() {
        let (_dir, pool) = test_pool().await;

        let summary = SeedData::demo().load(pool.clone()).await.unwrap();
        assert_eq!(
            summary,
            SeedSummary {
                languages_created: 3,
                translations_created: 2,
                translations_updated: 0
            }
        );

        let summary = SeedData::demo().load(pool.clone()).await.unwrap();
        assert_eq!(summary.languages_created, 0);
        assert_eq!(summary.translations_updated, 2);

        let translations = TranslationRepository::new(pool);
        assert_eq!(translations.translate("Hello", "es").await, "hola");
    }

    #[tokio::test]
    async fn test_seed_file_with_unknown_code_fails() {
        let (_dir, pool) = test_pool().await;
        let data: SeedData = serde_json::from_str(
            r#"{"languages": [{"name": "english", "code": "en"}],
                "translations": [{"key": "cat", "translations": {"en": "cat", "de": "Katze"}}]}"#,
        )
        .unwrap();
        assert!(data.load(pool.clone()).await.is_err());

        let translations = TranslationRepository::new(pool);
        assert!(translations.find_by_key("cat").await.unwrap().is_none());
    }
}

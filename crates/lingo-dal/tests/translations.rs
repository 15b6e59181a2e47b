mod common;

use std::collections::BTreeMap;

use lingo_dal::{
    translation::{CreateTranslation, FlatTranslation, TranslationRepositoryImpl, UpdateTranslation},
    Error, ErrorKind, PageRequest,
};
use tracing_test::traced_test;

fn texts(items: &[(&str, &str)]) -> BTreeMap<String, String> {
    items
        .iter()
        .map(|(code, text)| (code.to_string(), text.to_string()))
        .collect()
}

#[tokio::test]
async fn test_create_translation() {
    let conn = common::init_db().await;
    let repo = TranslationRepositoryImpl::new(conn);

    let translation = repo
        .create(CreateTranslation {
            key: " Good Bye ".into(),
            translations: texts(&[("EN", "Good bye"), ("es", "Adiós")]),
        })
        .await
        .unwrap();
    assert_eq!(translation.key, "good bye");
    assert_eq!(translation.translations, texts(&[("en", "Good bye"), ("es", "Adiós")]));

    assert_eq!(repo.translate("GOOD BYE", "es").await, "Adiós");
}

#[tokio::test]
async fn test_unknown_code_stores_nothing() {
    let conn = common::init_db().await;
    let repo = TranslationRepositoryImpl::new(conn);

    let err = repo
        .create(CreateTranslation {
            key: "thanks".into(),
            translations: texts(&[("en", "Thanks"), ("xx", "???")]),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidLanguageCode(_)));
    assert_eq!(err.to_string(), "xx is not a valid language code");
    assert_eq!(err.kind(), ErrorKind::Invalid);

    assert!(repo.find_by_key("thanks").await.unwrap().is_none());
}

#[tokio::test]
async fn test_repeated_code_stores_nothing() {
    let conn = common::init_db().await;
    let repo = TranslationRepositoryImpl::new(conn);

    let err = repo
        .create(CreateTranslation {
            key: "thanks".into(),
            translations: texts(&[("EN", "Thanks"), ("en", "Thank you")]),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, Error::DuplicateLanguageCode(ref code) if code == "en"));
    assert_eq!(err.kind(), ErrorKind::Invalid);
    assert!(repo.find_by_key("thanks").await.unwrap().is_none());
}

#[tokio::test]
async fn test_duplicate_translation() {
    let conn = common::init_db().await;
    let repo = TranslationRepositoryImpl::new(conn);

    let err = repo
        .create(CreateTranslation {
            key: "HELLO".into(),
            translations: texts(&[("en", "Hi")]),
        })
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "A translation for this word already exists");
}

#[tokio::test]
async fn test_update_merges_codes() {
    let conn = common::init_db().await;
    let repo = TranslationRepositoryImpl::new(conn);

    let updated = repo
        .update(
            "Welcome",
            UpdateTranslation {
                key: None,
                translations: Some(texts(&[("FR", "Bienvenue"), ("es", "Bienvenidos")])),
            },
        )
        .await
        .unwrap();
    assert_eq!(
        updated.translations,
        texts(&[("en", "Welcome"), ("es", "Bienvenidos"), ("fr", "Bienvenue")])
    );

    let renamed = repo
        .update(
            "welcome",
            UpdateTranslation {
                key: Some("Greeting".into()),
                translations: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.key, "greeting");
    assert_eq!(renamed.translations, updated.translations);
}

#[tokio::test]
async fn test_update_with_invalid_code_applies_nothing() {
    let conn = common::init_db().await;
    let repo = TranslationRepositoryImpl::new(conn);

    let err = repo
        .update(
            "hello",
            UpdateTranslation {
                key: Some("hi".into()),
                translations: Some(texts(&[("en", "Hi"), ("de", "Hallo")])),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidLanguageCode(ref code) if code == "de"));

    let stored = repo.find_by_key("hello").await.unwrap().unwrap();
    assert_eq!(stored.translations["en"], "Hello");
    assert!(repo.find_by_key("hi").await.unwrap().is_none());
}

#[tokio::test]
async fn test_update_missing_translation() {
    let conn = common::init_db().await;
    let repo = TranslationRepositoryImpl::new(conn);

    let err = repo
        .update("nothing", UpdateTranslation::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
#[traced_test]
async fn test_translate_fallback() {
    let conn = common::init_db().await;
    let repo = TranslationRepositoryImpl::new(conn);

    assert_eq!(repo.translate(" HELLO", "FR").await, "Bonjour");
    assert_eq!(repo.translate("MissingKey", "en").await, "MissingKey");
    assert!(logs_contain(
        "Asked for a translation for the word 'missingkey' to the language 'en' and it is unavailable."
    ));

    assert_eq!(repo.translate("welcome", "fr").await, "welcome");
    assert!(logs_contain("to the language 'fr' and it is unavailable"));
}

#[tokio::test]
async fn test_flat_listing() {
    let conn = common::init_db().await;
    let repo = TranslationRepositoryImpl::new(conn);

    let page = repo.list(&PageRequest::new(1, 1)).await.unwrap();
    assert_eq!(page.total, 2);
    assert_eq!(page.total_pages, 2);

    let flat = page.map(FlatTranslation::from);
    let json = serde_json::to_value(&flat).unwrap();
    assert_eq!(json["data"][0]["key"], "hello");
    assert_eq!(json["data"][0]["es"], "Hola");
    assert_eq!(json["pageSize"], 1);
}

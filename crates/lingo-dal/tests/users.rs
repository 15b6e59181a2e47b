mod common;

use lingo_dal::user::{ExternalUser, UserRepositoryImpl};

#[tokio::test]
async fn test_find_or_create_by_google_id() {
    let repo = UserRepositoryImpl::new(common::init_db().await);
    let identity = ExternalUser {
        google_id: "1234567890".into(),
        name: "John Doe".into(),
        email: Some("john@example.com".into()),
    };

    let user = repo.find_or_create_by_google_id(identity.clone()).await.unwrap();
    assert_eq!(user.google_id.as_deref(), Some("1234567890"));

    let again = repo.find_or_create_by_google_id(identity).await.unwrap();
    assert_eq!(again.id, user.id);

    let found = repo.find_by_google_id("1234567890").await.unwrap();
    assert_eq!(found, Some(user));
    assert!(repo.find_by_google_id("other").await.unwrap().is_none());
}

#[tokio::test]
async fn test_invalid_identity() {
    let repo = UserRepositoryImpl::new(common::init_db().await);
    let identity = ExternalUser {
        google_id: "1".into(),
        name: "Bad Mail".into(),
        email: Some("not-an-email".into()),
    };
    assert!(repo.find_or_create_by_google_id(identity).await.is_err());
}

use futures::TryStreamExt as _;
use sqlx::Executor;

const TEST_DATA: &str = r#"
INSERT INTO language (id, name, code) VALUES (1, 'english', 'en');
INSERT INTO language (id, name, code) VALUES (2, 'español', 'es');
INSERT INTO language (id, name, code) VALUES (3, 'français', 'fr');

INSERT INTO translation (id, key, translations)
VALUES (1, 'hello', '{"en":"Hello","es":"Hola","fr":"Bonjour"}');
INSERT INTO translation (id, key, translations)
VALUES (2, 'welcome', '{"en":"Welcome","es":"Bienvenido"}');

INSERT INTO subject (id, name, description) VALUES (1, 'Languages', 'Foreign languages');
INSERT INTO subject (id, name, description) VALUES (2, 'Math', '');

INSERT INTO course (id, name, description, status, subject_id) VALUES (1, 'Spanish A1', '', 'active', 1);
INSERT INTO course (id, name, description, status, subject_id) VALUES (2, 'French A1', '', 'active', 1);
INSERT INTO course (id, name, description, status, subject_id) VALUES (3, 'Algebra', '', 'closed', 2);
"#;

pub async fn init_db() -> sqlx::Pool<sqlx::Sqlite> {
    const DB_URL: &str = "sqlite::memory:";
    let conn = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .connect(DB_URL)
        .await
        .unwrap();
    conn.execute("PRAGMA foreign_keys = ON").await.unwrap();
    lingo_dal::migrate(&conn).await.unwrap();

    conn.execute_many(TEST_DATA)
        .try_collect::<Vec<_>>()
        .await
        .unwrap();

    conn
}

use garde::Validate;
use serde::{Deserialize, Serialize};
use sqlx::Pool;
use tracing::{debug, info};

use crate::{error::Result, ChosenDB, Error};

/// Identity as received from external provider
#[derive(Debug, Serialize, Deserialize, Clone, Validate)]
pub struct ExternalUser {
    #[garde(length(min = 1, max = 255))]
    pub google_id: String,
    #[garde(length(max = 255))]
    pub name: String,
    #[garde(email)]
    pub email: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, sqlx::FromRow)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub google_id: Option<String>,
}

pub type UserRepository = UserRepositoryImpl<Pool<ChosenDB>>;

pub struct UserRepositoryImpl<E> {
    executor: E,
}

impl<'c, E> UserRepositoryImpl<E>
where
    for<'a> &'a E: sqlx::Executor<'c, Database = ChosenDB>,
{
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    pub async fn get(&self, id: i64) -> Result<User> {
        sqlx::query_as::<_, User>("SELECT id, name, email, google_id FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.executor)
            .await?
            .ok_or_else(|| Error::not_found("User"))
    }

    pub async fn find_by_google_id(&self, google_id: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, google_id FROM users WHERE google_id = ?",
        )
        .bind(google_id)
        .fetch_optional(&self.executor)
        .await?;
        Ok(user)
    }

    /// Existing user for given google id, new one is created on first login
    pub async fn find_or_create_by_google_id(&self, identity: ExternalUser) -> Result<User> {
        identity.validate()?;
        if let Some(user) = self.find_by_google_id(&identity.google_id).await? {
            debug!("Found user {} for google id", user.id);
            return Ok(user);
        }
        let result = sqlx::query("INSERT INTO users (name, email, google_id) VALUES (?, ?, ?)")
            .bind(&identity.name)
            .bind(&identity.email)
            .bind(&identity.google_id)
            .execute(&self.executor)
            .await;
        match result {
            Ok(result) => {
                let id = result.last_insert_rowid();
                info!("New user {} created with id {id}", identity.name);
                self.get(id).await
            }
            // concurrent first login of same account
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => self
                .find_by_google_id(&identity.google_id)
                .await?
                .ok_or(Error::DuplicateRecord("User with this email already exists")),
            Err(e) => Err(e.into()),
        }
    }
}

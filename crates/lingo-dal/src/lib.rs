pub mod course;
pub mod error;
pub mod language;
pub mod paging;
pub mod store;
pub mod subject;
pub mod translation;
pub mod user;

use std::{fmt::Display, str::FromStr};

pub use error::{Error, ErrorKind};
pub use paging::{Page, PageRequest};
pub use sqlx::Error as SqlxError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use crate::error::Result;

pub type ChosenDB = sqlx::Sqlite;
pub type ChosenRow = sqlx::sqlite::SqliteRow;
pub type ChosenConnection = sqlx::SqliteConnection;
pub type Pool = sqlx::Pool<ChosenDB>;

pub async fn new_pool(database_url: &str) -> Result<Pool, Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(50)
        .connect_with(options)
        .await?;
    Ok(pool)
}

/// Applies pending schema migrations
pub async fn migrate(pool: &Pool) -> Result<()> {
    sqlx::migrate!("../../migrations").run(pool).await?;
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Order {
    Asc(String),
    Desc(String),
}

impl Order {
    fn with_column(&self, column: &str) -> String {
        match self {
            Order::Asc(_) => column.to_string(),
            Order::Desc(_) => format!("{} DESC", column),
        }
    }
}

impl Display for Order {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Order::Asc(s) => write!(f, "{}", s),
            Order::Desc(s) => write!(f, "{} DESC", s),
        }
    }
}

impl AsRef<str> for Order {
    fn as_ref(&self) -> &str {
        match self {
            Order::Asc(s) => s.as_str(),
            Order::Desc(s) => s.as_str(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Ne,
}

/// Condition on a public field, `None` value stands for null
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub field: String,
    pub op: FilterOp,
    pub value: Option<String>,
}

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl Into<String>) -> Self {
        Filter {
            field: field.into(),
            op: FilterOp::Eq,
            value: Some(value.into()),
        }
    }

    pub fn is_null(field: impl Into<String>) -> Self {
        Filter {
            field: field.into(),
            op: FilterOp::Eq,
            value: None,
        }
    }

    pub fn is_not_null(field: impl Into<String>) -> Self {
        Filter {
            field: field.into(),
            op: FilterOp::Ne,
            value: None,
        }
    }
}

impl FromStr for Filter {
    type Err = Error;

    /// Parses `field=value`, `field!=value`, `null` value matches missing values
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (field, op, value) = if let Some((field, value)) = s.split_once("!=") {
            (field, FilterOp::Ne, value)
        } else if let Some((field, value)) = s.split_once('=') {
            (field, FilterOp::Eq, value)
        } else {
            return Err(Error::InvalidFilter(s.to_string()));
        };
        let field = field.trim();
        if field.is_empty() {
            return Err(Error::InvalidFilter(s.to_string()));
        }
        let value = match value.trim() {
            "null" => None,
            v => Some(v.to_string()),
        };
        Ok(Filter {
            field: field.to_string(),
            op,
            value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_filter() {
        let f: Filter = "name=english".parse().unwrap();
        assert_eq!(f, Filter::eq("name", "english"));

        let f: Filter = "removeDate!=null".parse().unwrap();
        assert_eq!(f, Filter::is_not_null("removeDate"));

        let f: Filter = " removeDate = null".parse().unwrap();
        assert_eq!(f, Filter::is_null("removeDate"));

        assert!("name".parse::<Filter>().is_err());
        assert!("=value".parse::<Filter>().is_err());
    }

    #[test]
    fn test_order_display() {
        assert_eq!(Order::Asc("code".into()).to_string(), "code");
        assert_eq!(Order::Desc("code".into()).to_string(), "code DESC");
        assert_eq!(Order::Desc("code".into()).with_column("l.code"), "l.code DESC");
    }
}

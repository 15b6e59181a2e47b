pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    #[error("{0} not found")]
    RecordNotFound(String),

    #[error("{0}")]
    DuplicateRecord(&'static str),

    #[error("Invalid order by field: {0}")]
    InvalidOrderByField(String),

    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    #[error("Page and pageSize must be positive integers")]
    InvalidPaging,

    #[error("Page exceeds total number of available pages")]
    PageOutOfRange,

    #[error("{0} is not a valid language code")]
    InvalidLanguageCode(String),

    #[error("Language code {0} is given more than once")]
    DuplicateLanguageCode(String),

    #[error("Invalid data: {0}")]
    ValidationError(#[from] garde::Report),

    #[error("Invalid stored data: {0}")]
    InvalidStoredData(String),
}

/// Coarse classification used to choose response status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Invalid,
    Internal,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::RecordNotFound(_) => ErrorKind::NotFound,
            Error::DatabaseError(sqlx::Error::RowNotFound) => ErrorKind::NotFound,
            Error::DuplicateRecord(_)
            | Error::InvalidOrderByField(_)
            | Error::InvalidFilter(_)
            | Error::InvalidPaging
            | Error::PageOutOfRange
            | Error::InvalidLanguageCode(_)
            | Error::DuplicateLanguageCode(_)
            | Error::ValidationError(_) => ErrorKind::Invalid,
            Error::DatabaseError(_) | Error::MigrationError(_) | Error::InvalidStoredData(_) => {
                ErrorKind::Internal
            }
        }
    }

    pub(crate) fn not_found(entity: &str) -> Self {
        Error::RecordNotFound(entity.to_string())
    }

    /// Maps unique constraint violation to [`Error::DuplicateRecord`], other errors pass as they are
    pub(crate) fn on_duplicate(msg: &'static str) -> impl FnOnce(sqlx::Error) -> Error {
        move |e| match e {
            sqlx::Error::Database(ref db_error) if db_error.is_unique_violation() => {
                Error::DuplicateRecord(msg)
            }
            e => Error::DatabaseError(e),
        }
    }
}

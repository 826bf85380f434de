use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub created: Option<String>,
    pub lastlogin: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Watchlist {
    pub id: i64,
    pub name: String,
    pub user_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Movie {
    pub id: i64,
    pub watchlist_id: i64,
    pub name: String,
    pub genre: String,
    pub platform: String,
    pub review: i64,
    pub description: Option<String>,
}

/// A movie that has not been stored yet.
#[derive(Debug, Clone)]
pub struct NewMovie {
    pub watchlist_id: i64,
    pub name: String,
    pub genre: String,
    pub platform: String,
    pub review: i64,
    pub description: Option<String>,
}

/// What is left of a movie after it has been deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct DeletedMovie {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Already exists: {0}")]
    AlreadyExists(String),
}

pub type DbResult<T> = Result<T, DbError>;

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::{debug, info};

use super::model::*;
use super::repo::*;

pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    pub async fn new(db_path: &str) -> DbResult<Self> {
        let options = SqliteConnectOptions::from_str(db_path)?
            .create_if_missing(true)
            .foreign_keys(true);

        // Every connection to an in-memory database gets its own database,
        // so the pool must hold on to exactly one.
        let in_memory = db_path.contains(":memory:");
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };

        let pool = pool_options.connect_with(options).await?;

        let repo = Self { pool };

        repo.init_schema().await?;

        info!("Database initialized at {}", db_path);

        Ok(repo)
    }

    async fn init_schema(&self) -> DbResult<()> {
        let schema = include_str!("schema.sql");
        sqlx::raw_sql(schema).execute(&self.pool).await?;
        Ok(())
    }
}

fn not_found(what: String) -> impl FnOnce(sqlx::Error) -> DbError {
    move |e| match e {
        sqlx::Error::RowNotFound => DbError::NotFound(what),
        _ => DbError::Sqlx(e),
    }
}

fn insert_error(what: String) -> impl FnOnce(sqlx::Error) -> DbError {
    move |e| {
        if let Some(db_err) = e.as_database_error() {
            if db_err.is_unique_violation() {
                return DbError::AlreadyExists(what);
            }
            if db_err.is_foreign_key_violation() {
                return DbError::NotFound(what);
            }
        }
        DbError::Sqlx(e)
    }
}

#[async_trait]
impl UserRepo for SqliteRepository {
    async fn get_user(&self, username: &str) -> DbResult<User> {
        sqlx::query_as::<_, User>(
            "SELECT id, username, password, created, lastlogin FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_one(&self.pool)
        .await
        .map_err(not_found(format!("User not found: {}", username)))
    }

    async fn get_user_by_id(&self, id: i64) -> DbResult<User> {
        sqlx::query_as::<_, User>(
            "SELECT id, username, password, created, lastlogin FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(not_found(format!("User not found: {}", id)))
    }

    async fn create_user(&self, username: &str, password_hash: &str) -> DbResult<User> {
        let created = Utc::now().to_rfc3339();
        let result = sqlx::query("INSERT INTO users (username, password, created) VALUES (?, ?, ?)")
            .bind(username)
            .bind(password_hash)
            .bind(&created)
            .execute(&self.pool)
            .await
            .map_err(insert_error(format!("User {}", username)))?;

        debug!("Created user {} ({})", username, result.last_insert_rowid());

        Ok(User {
            id: result.last_insert_rowid(),
            username: username.to_string(),
            password: password_hash.to_string(),
            created: Some(created),
            lastlogin: None,
        })
    }

    async fn touch_last_login(&self, id: i64) -> DbResult<()> {
        sqlx::query("UPDATE users SET lastlogin = ? WHERE id = ?")
            .bind(Utc::now().to_rfc3339())
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl WatchlistRepo for SqliteRepository {
    async fn get_watchlist(&self, id: i64) -> DbResult<Watchlist> {
        let result = sqlx::query_as::<_, (i64, String, i64)>(
            "SELECT id, name, user_id FROM watchlists WHERE id = ?",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(not_found(format!("Watchlist not found: {}", id)))?;

        Ok(Watchlist {
            id: result.0,
            name: result.1,
            user_id: result.2,
        })
    }

    async fn list_watchlists_by_user(&self, user_id: i64) -> DbResult<Vec<Watchlist>> {
        let watchlists = sqlx::query_as::<_, Watchlist>(
            "SELECT id, name, user_id FROM watchlists WHERE user_id = ? ORDER BY id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(watchlists)
    }

    async fn create_watchlist(&self, user_id: i64, name: &str) -> DbResult<Watchlist> {
        let result = sqlx::query("INSERT INTO watchlists (user_id, name) VALUES (?, ?)")
            .bind(user_id)
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(insert_error(format!("User not found: {}", user_id)))?;

        Ok(Watchlist {
            id: result.last_insert_rowid(),
            name: name.to_string(),
            user_id,
        })
    }
}

#[async_trait]
impl MovieRepo for SqliteRepository {
    async fn list_movies(&self, watchlist_id: i64) -> DbResult<Vec<Movie>> {
        let movies = sqlx::query_as::<_, Movie>(
            "SELECT id, watchlist_id, name, genre, platform, review, description
             FROM movies WHERE watchlist_id = ? ORDER BY id",
        )
        .bind(watchlist_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(movies)
    }

    async fn create_movie(&self, movie: &NewMovie) -> DbResult<Movie> {
        let result = sqlx::query(
            "INSERT INTO movies
            (watchlist_id, name, genre, platform, review, description)
            VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(movie.watchlist_id)
        .bind(&movie.name)
        .bind(&movie.genre)
        .bind(&movie.platform)
        .bind(movie.review)
        .bind(&movie.description)
        .execute(&self.pool)
        .await
        .map_err(insert_error(format!(
            "Watchlist not found: {}",
            movie.watchlist_id
        )))?;

        Ok(Movie {
            id: result.last_insert_rowid(),
            watchlist_id: movie.watchlist_id,
            name: movie.name.clone(),
            genre: movie.genre.clone(),
            platform: movie.platform.clone(),
            review: movie.review,
            description: movie.description.clone(),
        })
    }

    async fn delete_movie_by_name(&self, watchlist_id: i64, name: &str) -> DbResult<DeletedMovie> {
        sqlx::query_as::<_, DeletedMovie>(
            "DELETE FROM movies WHERE id = (
                SELECT id FROM movies WHERE watchlist_id = ? AND name = ? ORDER BY id LIMIT 1
             ) RETURNING id, name",
        )
        .bind(watchlist_id)
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(not_found(format!("Movie not found: {}", name)))
    }

    async fn delete_movie(&self, id: i64) -> DbResult<DeletedMovie> {
        sqlx::query_as::<_, DeletedMovie>("DELETE FROM movies WHERE id = ? RETURNING id, name")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(not_found(format!("Movie not found: {}", id)))
    }
}

use async_trait::async_trait;

use super::model::*;

#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn get_user(&self, username: &str) -> DbResult<User>;
    async fn get_user_by_id(&self, id: i64) -> DbResult<User>;
    async fn create_user(&self, username: &str, password_hash: &str) -> DbResult<User>;
    async fn touch_last_login(&self, id: i64) -> DbResult<()>;
}

#[async_trait]
pub trait WatchlistRepo: Send + Sync {
    async fn get_watchlist(&self, id: i64) -> DbResult<Watchlist>;
    async fn list_watchlists_by_user(&self, user_id: i64) -> DbResult<Vec<Watchlist>>;
    async fn create_watchlist(&self, user_id: i64, name: &str) -> DbResult<Watchlist>;
}

#[async_trait]
pub trait MovieRepo: Send + Sync {
    async fn list_movies(&self, watchlist_id: i64) -> DbResult<Vec<Movie>>;
    async fn create_movie(&self, movie: &NewMovie) -> DbResult<Movie>;
    /// Deletes the oldest movie called `name` in the watchlist.
    async fn delete_movie_by_name(&self, watchlist_id: i64, name: &str) -> DbResult<DeletedMovie>;
    async fn delete_movie(&self, id: i64) -> DbResult<DeletedMovie>;
}

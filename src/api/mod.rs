pub mod auth;
pub mod error;
pub mod movie;
pub mod request;
pub mod types;
pub mod watchlist;

pub use auth::*;
pub use error::ApiError;
pub use movie::*;
pub use types::*;
pub use watchlist::*;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::server::AppState;

pub fn build_api_router() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/watchlists", get(list_watchlists).post(create_watchlist))
        .route(
            "/movies",
            get(list_movies).post(add_movie).delete(delete_movie),
        )
        .route("/movies/:id", delete(delete_movie_by_id))
}

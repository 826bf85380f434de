mod rating;
mod render;

pub use rating::{StarRating, MAX_STARS};
pub use render::{render_dashboard, render_movie_card, render_watchlist};

use crate::db::{Movie, Watchlist};

/// A watchlist together with its movies, if they could be fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct WatchlistView {
    pub watchlist: Watchlist,
    pub movies: Option<Vec<Movie>>,
}

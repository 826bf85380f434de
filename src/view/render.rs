use super::{StarRating, WatchlistView};
use crate::client::Session;
use crate::db::{Movie, Watchlist};

fn or_default<'a>(value: &'a str, default: &'a str) -> &'a str {
    if value.trim().is_empty() {
        default
    } else {
        value
    }
}

pub fn render_dashboard(session: &Session, views: &[WatchlistView]) -> String {
    let title = format!("Watchlists for {}", session.username);
    let mut out = format!("{}\n{}\n", title, "=".repeat(title.chars().count()));

    if views.is_empty() {
        out.push_str("\nNo watchlists found. Create your first watchlist!\n");
        return out;
    }

    for view in views {
        out.push('\n');
        out.push_str(&render_watchlist(view));
    }
    out
}

/// One section per watchlist with its movie cards nested inside.
pub fn render_watchlist(view: &WatchlistView) -> String {
    let mut out = format!("## {} (#{})\n", view.watchlist.name, view.watchlist.id);

    match view.movies.as_deref() {
        None => out.push_str("  No movies found\n"),
        Some([]) => out.push_str("  No movies yet\n"),
        Some(movies) => {
            for movie in movies {
                out.push_str(&render_movie_card(&view.watchlist, movie));
            }
        }
    }
    out
}

pub fn render_movie_card(watchlist: &Watchlist, movie: &Movie) -> String {
    let description = movie
        .description
        .as_deref()
        .map(|d| or_default(d, "No description"))
        .unwrap_or("No description");

    format!(
        "  ┌ {}\n  │ Genre: {}\n  │ Platform: {}\n  │ Review: {}\n  │ Description: {}\n  └ delete: movieshelf delete-movie --watchlist {} --id {}\n",
        movie.name,
        or_default(&movie.genre, "N/A"),
        or_default(&movie.platform, "N/A"),
        StarRating::new(movie.review).render(),
        description,
        watchlist.id,
        movie.id,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::new(1, "alice".to_string())
    }

    fn watchlist() -> Watchlist {
        Watchlist {
            id: 3,
            name: "Sci-Fi".to_string(),
            user_id: 1,
        }
    }

    fn dune() -> Movie {
        Movie {
            id: 12,
            watchlist_id: 3,
            name: "Dune".to_string(),
            genre: "Sci-Fi".to_string(),
            platform: "Streaming".to_string(),
            review: 4,
            description: None,
        }
    }

    #[test]
    fn test_movie_card() {
        let card = render_movie_card(&watchlist(), &dune());
        assert!(card.contains("┌ Dune"));
        assert!(card.contains("Genre: Sci-Fi"));
        assert!(card.contains("Review: ★★★★☆"));
        assert!(card.contains("Description: No description"));
        assert!(card.contains("delete-movie --watchlist 3 --id 12"));

        let mut blank = dune();
        blank.platform = " ".to_string();
        blank.description = Some("Spice".to_string());
        let card = render_movie_card(&watchlist(), &blank);
        assert!(card.contains("Platform: N/A"));
        assert!(card.contains("Description: Spice"));
    }

    #[test]
    fn test_dashboard_empty() {
        let out = render_dashboard(&session(), &[]);
        assert!(out.starts_with("Watchlists for alice\n"));
        assert!(out.contains("No watchlists found"));
    }

    #[test]
    fn test_dashboard_sections() {
        let views = vec![
            WatchlistView {
                watchlist: watchlist(),
                movies: Some(vec![dune()]),
            },
            WatchlistView {
                watchlist: Watchlist {
                    id: 4,
                    name: "Later".to_string(),
                    user_id: 1,
                },
                movies: Some(vec![]),
            },
            WatchlistView {
                watchlist: Watchlist {
                    id: 5,
                    name: "Broken".to_string(),
                    user_id: 1,
                },
                movies: None,
            },
        ];
        let out = render_dashboard(&session(), &views);

        let scifi = out.find("## Sci-Fi (#3)").unwrap();
        let later = out.find("## Later (#4)").unwrap();
        let broken = out.find("## Broken (#5)").unwrap();
        assert!(scifi < later && later < broken);
        assert!(out[scifi..later].contains("┌ Dune"));
        assert!(out[later..broken].contains("No movies yet"));
        assert!(out[broken..].contains("No movies found"));
    }
}

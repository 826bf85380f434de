use std::collections::HashMap;

use tokio::task::JoinSet;
use tracing::warn;

use super::{ApiClient, ClientResult, Session};
use crate::view::WatchlistView;

/// Fetches the session's watchlists, then the movies of every watchlist in
/// parallel. A watchlist whose movies could not be fetched is returned
/// with `movies: None`.
pub async fn load_dashboard(client: &ApiClient, session: &Session) -> ClientResult<Vec<WatchlistView>> {
    let watchlists = client.list_watchlists(session).await?;

    let mut tasks = JoinSet::new();
    for watchlist in &watchlists {
        let client = client.clone();
        let id = watchlist.id;
        tasks.spawn(async move { (id, client.list_movies(id).await) });
    }

    // Completion order does not matter, results are keyed by watchlist id.
    let mut movies = HashMap::new();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((id, Ok(list))) => {
                movies.insert(id, list);
            }
            Ok((id, Err(e))) => warn!("Failed to fetch movies for watchlist {}: {}", id, e),
            Err(e) => warn!("Movie fetch task failed: {}", e),
        }
    }

    Ok(watchlists
        .into_iter()
        .map(|watchlist| {
            let movies = movies.remove(&watchlist.id);
            WatchlistView { watchlist, movies }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::AddMovieRequest;
    use crate::client::api::tests::spawn_server;

    #[tokio::test]
    async fn test_load_dashboard() {
        let client = spawn_server().await;
        client.register("alice", "secret1").await.unwrap();
        let session = client.login("alice", "secret1").await.unwrap();

        let scifi = client.create_watchlist(&session, "Sci-Fi").await.unwrap();
        let empty = client.create_watchlist(&session, "Later").await.unwrap();
        for name in ["Dune", "Arrival"] {
            client
                .add_movie(&AddMovieRequest {
                    watchlist_id: Some(scifi.id.into()),
                    name: Some(name.to_string()),
                    genre: Some("Sci-Fi".to_string()),
                    platform: Some("Streaming".to_string()),
                    ..Default::default()
                })
                .await
                .unwrap();
        }

        let views = load_dashboard(&client, &session).await.unwrap();
        assert_eq!(views.len(), 2);
        assert_eq!(views[0].watchlist, scifi);
        let names: Vec<_> = views[0]
            .movies
            .as_ref()
            .unwrap()
            .iter()
            .map(|m| m.name.as_str())
            .collect();
        assert_eq!(names, vec!["Dune", "Arrival"]);
        assert_eq!(views[1].watchlist, empty);
        assert!(views[1].movies.as_ref().unwrap().is_empty());
    }
}

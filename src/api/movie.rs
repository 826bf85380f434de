use axum::{
    body::Bytes,
    extract::{rejection::PathRejection, Path, Query, State},
};
use tracing::{debug, info};

use super::error::ApiError;
use super::request::{created, id_field, ok, parse_body, parse_id, present, ApiResult};
use super::types::*;
use crate::db::{DbError, DeletedMovie, Movie, MovieRepo, NewMovie, WatchlistRepo};
use crate::server::AppState;
use crate::util::QueryParams;

pub const MAX_REVIEW: i64 = 5;

fn watchlist_not_found(e: DbError) -> ApiError {
    match e {
        DbError::NotFound(_) => ApiError::NotFound("Watchlist not found".to_string()),
        other => other.into(),
    }
}

fn movie_not_found(e: DbError) -> ApiError {
    match e {
        DbError::NotFound(_) => ApiError::NotFound("Movie not found".to_string()),
        other => other.into(),
    }
}

pub async fn add_movie(State(state): State<AppState>, body: Bytes) -> ApiResult<Movie> {
    let req: AddMovieRequest = parse_body(&body)?;

    let watchlist_id = id_field(&req.watchlist_id, "watchlist ID")?;
    let (watchlist_id, name, genre, platform) = match (
        watchlist_id,
        present(&req.name),
        present(&req.genre),
        present(&req.platform),
    ) {
        (Some(w), Some(n), Some(g), Some(p)) => (w, n, g, p),
        _ => {
            return Err(ApiError::Validation(
                "Watchlist ID, name, genre and platform are required".to_string(),
            ))
        }
    };

    let review = req.review.unwrap_or(0);
    if !(0..=MAX_REVIEW).contains(&review) {
        return Err(ApiError::Validation(format!(
            "Review must be between 0 and {}",
            MAX_REVIEW
        )));
    }

    state
        .db
        .get_watchlist(watchlist_id)
        .await
        .map_err(watchlist_not_found)?;

    let movie = state
        .db
        .create_movie(&NewMovie {
            watchlist_id,
            name,
            genre,
            platform,
            review,
            description: present(&req.description),
        })
        .await
        .map_err(watchlist_not_found)?;

    debug!("Added movie {} to watchlist {}", movie.id, watchlist_id);

    created(movie)
}

pub async fn list_movies(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> ApiResult<Vec<Movie>> {
    let watchlist_id = parse_id(params.get("watchlist_id"), "watchlist ID")?;

    let movies = state.db.list_movies(watchlist_id).await?;
    ok(movies)
}

pub async fn delete_movie(State(state): State<AppState>, body: Bytes) -> ApiResult<DeletedMovie> {
    let req: DeleteMovieRequest = parse_body(&body)?;

    let watchlist_id = id_field(&req.watchlist_id, "watchlist ID")?;
    let (watchlist_id, name) = match (watchlist_id, present(&req.movie_name)) {
        (Some(w), Some(n)) => (w, n),
        _ => {
            return Err(ApiError::Validation(
                "Watchlist ID and movie name are required".to_string(),
            ))
        }
    };

    let deleted = state
        .db
        .delete_movie_by_name(watchlist_id, &name)
        .await
        .map_err(movie_not_found)?;

    info!("Deleted movie {} from watchlist {}", deleted.id, watchlist_id);

    ok(deleted)
}

pub async fn delete_movie_by_id(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> ApiResult<DeletedMovie> {
    let Path(id) = path.map_err(|e| {
        debug!("Rejected movie path: {}", e);
        ApiError::Validation("Invalid movie ID".to_string())
    })?;
    let id = parse_id(Some(&id), "movie ID")?;

    let deleted = state.db.delete_movie(id).await.map_err(movie_not_found)?;

    info!("Deleted movie {}", deleted.id);

    ok(deleted)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::{json, Value};

    use crate::api::test_support::{register, send, test_app, TestApp};

    async fn watchlist(app: &TestApp) -> i64 {
        let user_id = register(app, "alice").await;
        let body = json!({"user_id": user_id, "name": "Sci-Fi"});
        let (_, resp) = send(app, "POST", "/watchlists", Some(body)).await;
        resp["data"]["id"].as_i64().unwrap()
    }

    async fn movies(app: &TestApp, watchlist_id: i64) -> Vec<Value> {
        let uri = format!("/movies?watchlist_id={}", watchlist_id);
        let (status, resp) = send(app, "GET", &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        resp["data"].as_array().unwrap().clone()
    }

    #[tokio::test]
    async fn test_review_defaults_to_zero() {
        let app = test_app().await;
        let wl = watchlist(&app).await;

        let body = json!({"watchlist_id": wl, "name": "Alien", "genre": "Horror", "platform": "Disc"});
        let (status, resp) = send(&app, "POST", "/movies", Some(body)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(resp["data"]["review"], 0);
        assert_eq!(resp["data"]["description"], Value::Null);

        let body = json!({
            "watchlist_id": wl, "name": "Dune", "genre": "Sci-Fi",
            "platform": "Streaming", "review": 5, "description": "Spice"
        });
        let (status, resp) = send(&app, "POST", "/movies", Some(body)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(resp["data"]["review"], 5);
        assert_eq!(resp["data"]["description"], "Spice");

        let stored = movies(&app, wl).await;
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0]["review"], 0);
        assert_eq!(stored[1]["review"], 5);
    }

    #[tokio::test]
    async fn test_review_out_of_range() {
        let app = test_app().await;
        let wl = watchlist(&app).await;

        for review in [-1, 6, 100] {
            let body = json!({
                "watchlist_id": wl, "name": "Dune", "genre": "Sci-Fi",
                "platform": "Streaming", "review": review
            });
            let (status, resp) = send(&app, "POST", "/movies", Some(body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(resp["error"], "Review must be between 0 and 5");
        }
        assert!(movies(&app, wl).await.is_empty());
    }

    #[tokio::test]
    async fn test_add_movie_validation() {
        let app = test_app().await;
        let wl = watchlist(&app).await;

        for body in [
            json!({"name": "Dune", "genre": "Sci-Fi", "platform": "Streaming"}),
            json!({"watchlist_id": wl, "genre": "Sci-Fi", "platform": "Streaming"}),
            json!({"watchlist_id": wl, "name": "Dune", "platform": "Streaming"}),
            json!({"watchlist_id": wl, "name": "Dune", "genre": "Sci-Fi"}),
            json!({"watchlist_id": wl, "name": "Dune", "genre": "", "platform": "Streaming"}),
        ] {
            let (status, _) = send(&app, "POST", "/movies", Some(body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
        }

        let body = json!({"watchlist_id": 4242, "name": "Dune", "genre": "Sci-Fi", "platform": "Streaming"});
        let (status, resp) = send(&app, "POST", "/movies", Some(body)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(resp["error"], "Watchlist not found");
    }

    #[tokio::test]
    async fn test_list_movies_validation() {
        let app = test_app().await;
        let (status, _) = send(&app, "GET", "/movies", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (status, _) = send(&app, "GET", "/movies?watchlist_id=x1", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        // Capitalized parameter names are accepted.
        let (status, resp) = send(&app, "GET", "/movies?Watchlist_id=3", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(resp["data"], json!([]));
    }

    #[tokio::test]
    async fn test_delete_missing_movie_leaves_table() {
        let app = test_app().await;
        let wl = watchlist(&app).await;
        let body = json!({"watchlist_id": wl, "name": "Dune", "genre": "Sci-Fi", "platform": "Streaming"});
        send(&app, "POST", "/movies", Some(body)).await;

        let body = json!({"watchlist_id": wl, "movieName": "X"});
        let (status, resp) = send(&app, "DELETE", "/movies", Some(body)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(resp["error"], "Movie not found");
        assert_eq!(movies(&app, wl).await.len(), 1);

        let (status, _) = send(&app, "DELETE", "/movies", Some(json!({"watchlist_id": wl}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (status, _) = send(&app, "DELETE", "/movies", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_delete_duplicate_name_removes_one() {
        let app = test_app().await;
        let wl = watchlist(&app).await;
        let body = json!({"watchlist_id": wl, "name": "Heat", "genre": "Crime", "platform": "Disc"});
        let (_, first) = send(&app, "POST", "/movies", Some(body.clone())).await;
        send(&app, "POST", "/movies", Some(body)).await;

        let del = json!({"watchlist_id": wl, "movieName": "Heat"});
        let (status, resp) = send(&app, "DELETE", "/movies", Some(del)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(resp["data"]["id"], first["data"]["id"]);
        assert_eq!(movies(&app, wl).await.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_by_id() {
        let app = test_app().await;
        let wl = watchlist(&app).await;
        let body = json!({"watchlist_id": wl, "name": "Heat", "genre": "Crime", "platform": "Disc"});
        let (_, created) = send(&app, "POST", "/movies", Some(body)).await;
        let id = created["data"]["id"].as_i64().unwrap();

        let (status, resp) = send(&app, "DELETE", &format!("/movies/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(resp["data"], json!({"id": id, "name": "Heat"}));

        let (status, _) = send(&app, "DELETE", &format!("/movies/{}", id), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = send(&app, "DELETE", "/movies/abc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_delete_by_id_bad_encoding() {
        let app = test_app().await;
        let (status, resp) = send(&app, "DELETE", "/movies/%FF", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(resp["success"], false);
        assert_eq!(resp["error"], "Invalid movie ID");
    }
}

use axum::{
    body::Bytes,
    extract::{Query, State},
};
use tracing::debug;

use super::error::ApiError;
use super::request::{created, id_field, ok, parse_body, parse_id, present, ApiResult};
use super::types::*;
use crate::db::{DbError, UserRepo, Watchlist, WatchlistRepo};
use crate::server::AppState;
use crate::util::QueryParams;

async fn require_user(state: &AppState, user_id: i64) -> Result<(), ApiError> {
    match state.db.get_user_by_id(user_id).await {
        Ok(_) => Ok(()),
        Err(DbError::NotFound(_)) => Err(ApiError::NotFound("User not found".to_string())),
        Err(e) => Err(e.into()),
    }
}

pub async fn create_watchlist(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<Watchlist> {
    let req: CreateWatchlistRequest = parse_body(&body)?;

    let user_id = id_field(&req.user_id, "user ID")?;
    let (user_id, name) = match (user_id, present(&req.name)) {
        (Some(user_id), Some(name)) => (user_id, name),
        _ => {
            return Err(ApiError::Validation(
                "User ID and watchlist name are required".to_string(),
            ))
        }
    };

    require_user(&state, user_id).await?;

    let watchlist = state
        .db
        .create_watchlist(user_id, &name)
        .await
        .map_err(|e| match e {
            // The user vanished between the check and the insert.
            DbError::NotFound(_) => ApiError::NotFound("User not found".to_string()),
            other => other.into(),
        })?;

    debug!("Created watchlist {} for user {}", watchlist.id, user_id);

    created(watchlist)
}

pub async fn list_watchlists(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> ApiResult<Vec<Watchlist>> {
    let user_id = parse_id(params.get("user_id"), "user ID")?;

    require_user(&state, user_id).await?;

    let watchlists = state.db.list_watchlists_by_user(user_id).await?;
    ok(watchlists)
}

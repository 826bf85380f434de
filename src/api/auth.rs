use axum::{body::Bytes, extract::State};
use tracing::{info, warn};

use super::error::ApiError;
use super::request::{created, ok, parse_body, present, ApiResult};
use super::types::*;
use crate::db::{DbError, UserRepo};
use crate::server::AppState;

fn credentials(body: &Bytes) -> Result<(String, String), ApiError> {
    let req: CredentialsRequest = parse_body(body)?;

    let username = present(&req.username);
    // Passwords are checked for blankness but otherwise used verbatim.
    let password = req.password.filter(|p| !p.trim().is_empty());

    match (username, password) {
        (Some(username), Some(password)) => Ok((username, password)),
        _ => Err(ApiError::Validation(
            "Username and password are required".to_string(),
        )),
    }
}

pub async fn register(State(state): State<AppState>, body: Bytes) -> ApiResult<RegisterResponse> {
    let (username, password) = credentials(&body)?;

    match state.db.get_user(&username).await {
        Ok(_) => return Err(ApiError::Conflict("Username already exists".to_string())),
        Err(DbError::NotFound(_)) => {}
        Err(e) => return Err(e.into()),
    }

    let cost = state.config.auth.bcrypt_cost;
    let hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost)).await??;

    let user = state
        .db
        .create_user(&username, &hash)
        .await
        .map_err(|e| match e {
            DbError::AlreadyExists(_) => ApiError::Conflict("Username already exists".to_string()),
            other => other.into(),
        })?;

    info!("Registered user {} ({})", user.username, user.id);

    created(RegisterResponse {
        id: user.id,
        username: user.username,
    })
}

pub async fn login(State(state): State<AppState>, body: Bytes) -> ApiResult<LoginResponse> {
    let (username, password) = credentials(&body)?;
    let invalid = || ApiError::Auth("Invalid credentials".to_string());

    let user = match state.db.get_user(&username).await {
        Ok(user) => user,
        Err(DbError::NotFound(_)) => {
            warn!("Login for unknown user {}", username);
            return Err(invalid());
        }
        Err(e) => return Err(e.into()),
    };

    let hash = user.password.clone();
    let matches = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash)).await??;
    if !matches {
        warn!("Wrong password for user {}", username);
        return Err(invalid());
    }

    state.db.touch_last_login(user.id).await?;

    ok(LoginResponse {
        username: user.username,
        user_id: user.id,
    })
}

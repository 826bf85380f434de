use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::session::Session;
use super::{ClientError, ClientResult};
use crate::api::types::*;
use crate::db::{DeletedMovie, Movie, Watchlist};

/// Typed client for the REST API. Every response is decoded as the
/// `{success, data, error}` envelope.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, format!("{}{}", self.base_url, path))
    }

    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> ClientResult<T> {
        let resp = req.send().await?;
        let status = resp.status().as_u16();
        let bytes = resp.bytes().await?;

        let envelope: ApiResponse<T> =
            serde_json::from_slice(&bytes).map_err(|_| ClientError::Malformed(status))?;

        if envelope.success {
            envelope.data.ok_or(ClientError::Malformed(status))
        } else {
            Err(ClientError::Api {
                status,
                message: envelope
                    .error
                    .unwrap_or_else(|| "Request failed".to_string()),
            })
        }
    }

    async fn send_json<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        self.send(self.request(method, path).json(body)).await
    }

    pub async fn register(&self, username: &str, password: &str) -> ClientResult<RegisterResponse> {
        let body = CredentialsRequest {
            username: Some(username.to_string()),
            password: Some(password.to_string()),
        };
        self.send_json(Method::POST, "/auth/register", &body).await
    }

    /// Checks the credentials and returns the identity to keep client-side.
    pub async fn login(&self, username: &str, password: &str) -> ClientResult<Session> {
        let body = CredentialsRequest {
            username: Some(username.to_string()),
            password: Some(password.to_string()),
        };
        let resp: LoginResponse = self.send_json(Method::POST, "/auth/login", &body).await?;
        Ok(Session::new(resp.user_id, resp.username))
    }

    pub async fn create_watchlist(&self, session: &Session, name: &str) -> ClientResult<Watchlist> {
        let body = CreateWatchlistRequest {
            user_id: Some(session.user_id.into()),
            name: Some(name.to_string()),
        };
        self.send_json(Method::POST, "/watchlists", &body).await
    }

    pub async fn list_watchlists(&self, session: &Session) -> ClientResult<Vec<Watchlist>> {
        let req = self
            .request(Method::GET, "/watchlists")
            .query(&[("user_id", session.user_id)]);
        self.send(req).await
    }

    pub async fn add_movie(&self, movie: &AddMovieRequest) -> ClientResult<Movie> {
        self.send_json(Method::POST, "/movies", movie).await
    }

    pub async fn list_movies(&self, watchlist_id: i64) -> ClientResult<Vec<Movie>> {
        let req = self
            .request(Method::GET, "/movies")
            .query(&[("watchlist_id", watchlist_id)]);
        self.send(req).await
    }

    pub async fn delete_movie(&self, watchlist_id: i64, name: &str) -> ClientResult<DeletedMovie> {
        let body = DeleteMovieRequest {
            watchlist_id: Some(watchlist_id.into()),
            movie_name: Some(name.to_string()),
        };
        self.send_json(Method::DELETE, "/movies", &body).await
    }

    pub async fn delete_movie_by_id(&self, id: i64) -> ClientResult<DeletedMovie> {
        self.send(self.request(Method::DELETE, &format!("/movies/{}", id)))
            .await
    }

    /// Deletes movie `id` only if it belongs to `watchlist`.
    pub async fn delete_movie_in(
        &self,
        watchlist: &Watchlist,
        id: i64,
    ) -> ClientResult<DeletedMovie> {
        let movies = self.list_movies(watchlist.id).await?;
        if !movies.iter().any(|m| m.id == id) {
            return Err(ClientError::MovieNotInWatchlist {
                id,
                watchlist: watchlist.name.clone(),
            });
        }
        self.delete_movie_by_id(id).await
    }

    /// Finds one of the session's watchlists by id or by name.
    pub async fn resolve_watchlist(&self, session: &Session, key: &str) -> ClientResult<Watchlist> {
        let key = key.trim();
        let watchlists = self.list_watchlists(session).await?;

        let by_id = key
            .parse::<i64>()
            .ok()
            .and_then(|id| watchlists.iter().find(|w| w.id == id));
        let found = by_id.or_else(|| watchlists.iter().find(|w| w.name == key));

        found
            .cloned()
            .ok_or_else(|| ClientError::UnknownWatchlist(key.to_string()))
    }
}

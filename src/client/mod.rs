pub mod api;
pub mod dashboard;
pub mod session;

pub use api::ApiClient;
pub use dashboard::load_dashboard;
pub use session::{Session, SessionStore};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{message} (HTTP {status})")]
    Api { status: u16, message: String },
    #[error("Unexpected response from server (HTTP {0})")]
    Malformed(u16),
    #[error("Session file {0}: {1}")]
    SessionIo(String, std::io::Error),
    #[error("Session file {0}: {1}")]
    SessionParse(String, serde_json::Error),
    #[error("Not logged in")]
    NotLoggedIn,
    #[error("Watchlist not found: {0}")]
    UnknownWatchlist(String),
    #[error("Movie {id} is not in watchlist {watchlist}")]
    MovieNotInWatchlist { id: i64, watchlist: String },
    #[error("{0}")]
    Usage(String),
}

impl ClientError {
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, ClientError::Api { status: 401 | 403, .. })
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

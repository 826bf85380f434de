use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ClientError, ClientResult};

/// Consecutive 401/403 responses after which the stored identity is dropped.
pub const MAX_AUTH_FAILURES: u32 = 2;

/// The identity a client keeps after logging in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: i64,
    pub username: String,
    #[serde(default)]
    pub auth_failures: u32,
}

impl Session {
    pub fn new(user_id: i64, username: String) -> Self {
        Self {
            user_id,
            username,
            auth_failures: 0,
        }
    }
}

/// Keeps a [`Session`] in a JSON file so it survives between runs.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn default_path() -> PathBuf {
        match std::env::var_os("HOME") {
            Some(home) => PathBuf::from(home).join(".movieshelf").join("session.json"),
            None => PathBuf::from(".movieshelf-session.json"),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn display(&self) -> String {
        self.path.to_string_lossy().to_string()
    }

    pub fn load(&self) -> ClientResult<Option<Session>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(ClientError::SessionIo(self.display(), e)),
        };

        let session =
            serde_json::from_str(&content).map_err(|e| ClientError::SessionParse(self.display(), e))?;
        Ok(Some(session))
    }

    /// Like [`load`](Self::load), but a missing session is an error.
    pub fn require(&self) -> ClientResult<Session> {
        self.load()?.ok_or(ClientError::NotLoggedIn)
    }

    pub fn save(&self, session: &Session) -> ClientResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| ClientError::SessionIo(self.display(), e))?;
        }

        let content = serde_json::to_string_pretty(session)
            .map_err(|e| ClientError::SessionParse(self.display(), e))?;
        std::fs::write(&self.path, content).map_err(|e| ClientError::SessionIo(self.display(), e))?;

        debug!("Saved session for {} to {}", session.username, self.display());
        Ok(())
    }

    pub fn clear(&self) -> ClientResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ClientError::SessionIo(self.display(), e)),
        }
    }

    /// Records the outcome of an API call made with `session`. Returns
    /// true when repeated auth failures caused the session to be dropped.
    pub fn record_outcome<T>(
        &self,
        session: &mut Session,
        result: &ClientResult<T>,
    ) -> ClientResult<bool> {
        match result {
            Err(e) if e.is_auth_failure() => {
                session.auth_failures += 1;
                if session.auth_failures >= MAX_AUTH_FAILURES {
                    self.clear()?;
                    return Ok(true);
                }
                self.save(session)?;
            }
            Ok(_) if session.auth_failures > 0 => {
                session.auth_failures = 0;
                self.save(session)?;
            }
            _ => {}
        }
        Ok(false)
    }
}

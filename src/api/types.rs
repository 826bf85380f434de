use serde::{Deserialize, Serialize};

/// The one response shape every endpoint uses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Identifiers arrive as JSON numbers from most clients and as strings
/// from browsers that keep them in local storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IdField {
    Number(i64),
    Text(String),
}

impl IdField {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            IdField::Number(n) => Some(*n),
            IdField::Text(s) => s.trim().parse().ok(),
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, IdField::Text(s) if s.trim().is_empty())
    }
}

impl From<i64> for IdField {
    fn from(id: i64) -> Self {
        IdField::Number(id)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CredentialsRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default, alias = "userpassword")]
    pub password: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub id: i64,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub username: String,
    #[serde(rename = "userId")]
    pub user_id: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateWatchlistRequest {
    #[serde(default)]
    pub user_id: Option<IdField>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddMovieRequest {
    #[serde(default)]
    pub watchlist_id: Option<IdField>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub review: Option<i64>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeleteMovieRequest {
    #[serde(default)]
    pub watchlist_id: Option<IdField>,
    #[serde(default, rename = "movieName", alias = "name")]
    pub movie_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_shape() {
        let ok = serde_json::to_value(ApiResponse::ok(vec![1, 2])).unwrap();
        assert_eq!(ok, serde_json::json!({"success": true, "data": [1, 2]}));

        let failed = serde_json::to_value(ApiResponse::<()>::failure("Movie not found")).unwrap();
        assert_eq!(
            failed,
            serde_json::json!({"success": false, "error": "Movie not found"})
        );
    }

    #[test]
    fn test_decode_failure_envelope() {
        let resp: ApiResponse<Vec<crate::db::Movie>> =
            serde_json::from_str(r#"{"success": false, "error": "Watchlist not found"}"#).unwrap();
        assert!(!resp.success);
        assert!(resp.data.is_none());
        assert_eq!(resp.error.as_deref(), Some("Watchlist not found"));

        let resp: ApiResponse<Vec<crate::db::Movie>> =
            serde_json::from_str(r#"{"success": true, "data": []}"#).unwrap();
        assert_eq!(resp.data, Some(vec![]));
    }

    #[test]
    fn test_id_field() {
        let req: CreateWatchlistRequest =
            serde_json::from_str(r#"{"user_id": "17", "name": "Sci-Fi"}"#).unwrap();
        assert_eq!(req.user_id.unwrap().as_i64(), Some(17));

        let req: CreateWatchlistRequest =
            serde_json::from_str(r#"{"user_id": 17, "name": "Sci-Fi"}"#).unwrap();
        assert_eq!(req.user_id.unwrap().as_i64(), Some(17));

        let req: CreateWatchlistRequest =
            serde_json::from_str(r#"{"user_id": "abc"}"#).unwrap();
        assert_eq!(req.user_id.unwrap().as_i64(), None);

        let req: CreateWatchlistRequest = serde_json::from_str(r#"{"user_id": null}"#).unwrap();
        assert!(req.user_id.is_none());
    }

    #[test]
    fn test_password_alias() {
        let req: CredentialsRequest =
            serde_json::from_str(r#"{"username": "alice", "userpassword": "secret1"}"#).unwrap();
        assert_eq!(req.password.as_deref(), Some("secret1"));
    }
}

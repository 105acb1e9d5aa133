use serde::{Deserialize, Serialize};

/// Body of every auth endpoint response
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    /// Only on 400 responses
    #[serde(default)]
    pub error: Option<String>,
}

impl AuthResponse {
    /// Best message to show the user
    pub fn display_message(&self, fallback: &str) -> String {
        self.message
            .clone()
            .or_else(|| self.error.clone())
            .unwrap_or_else(|| fallback.to_string())
    }
}

/// Row of the hosted `users` table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserRecord {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Insert payload for a first-time user
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub phone: String,
    pub username: String,
    pub full_name: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SessionUser {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub username: Option<String>,
}

/// Response of `GET /api/session`
#[derive(Debug, Clone, Deserialize)]
pub struct SessionInfo {
    pub success: bool,
    pub user: SessionUser,
    /// RFC 3339 expiry of the session token
    pub expires_at: String,
}

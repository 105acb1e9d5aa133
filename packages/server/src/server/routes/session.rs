use axum::{extract::Extension, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domains::auth::SessionIdentity;
use crate::server::middleware::AuthUser;
use crate::server::ApiError;

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub success: bool,
    pub user: SessionIdentity,
    pub expires_at: DateTime<Utc>,
}

/// Current session from the verified token claims.
///
/// GET /api/session → 200 with the user, or 401 when the cookie is missing,
/// invalid, or holds an expired token.
pub async fn session_handler(
    auth_user: Option<Extension<AuthUser>>,
) -> Result<Json<SessionResponse>, ApiError> {
    let Some(Extension(auth_user)) = auth_user else {
        return Err(ApiError::Unauthenticated);
    };

    Ok(Json(SessionResponse {
        success: true,
        user: auth_user.identity,
        expires_at: auth_user.expires_at,
    }))
}

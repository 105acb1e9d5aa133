//! Issue session action

use tracing::info;

use crate::domains::auth::models::hash_email;
use crate::domains::auth::{AuthError, JwtService, SessionIdentity};

/// Sign a session token for a verified user. Requires a non-empty id and email.
pub fn issue_session(identity: &SessionIdentity, jwt: &JwtService) -> Result<String, AuthError> {
    if identity.id.trim().is_empty() || identity.email.trim().is_empty() {
        return Err(AuthError::Validation("Invalid user data"));
    }

    let token = jwt.create_token(identity).map_err(AuthError::Token)?;
    info!(user_id = %identity.id, email_hash = %hash_email(&identity.email), "Session issued");
    Ok(token)
}

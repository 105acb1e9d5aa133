use crate::domains::auth::{JwtService, SessionIdentity};
use crate::server::app::SESSION_COOKIE_NAME;
use axum::{extract::Request, http::header::AUTHORIZATION, middleware::Next, response::Response};
use axum_extra::extract::cookie::CookieJar;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::debug;

/// Authenticated user information from the session token
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub identity: SessionIdentity,
    pub expires_at: DateTime<Utc>,
}

/// Session authentication middleware
///
/// Reads the session token from the `access_token` cookie, falling back to the
/// Authorization header, verifies its claims and adds AuthUser to request extensions.
/// A cookie whose token has expired counts as logged out.
/// If no token or invalid token, request continues without AuthUser (public access).
pub async fn session_auth_middleware(
    jwt_service: Arc<JwtService>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_user = extract_auth_user(&request, &jwt_service);

    if let Some(user) = auth_user {
        debug!("Authenticated user: {}", user.identity.id);
        request.extensions_mut().insert(user);
    } else {
        debug!("No valid session token");
    }

    next.run(request).await
}

/// Extract and verify the session token from request
fn extract_auth_user(request: &Request, jwt_service: &JwtService) -> Option<AuthUser> {
    let token = session_token(request)?;
    let claims = jwt_service.verify_token(&token).ok()?;

    Some(AuthUser {
        identity: claims.identity(),
        expires_at: DateTime::from_timestamp(claims.exp, 0)?,
    })
}

fn session_token(request: &Request) -> Option<String> {
    let jar = CookieJar::from_headers(request.headers());
    if let Some(cookie) = jar.get(SESSION_COOKIE_NAME) {
        return Some(cookie.value().to_string());
    }

    // Handle both "Bearer <token>" and raw token
    let auth_str = request.headers().get(AUTHORIZATION)?.to_str().ok()?;
    Some(auth_str.strip_prefix("Bearer ").unwrap_or(auth_str).to_string())
}

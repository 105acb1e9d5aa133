//! OTP login endpoints.
//!
//! POST /api/send-otp   {email}        → {success, message?, reason?}
//! POST /api/verify-otp {email, otp}   → {success, message, reason?}
//! POST /api/login      {user}         → {success} + access_token cookie
//!
//! Expected failures (code pending, expired, mismatch, delivery) are reported
//! in-band with `success: false`; missing fields are 400, store faults are 500.

use axum::{extract::Extension, Json};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domains::auth::{
    hash_email, issue_session, send_otp, verify_otp, AuthError, SessionIdentity,
};
use crate::server::{ApiError, AppState, JsonBody};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SendOtpRequest {
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VerifyOtpRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub otp: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    #[serde(default)]
    pub user: Option<LoginUser>,
}

/// User record as read from the hosted users table.
///
/// The client posts the whole row, so columns beyond these are ignored.
#[derive(Debug, Deserialize)]
pub struct LoginUser {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default, alias = "fullName")]
    pub full_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl AuthResponse {
    fn ok(message: Option<&str>) -> Self {
        Self {
            success: true,
            message: message.map(String::from),
            reason: None,
        }
    }

    fn failed(err: &AuthError) -> Self {
        Self {
            success: false,
            message: Some(err.to_string()),
            reason: Some(err.reason().to_string()),
        }
    }
}

/// Convert an action outcome into the in-band response, keeping residual
/// faults as errors.
fn respond<T>(
    result: Result<T, AuthError>,
    success_message: Option<&str>,
) -> Result<Json<AuthResponse>, ApiError> {
    match result {
        Ok(_) => Ok(Json(AuthResponse::ok(success_message))),
        Err(e) if e.is_reportable() => {
            warn!(reason = e.reason(), "Auth request not completed");
            Ok(Json(AuthResponse::failed(&e)))
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn send_otp_handler(
    Extension(state): Extension<AppState>,
    JsonBody(body): JsonBody<SendOtpRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let email = body.email.unwrap_or_default();
    respond(send_otp(&email, &state.deps).await, None)
}

pub async fn verify_otp_handler(
    Extension(state): Extension<AppState>,
    JsonBody(body): JsonBody<VerifyOtpRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let email = body.email.unwrap_or_default();
    let otp = body.otp.unwrap_or_default();
    respond(
        verify_otp(&email, &otp, &state.deps).await,
        Some("OTP verified successfully."),
    )
}

pub async fn login_handler(
    Extension(state): Extension<AppState>,
    jar: CookieJar,
    JsonBody(body): JsonBody<LoginRequest>,
) -> Result<(CookieJar, Json<AuthResponse>), ApiError> {
    let Some(user) = body.user else {
        return Err(ApiError::BadRequest("Invalid user data".to_string()));
    };

    let identity = SessionIdentity {
        id: user.id.unwrap_or_default(),
        email: user.email.unwrap_or_default(),
        username: user.username,
    };
    let token = issue_session(&identity, &state.deps.jwt_service)?;

    tracing::debug!(email_hash = %hash_email(&identity.email), "Setting session cookie");
    let jar = jar.add(state.session_cookie.build(token));

    Ok((jar, Json(AuthResponse::ok(None))))
}

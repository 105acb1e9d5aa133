use thiserror::Error;

use crate::domains::auth::TemplateError;

/// Failures of the OTP login flow.
///
/// Expected outcomes (already pending, expired, mismatch) and delivery problems
/// are reported to the caller as `{success: false}`; store and signing failures
/// are residual faults.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("{0}")]
    Validation(&'static str),

    #[error("OTP already sent. Please try again after {retry_after_minutes} minutes.")]
    AlreadyPending { retry_after_minutes: u64 },

    #[error("OTP expired or not found. Please request a new one.")]
    NotFoundOrExpired,

    #[error("Invalid OTP. Please try again.")]
    Mismatch,

    #[error("Failed to render OTP email: {0}")]
    Template(#[from] TemplateError),

    #[error("Failed to send OTP: {0}")]
    Delivery(#[source] anyhow::Error),

    #[error("OTP store error: {0}")]
    Store(#[source] anyhow::Error),

    #[error("Failed to issue session token: {0}")]
    Token(#[source] anyhow::Error),
}

impl AuthError {
    /// Machine-readable classification returned to clients and logged
    pub fn reason(&self) -> &'static str {
        match self {
            AuthError::Validation(_) => "invalid_input",
            AuthError::AlreadyPending { .. } => "already_pending",
            AuthError::NotFoundOrExpired => "not_found_or_expired",
            AuthError::Mismatch => "mismatch",
            AuthError::Template(_) => "template_failed",
            AuthError::Delivery(_) => "delivery_failed",
            AuthError::Store(_) => "store_unavailable",
            AuthError::Token(_) => "token_failed",
        }
    }

    /// Whether the failure is reported in-band as `{success: false, message}`
    /// rather than as an HTTP error status.
    pub fn is_reportable(&self) -> bool {
        matches!(
            self,
            AuthError::AlreadyPending { .. }
                | AuthError::NotFoundOrExpired
                | AuthError::Mismatch
                | AuthError::Template(_)
                | AuthError::Delivery(_)
        )
    }
}

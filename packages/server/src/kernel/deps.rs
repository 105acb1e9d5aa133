//! Server dependencies for the auth actions (using traits for testability)
//!
//! This module provides the dependency container used by route handlers.
//! All external services use trait abstractions to enable testing.

use anyhow::Result;
use async_trait::async_trait;
use mailer::{MailerService, OutgoingEmail};
use std::sync::Arc;

use crate::domains::auth::{JwtService, OtpEmailTemplate, OtpPolicy};
use crate::kernel::{BaseMailer, BaseOtpStore};

// =============================================================================
// MailerService Adapter (implements BaseMailer trait)
// =============================================================================

/// Wrapper around MailerService that implements BaseMailer trait
pub struct MailerAdapter(pub Arc<MailerService>);

impl MailerAdapter {
    pub fn new(service: Arc<MailerService>) -> Self {
        Self(service)
    }
}

#[async_trait]
impl BaseMailer for MailerAdapter {
    async fn send_html(&self, to: &str, subject: &str, html: &str) -> Result<()> {
        self.0
            .send(OutgoingEmail::new(to, subject, html))
            .await
            .map_err(|e| anyhow::anyhow!("{}", e))
    }
}

// =============================================================================
// ServerDeps
// =============================================================================

/// Server dependencies accessible to auth actions (using traits for testability)
#[derive(Clone)]
pub struct ServerDeps {
    pub otp_store: Arc<dyn BaseOtpStore>,
    pub mailer: Arc<dyn BaseMailer>,
    /// JWT service for session token creation and verification
    pub jwt_service: Arc<JwtService>,
    pub email_template: Arc<OtpEmailTemplate>,
    pub otp_policy: OtpPolicy,
    /// Sender and subject branding
    pub platform_name: String,
}

impl ServerDeps {
    pub fn new(
        otp_store: Arc<dyn BaseOtpStore>,
        mailer: Arc<dyn BaseMailer>,
        jwt_service: Arc<JwtService>,
        email_template: Arc<OtpEmailTemplate>,
        otp_policy: OtpPolicy,
        platform_name: String,
    ) -> Self {
        Self {
            otp_store,
            mailer,
            jwt_service,
            email_template,
            otp_policy,
            platform_name,
        }
    }
}

//! Send OTP action

use chrono::Utc;
use tracing::{error, info, warn};

use crate::domains::auth::models::{generate_otp_code, hash_email, normalize_email, otp_key};
use crate::domains::auth::{AuthError, OtpSent};
use crate::kernel::ServerDeps;

/// Generate a code, reserve it in the OTP store and email it.
///
/// Fails with `AlreadyPending` while an unexpired code exists for the email.
/// The reservation is an atomic set-if-absent, so of two concurrent requests
/// for the same email only one sends a code. If rendering or delivery fails the
/// reservation is released so the user can retry immediately.
pub async fn send_otp(email: &str, deps: &ServerDeps) -> Result<OtpSent, AuthError> {
    // Keyed by the normalized form, delivered to the address as entered
    let recipient = email.trim();
    let email = normalize_email(email);
    if email.is_empty() {
        return Err(AuthError::Validation("Email is required"));
    }

    let email_hash = hash_email(&email);
    let key = otp_key(&email);
    let policy = &deps.otp_policy;
    let already_pending = AuthError::AlreadyPending {
        retry_after_minutes: policy.retry_after_minutes(),
    };

    // 1. Existing unexpired code blocks a new one
    if deps
        .otp_store
        .get(&key)
        .await
        .map_err(AuthError::Store)?
        .is_some()
    {
        info!(email_hash = %email_hash, "OTP already pending");
        return Err(already_pending);
    }

    // 2. Reserve the new code atomically
    let code = generate_otp_code();
    let reserved = deps
        .otp_store
        .set_if_absent(&key, &code, policy.ttl)
        .await
        .map_err(AuthError::Store)?;
    if !reserved {
        info!(email_hash = %email_hash, "OTP reserved by a concurrent request");
        return Err(already_pending);
    }

    // 3. Render and deliver
    if let Err(e) = deliver(recipient, &code, deps).await {
        error!(email_hash = %email_hash, reason = e.reason(), error = %e, "OTP delivery failed");
        if let Err(release_err) = deps.otp_store.delete_if_matches(&key, &code).await {
            warn!(email_hash = %email_hash, error = %release_err, "Failed to release OTP reservation");
        }
        return Err(e);
    }

    info!(email_hash = %email_hash, "OTP sent");
    Ok(OtpSent {
        email,
        expires_at: Utc::now() + chrono::Duration::seconds(policy.ttl.as_secs() as i64),
    })
}

async fn deliver(email: &str, code: &str, deps: &ServerDeps) -> Result<(), AuthError> {
    let minutes = deps.otp_policy.retry_after_minutes().to_string();
    let html = deps.email_template.render(&[
        ("otp", code),
        ("name", email),
        ("platformName", &deps.platform_name),
        ("expiresInMinutes", &minutes),
    ])?;
    let subject = format!("{} - OTP to login to {}", code, deps.platform_name);

    deps.mailer
        .send_html(email, &subject, &html)
        .await
        .map_err(AuthError::Delivery)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::auth::models::is_otp_format;
    use crate::domains::auth::OtpEmailTemplate;
    use crate::kernel::{BaseOtpStore, SpyMailer, TestDependencies};
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_sends_and_stores_code() {
        let test_deps = TestDependencies::new();
        let deps = test_deps.server_deps();

        let sent = send_otp(" a@x.com ", &deps).await.unwrap();
        assert_eq!(sent.email, "a@x.com");

        let stored = test_deps.otp_store.get("otp:a@x.com").await.unwrap().unwrap();
        assert!(is_otp_format(&stored));
        assert_eq!(test_deps.otp_store.len(), 1);

        let email = test_deps.mailer.last_to("a@x.com").unwrap();
        assert_eq!(email.subject, format!("{} - OTP to login to Chatdesk", stored));
        assert!(email.html.contains(&stored));
    }

    #[tokio::test]
    async fn test_delivered_to_address_as_entered() {
        let test_deps = TestDependencies::new();
        let deps = test_deps.server_deps();

        send_otp("  Ana.Lima@X.com ", &deps).await.unwrap();

        let email = test_deps.mailer.last_to("Ana.Lima@X.com").unwrap();
        assert!(email.html.contains("Ana.Lima@X.com"));
        assert!(test_deps.mailer.last_to("ana.lima@x.com").is_none());
        assert!(test_deps.otp_store.get("otp:ana.lima@x.com").await.unwrap().is_some());

        // Same address in another case still hits the pending code
        let err = send_otp("ana.lima@x.com", &deps).await.unwrap_err();
        assert!(matches!(err, AuthError::AlreadyPending { .. }));
    }

    #[tokio::test]
    async fn test_second_request_is_rejected_and_keeps_code() {
        let test_deps = TestDependencies::new();
        let deps = test_deps.server_deps();

        send_otp("a@x.com", &deps).await.unwrap();
        let first = test_deps.otp_store.get("otp:a@x.com").await.unwrap();

        let err = send_otp("a@x.com", &deps).await.unwrap_err();
        assert!(matches!(
            err,
            AuthError::AlreadyPending {
                retry_after_minutes: 5
            }
        ));
        assert_eq!(test_deps.otp_store.get("otp:a@x.com").await.unwrap(), first);
        assert_eq!(test_deps.mailer.sent().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_code_after_expiry() {
        let test_deps = TestDependencies::new();
        let deps = test_deps.server_deps();

        send_otp("a@x.com", &deps).await.unwrap();
        tokio::time::advance(Duration::from_secs(301)).await;

        send_otp("a@x.com", &deps).await.unwrap();
        assert_eq!(test_deps.mailer.sent().len(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_requests_issue_one_code() {
        let test_deps = TestDependencies::new();
        let deps = test_deps.server_deps();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let deps = deps.clone();
                tokio::spawn(async move { send_otp("new@x.com", &deps).await })
            })
            .collect();

        let mut successes = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => successes += 1,
                Err(e) => assert!(matches!(e, AuthError::AlreadyPending { .. })),
            }
        }

        assert_eq!(successes, 1);
        assert_eq!(test_deps.mailer.sent().len(), 1);

        let stored = test_deps.otp_store.get("otp:new@x.com").await.unwrap().unwrap();
        assert!(test_deps.mailer.sent()[0].html.contains(&stored));
    }

    #[tokio::test]
    async fn test_delivery_failure_releases_reservation() {
        let test_deps = TestDependencies::new().with_mailer(SpyMailer::failing("connection refused"));
        let deps = test_deps.server_deps();

        let err = send_otp("a@x.com", &deps).await.unwrap_err();
        assert!(matches!(err, AuthError::Delivery(_)));
        assert!(err.to_string().contains("connection refused"));
        assert!(test_deps.otp_store.is_empty());
    }

    #[tokio::test]
    async fn test_template_failure_releases_reservation() {
        let test_deps = TestDependencies::new();
        let mut deps = test_deps.server_deps();
        deps.email_template = Arc::new(OtpEmailTemplate::from_source("{{otp}} {{missing}}"));

        let err = send_otp("a@x.com", &deps).await.unwrap_err();
        assert!(matches!(err, AuthError::Template(_)));
        assert!(test_deps.otp_store.is_empty());
        assert!(test_deps.mailer.sent().is_empty());
    }

    #[tokio::test]
    async fn test_empty_email_rejected() {
        let deps = TestDependencies::new().server_deps();
        let err = send_otp("   ", &deps).await.unwrap_err();
        assert!(matches!(err, AuthError::Validation("Email is required")));
    }
}

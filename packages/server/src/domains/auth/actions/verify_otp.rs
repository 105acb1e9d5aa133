//! Verify OTP action

use tracing::{info, warn};

use crate::domains::auth::models::{codes_match, hash_email, normalize_email, otp_key};
use crate::domains::auth::{AuthError, OtpVerified};
use crate::kernel::ServerDeps;

/// Compare the submitted code with the pending one for the email.
///
/// With `consume_on_verify` the record is removed on success and a concurrent
/// second verification of the same code fails; otherwise the code stays valid
/// until it expires.
pub async fn verify_otp(
    email: &str,
    submitted: &str,
    deps: &ServerDeps,
) -> Result<OtpVerified, AuthError> {
    let email = normalize_email(email);
    if email.is_empty() || submitted.is_empty() {
        return Err(AuthError::Validation("Email and OTP are required"));
    }

    let email_hash = hash_email(&email);
    let key = otp_key(&email);

    let Some(stored) = deps.otp_store.get(&key).await.map_err(AuthError::Store)? else {
        info!(email_hash = %email_hash, "No pending OTP");
        return Err(AuthError::NotFoundOrExpired);
    };

    if !codes_match(&stored, submitted) {
        warn!(email_hash = %email_hash, "OTP mismatch");
        return Err(AuthError::Mismatch);
    }

    if deps.otp_policy.consume_on_verify {
        let consumed = deps
            .otp_store
            .delete_if_matches(&key, &stored)
            .await
            .map_err(AuthError::Store)?;
        if !consumed {
            info!(email_hash = %email_hash, "OTP consumed by a concurrent verification");
            return Err(AuthError::NotFoundOrExpired);
        }
    }

    info!(email_hash = %email_hash, "OTP verified");
    Ok(OtpVerified { email })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::auth::OtpPolicy;
    use crate::kernel::TestDependencies;
    use std::time::Duration;

    fn seeded(policy: OtpPolicy) -> TestDependencies {
        let test_deps = TestDependencies::new().with_policy(policy);
        test_deps
            .otp_store
            .seed("otp:a@x.com", "123456", Duration::from_secs(300));
        test_deps
    }

    #[tokio::test]
    async fn test_correct_code_verifies() {
        let test_deps = seeded(OtpPolicy::default());
        let deps = test_deps.server_deps();

        let verified = verify_otp("A@x.com", "123456", &deps).await.unwrap();
        assert_eq!(verified.email, "a@x.com");
    }

    #[tokio::test]
    async fn test_wrong_code_is_mismatch() {
        let test_deps = seeded(OtpPolicy::default());
        let deps = test_deps.server_deps();

        let err = verify_otp("a@x.com", "000000", &deps).await.unwrap_err();
        assert!(matches!(err, AuthError::Mismatch));

        // The pending code survives a wrong guess
        verify_otp("a@x.com", "123456", &deps).await.unwrap();
    }

    #[tokio::test]
    async fn test_unknown_email_is_not_found() {
        let deps = TestDependencies::new().server_deps();

        let err = verify_otp("a@x.com", "123456", &deps).await.unwrap_err();
        assert!(matches!(err, AuthError::NotFoundOrExpired));
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_code_is_not_found() {
        let test_deps = seeded(OtpPolicy::default());
        let deps = test_deps.server_deps();

        tokio::time::advance(Duration::from_secs(301)).await;

        let err = verify_otp("a@x.com", "123456", &deps).await.unwrap_err();
        assert!(matches!(err, AuthError::NotFoundOrExpired));
    }

    #[tokio::test]
    async fn test_code_is_reusable_by_default() {
        let test_deps = seeded(OtpPolicy::default());
        let deps = test_deps.server_deps();

        verify_otp("a@x.com", "123456", &deps).await.unwrap();
        verify_otp("a@x.com", "123456", &deps).await.unwrap();
        assert_eq!(test_deps.otp_store.len(), 1);
    }

    #[tokio::test]
    async fn test_consume_on_verify_makes_code_single_use() {
        let test_deps = seeded(OtpPolicy {
            consume_on_verify: true,
            ..OtpPolicy::default()
        });
        let deps = test_deps.server_deps();

        verify_otp("a@x.com", "123456", &deps).await.unwrap();
        let err = verify_otp("a@x.com", "123456", &deps).await.unwrap_err();
        assert!(matches!(err, AuthError::NotFoundOrExpired));
        assert!(test_deps.otp_store.is_empty());
    }

    #[tokio::test]
    async fn test_missing_code_rejected() {
        let deps = TestDependencies::new().server_deps();
        let err = verify_otp("a@x.com", "", &deps).await.unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));
    }
}

// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// OTP issuing and verification live in domains/auth and use these traits.
//
// Naming convention: Base* for trait names (e.g., BaseOtpStore, BaseMailer)

use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;

// =============================================================================
// OTP Store Trait (Infrastructure - expiring key/value records)
// =============================================================================

#[async_trait]
pub trait BaseOtpStore: Send + Sync {
    /// Current value for key, `None` if absent or expired
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store value with a TTL only if no unexpired value exists.
    ///
    /// Returns `true` if this call created the record. Must be atomic: of two
    /// concurrent callers for the same key, at most one observes `true`.
    async fn set_if_absent(&self, key: &str, value: &str, ttl: Duration) -> Result<bool>;

    /// Delete the record only if it still holds `value`. Returns `true` if deleted.
    async fn delete_if_matches(&self, key: &str, value: &str) -> Result<bool>;

    /// Connectivity check for health reporting
    async fn ping(&self) -> Result<()>;
}

// =============================================================================
// Mailer Trait (Infrastructure - notification transport)
// =============================================================================

#[async_trait]
pub trait BaseMailer: Send + Sync {
    /// Send an HTML email
    async fn send_html(&self, to: &str, subject: &str, html: &str) -> Result<()>;
}

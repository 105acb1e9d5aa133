// TestDependencies - in-process implementations for testing
//
// Provides an in-memory OTP store and a recording mailer that can be injected
// into ServerDeps for router and flow tests.

use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

use super::{BaseMailer, BaseOtpStore, ServerDeps};
use crate::domains::auth::{JwtService, OtpEmailTemplate, OtpPolicy};

// =============================================================================
// In-memory OTP Store
// =============================================================================

/// Expiring key/value map guarded by a mutex.
///
/// Uses `tokio::time::Instant` so tests can pause and advance the clock.
#[derive(Default)]
pub struct InMemoryOtpStore {
    entries: Mutex<HashMap<String, (String, Instant)>>,
}

impl InMemoryOtpStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record directly, bypassing the set-if-absent check
    pub fn seed(&self, key: &str, value: &str, ttl: Duration) {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), (value.to_string(), Instant::now() + ttl));
    }

    /// Number of unexpired records
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .lock()
            .unwrap()
            .values()
            .filter(|(_, expires_at)| *expires_at > now)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl BaseOtpStore for InMemoryOtpStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut entries = self.entries.lock().unwrap();
        match entries.get(key) {
            Some((value, expires_at)) if *expires_at > Instant::now() => Ok(Some(value.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set_if_absent(&self, key: &str, value: &str, ttl: Duration) -> Result<bool> {
        let mut entries = self.entries.lock().unwrap();
        let now = Instant::now();
        if let Some((_, expires_at)) = entries.get(key) {
            if *expires_at > now {
                return Ok(false);
            }
        }
        entries.insert(key.to_string(), (value.to_string(), now + ttl));
        Ok(true)
    }

    async fn delete_if_matches(&self, key: &str, value: &str) -> Result<bool> {
        let mut entries = self.entries.lock().unwrap();
        match entries.get(key) {
            Some((stored, _)) if stored == value => {
                entries.remove(key);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

// =============================================================================
// Spy Mailer
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Records every email instead of sending it; optionally fails every send.
#[derive(Default)]
pub struct SpyMailer {
    sent: Mutex<Vec<SentEmail>>,
    fail_with: Option<String>,
}

impl SpyMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mailer whose every send fails with the given transport message
    pub fn failing(message: &str) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail_with: Some(message.to_string()),
        }
    }

    pub fn sent(&self) -> Vec<SentEmail> {
        self.sent.lock().unwrap().clone()
    }

    pub fn last_to(&self, recipient: &str) -> Option<SentEmail> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|email| email.to == recipient)
            .cloned()
    }
}

#[async_trait]
impl BaseMailer for SpyMailer {
    async fn send_html(&self, to: &str, subject: &str, html: &str) -> Result<()> {
        if let Some(message) = &self.fail_with {
            anyhow::bail!("{}", message);
        }
        self.sent.lock().unwrap().push(SentEmail {
            to: to.to_string(),
            subject: subject.to_string(),
            html: html.to_string(),
        });
        Ok(())
    }
}

// =============================================================================
// TestDependencies
// =============================================================================

pub const TEST_JWT_SECRET: &str = "test_secret_key";
pub const TEST_JWT_ISSUER: &str = "test_issuer";

/// Bundle of in-process dependencies with handles kept for assertions.
pub struct TestDependencies {
    pub otp_store: Arc<InMemoryOtpStore>,
    pub mailer: Arc<SpyMailer>,
    pub jwt_service: Arc<JwtService>,
    pub otp_policy: OtpPolicy,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            otp_store: Arc::new(InMemoryOtpStore::new()),
            mailer: Arc::new(SpyMailer::new()),
            jwt_service: Arc::new(JwtService::new(
                TEST_JWT_SECRET,
                TEST_JWT_ISSUER.to_string(),
                Duration::from_secs(86_400),
            )),
            otp_policy: OtpPolicy::default(),
        }
    }

    pub fn with_mailer(mut self, mailer: SpyMailer) -> Self {
        self.mailer = Arc::new(mailer);
        self
    }

    pub fn with_policy(mut self, policy: OtpPolicy) -> Self {
        self.otp_policy = policy;
        self
    }

    pub fn server_deps(&self) -> ServerDeps {
        ServerDeps::new(
            self.otp_store.clone(),
            self.mailer.clone(),
            self.jwt_service.clone(),
            Arc::new(OtpEmailTemplate::builtin()),
            self.otp_policy.clone(),
            "Chatdesk".to_string(),
        )
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}

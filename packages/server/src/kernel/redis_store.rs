//! Redis-backed OTP store.
//!
//! One string key per pending code, expiry handled by Redis (`EX`).
//! Reservation uses `SET NX EX` so the one-pending-code-per-email rule holds
//! across concurrent requests and server instances.

use anyhow::{Context, Result};
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client, Script};
use std::time::Duration;
use tracing::info;

use crate::kernel::BaseOtpStore;

const DELETE_IF_MATCHES: &str = r#"
if redis.call("GET", KEYS[1]) == ARGV[1] then
    return redis.call("DEL", KEYS[1])
end
return 0
"#;

#[derive(Clone)]
pub struct RedisOtpStore {
    connection: ConnectionManager,
}

impl RedisOtpStore {
    pub async fn connect(redis_url: &str) -> Result<Self> {
        info!("Connecting to Redis...");
        let client = Client::open(redis_url).context("Invalid REDIS_URL")?;
        let connection = client
            .get_connection_manager()
            .await
            .context("Failed to connect to Redis")?;
        info!("Redis connected");

        Ok(Self { connection })
    }
}

#[async_trait]
impl BaseOtpStore for RedisOtpStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.connection.clone();
        let value: Option<String> = conn.get(key).await.context("Redis GET failed")?;
        Ok(value)
    }

    async fn set_if_absent(&self, key: &str, value: &str, ttl: Duration) -> Result<bool> {
        let mut conn = self.connection.clone();
        // Redis replies "OK" when the key was set and nil when NX prevented it
        let reply: Option<String> = redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("NX")
            .arg("EX")
            .arg(ttl.as_secs().max(1))
            .query_async(&mut conn)
            .await
            .context("Redis SET NX failed")?;
        Ok(reply.is_some())
    }

    async fn delete_if_matches(&self, key: &str, value: &str) -> Result<bool> {
        let mut conn = self.connection.clone();
        let deleted: i64 = Script::new(DELETE_IF_MATCHES)
            .key(key)
            .arg(value)
            .invoke_async(&mut conn)
            .await
            .context("Redis compare-and-delete failed")?;
        Ok(deleted > 0)
    }

    async fn ping(&self) -> Result<()> {
        let mut conn = self.connection.clone();
        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .context("Redis PING failed")?;
        Ok(())
    }
}

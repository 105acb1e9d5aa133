//! Test harness with testcontainers for the Redis-backed store.
//!
//! A single Redis container is started on first use and shared by every test.
//! Each test gets its own key prefix so tests never see each other's codes.

use anyhow::{Context, Result};
use server_core::kernel::RedisOtpStore;
use test_context::AsyncTestContext;
use testcontainers::runners::AsyncRunner;
use testcontainers::ContainerAsync;
use testcontainers_modules::redis::Redis;
use tokio::sync::OnceCell;
use uuid::Uuid;

/// Shared test infrastructure that persists across all tests.
struct SharedTestInfra {
    redis_url: String,
    // Keep the container alive for the entire test run
    _redis: ContainerAsync<Redis>,
}

static SHARED_INFRA: OnceCell<SharedTestInfra> = OnceCell::const_new();

impl SharedTestInfra {
    async fn init() -> Result<Self> {
        // Run tests with: RUST_LOG=debug cargo test -- --nocapture
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let redis = Redis::default()
            .start()
            .await
            .context("Failed to start Redis container")?;

        let redis_host = redis.get_host().await?;
        let redis_port = redis.get_host_port_ipv4(6379).await?;
        let redis_url = format!("redis://{}:{}", redis_host, redis_port);

        Ok(Self {
            redis_url,
            _redis: redis,
        })
    }

    async fn get() -> &'static Self {
        SHARED_INFRA
            .get_or_init(|| async {
                Self::init()
                    .await
                    .expect("Failed to initialize shared test infrastructure")
            })
            .await
    }
}

/// Redis-backed store plus a per-test key namespace.
///
/// ```ignore
/// #[test_context(RedisHarness)]
/// #[tokio::test]
/// async fn my_test(ctx: &RedisHarness) {
///     let key = ctx.key("a@x.com");
/// }
/// ```
pub struct RedisHarness {
    pub store: RedisOtpStore,
    namespace: String,
}

impl AsyncTestContext for RedisHarness {
    async fn setup() -> Self {
        Self::new().await.expect("Failed to create test harness")
    }

    async fn teardown(self) {
        // Keys expire on their own
    }
}

impl RedisHarness {
    pub async fn new() -> Result<Self> {
        let infra = SharedTestInfra::get().await;
        let store = RedisOtpStore::connect(&infra.redis_url).await?;

        Ok(Self {
            store,
            namespace: Uuid::new_v4().to_string(),
        })
    }

    /// Store key unique to this test
    pub fn key(&self, email: &str) -> String {
        format!("otp:{}:{}", self.namespace, email)
    }
}

//! Kernel module - server infrastructure and dependencies.

pub mod deps;
pub mod redis_store;
pub mod test_dependencies;
pub mod traits;

pub use deps::{MailerAdapter, ServerDeps};
pub use redis_store::RedisOtpStore;
pub use test_dependencies::{InMemoryOtpStore, SentEmail, SpyMailer, TestDependencies};
pub use traits::*;

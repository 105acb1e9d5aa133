use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Deployment environment; production enables `Secure` session cookies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

impl FromStr for Environment {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(Environment::Production),
            "development" | "dev" | "test" => Ok(Environment::Development),
            other => anyhow::bail!("unknown APP_ENV value: {}", other),
        }
    }
}

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub environment: Environment,
    pub redis_url: String,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_user: String,
    pub smtp_password: String,
    pub smtp_starttls: bool,
    pub platform_name: String,
    pub otp_template_path: Option<String>,
    pub otp_ttl: Duration,
    pub otp_consume_on_verify: bool,
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub session_token_ttl: Duration,
    pub session_cookie_max_age: Duration,
    pub allowed_origins: Vec<String>,
    pub rate_limit_enabled: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            port: parse_or("PORT", 8080)?,
            environment: parse_or("APP_ENV", Environment::Development)?,
            redis_url: env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://localhost:6379".to_string()),
            smtp_host: env::var("SMTP_HOST").context("SMTP_HOST must be set")?,
            smtp_port: parse_or("SMTP_PORT", 587)?,
            smtp_user: env::var("SMTP_USER").context("SMTP_USER must be set")?,
            smtp_password: env::var("SMTP_PASSWORD").context("SMTP_PASSWORD must be set")?,
            smtp_starttls: parse_or("SMTP_STARTTLS", true)?,
            platform_name: env::var("PLATFORM_NAME").unwrap_or_else(|_| "Chatdesk".to_string()),
            otp_template_path: env::var("OTP_TEMPLATE_PATH").ok(),
            otp_ttl: Duration::from_secs(parse_or("OTP_TTL_SECS", 300)?),
            otp_consume_on_verify: parse_or("OTP_CONSUME_ON_VERIFY", false)?,
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            jwt_issuer: env::var("JWT_ISSUER").unwrap_or_else(|_| "chatdesk".to_string()),
            session_token_ttl: Duration::from_secs(parse_or("SESSION_TOKEN_TTL_SECS", 86_400)?),
            session_cookie_max_age: Duration::from_secs(parse_or(
                "SESSION_COOKIE_MAX_AGE_SECS",
                604_800,
            )?),
            allowed_origins: env::var("ALLOWED_ORIGINS")
                .map(|origins| parse_list(&origins))
                .unwrap_or_default(),
            rate_limit_enabled: parse_or("RATE_LIMIT_ENABLED", true)?,
        })
    }
}

fn parse_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{} has an invalid value: {}", key, e)),
        Err(_) => Ok(default),
    }
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

// Main entry point for the OTP login server

use std::sync::Arc;

use anyhow::{Context, Result};
use mailer::{MailerOptions, MailerService};
use server_core::domains::auth::{JwtService, OtpEmailTemplate, OtpPolicy};
use server_core::kernel::{MailerAdapter, RedisOtpStore, ServerDeps};
use server_core::server::{build_app, HttpOptions};
use server_core::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,server_core=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting OTP login server");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(environment = ?config.environment, "Configuration loaded");

    // Connect to the OTP store
    let otp_store = RedisOtpStore::connect(&config.redis_url).await?;

    let mailer = MailerService::new(MailerOptions {
        host: config.smtp_host.clone(),
        port: config.smtp_port,
        username: config.smtp_user.clone(),
        password: config.smtp_password.clone(),
        from_name: config.platform_name.clone(),
        starttls: config.smtp_starttls,
    })
    .context("Failed to configure SMTP transport")?;

    let email_template = match &config.otp_template_path {
        Some(path) => OtpEmailTemplate::load(path)
            .await
            .with_context(|| format!("Failed to load OTP template from {}", path))?,
        None => OtpEmailTemplate::builtin(),
    };

    let jwt_service = JwtService::new(
        &config.jwt_secret,
        config.jwt_issuer.clone(),
        config.session_token_ttl,
    );

    let deps = ServerDeps::new(
        Arc::new(otp_store),
        Arc::new(MailerAdapter::new(Arc::new(mailer))),
        Arc::new(jwt_service),
        Arc::new(email_template),
        OtpPolicy {
            ttl: config.otp_ttl,
            consume_on_verify: config.otp_consume_on_verify,
        },
        config.platform_name.clone(),
    );

    // Build application
    let app = build_app(deps, HttpOptions::from_config(&config))?;

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .await
    .context("Server error")?;

    Ok(())
}

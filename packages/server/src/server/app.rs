//! Application setup and server configuration.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::{
    extract::Extension,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware,
    routing::{get, post},
    Router,
};
use axum_extra::extract::cookie::{Cookie, SameSite};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::kernel::ServerDeps;
use crate::server::middleware::{session_auth_middleware, with_rate_limit};
use crate::server::routes::{
    health_handler, login_handler, send_otp_handler, session_handler, verify_otp_handler,
};

/// Name of the cookie holding the session token
pub const SESSION_COOKIE_NAME: &str = "access_token";

/// Attributes of the session cookie set on login
#[derive(Clone, Debug)]
pub struct SessionCookie {
    pub max_age: Duration,
    /// Only sent over HTTPS
    pub secure: bool,
}

impl SessionCookie {
    pub fn build(&self, token: String) -> Cookie<'static> {
        let max_age =
            time::Duration::seconds(i64::try_from(self.max_age.as_secs()).unwrap_or(i64::MAX));

        // Readable by the browser client, which also checks for its presence
        Cookie::build((SESSION_COOKIE_NAME, token))
            .path("/")
            .max_age(max_age)
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .http_only(false)
            .build()
    }
}

impl Default for SessionCookie {
    fn default() -> Self {
        Self {
            max_age: Duration::from_secs(7 * 24 * 60 * 60),
            secure: false,
        }
    }
}

/// HTTP surface options
#[derive(Clone, Debug, Default)]
pub struct HttpOptions {
    /// Empty means any origin without credentials
    pub allowed_origins: Vec<String>,
    pub rate_limit_enabled: bool,
    pub session_cookie: SessionCookie,
}

impl HttpOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            allowed_origins: config.allowed_origins.clone(),
            rate_limit_enabled: config.rate_limit_enabled,
            session_cookie: SessionCookie {
                max_age: config.session_cookie_max_age,
                secure: config.environment.is_production(),
            },
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub deps: Arc<ServerDeps>,
    pub session_cookie: SessionCookie,
}

fn cors_layer(allowed_origins: &[String]) -> Result<CorsLayer> {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    if allowed_origins.is_empty() {
        return Ok(cors.allow_origin(Any));
    }

    let origins = allowed_origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .with_context(|| format!("Invalid allowed origin: {}", origin))
        })
        .collect::<Result<Vec<_>>>()?;

    // Credentials let the browser keep the session cookie across origins
    Ok(cors
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true))
}

/// Build the Axum application router
pub fn build_app(deps: ServerDeps, options: HttpOptions) -> Result<Router> {
    let jwt_service = deps.jwt_service.clone();

    let app_state = AppState {
        deps: Arc::new(deps),
        session_cookie: options.session_cookie,
    };

    let mut api = Router::new()
        .route("/api/send-otp", post(send_otp_handler))
        .route("/api/verify-otp", post(verify_otp_handler))
        .route("/api/login", post(login_handler));

    if options.rate_limit_enabled {
        api = with_rate_limit(api)?;
    }

    let cors = cors_layer(&options.allowed_origins)?;

    let app = api
        .route("/api/session", get(session_handler))
        // Health check (no rate limit)
        .route("/health", get(health_handler))
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(middleware::from_fn(move |req, next| {
            session_auth_middleware(jwt_service.clone(), req, next)
        }))
        .layer(Extension(app_state))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    Ok(app)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = SessionCookie::default().build("token".to_string());

        assert_eq!(cookie.name(), "access_token");
        assert_eq!(cookie.value(), "token");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(time::Duration::days(7)));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_ne!(cookie.http_only(), Some(true));
    }

    #[test]
    fn test_secure_cookie_in_production() {
        let cookie = SessionCookie {
            max_age: Duration::from_secs(60),
            secure: true,
        }
        .build("token".to_string());

        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.max_age(), Some(time::Duration::seconds(60)));
    }

    #[test]
    fn test_invalid_origin_rejected() {
        assert!(cors_layer(&["bad\norigin".to_string()]).is_err());
        assert!(cors_layer(&["http://localhost:3000".to_string()]).is_ok());
        assert!(cors_layer(&[]).is_ok());
    }
}

//! HTTP client for the auth endpoints.

use std::sync::Arc;

use reqwest::cookie::{CookieStore, Jar};
use reqwest::{Client, Response, StatusCode, Url};
use serde::Serialize;
use serde_json::json;

use crate::error::{ClientError, Result};
use crate::types::{AuthResponse, SessionInfo, UserRecord};

const SESSION_COOKIE_NAME: &str = "access_token";

/// Client of one auth server. Keeps the session cookie between calls, like a browser.
#[derive(Clone)]
pub struct AuthApi {
    client: Client,
    cookies: Arc<Jar>,
    base_url: Url,
}

impl AuthApi {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ClientError::Config(format!("Invalid base URL {}: {}", base_url, e)))?;
        let cookies = Arc::new(Jar::default());
        let client = Client::builder()
            .cookie_provider(cookies.clone())
            .build()?;

        Ok(Self {
            client,
            cookies,
            base_url,
        })
    }

    fn url(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| ClientError::Config(format!("Invalid path {}: {}", path, e)))
    }

    async fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<AuthResponse> {
        let resp = self.client.post(self.url(path)?).json(body).send().await?;
        read_auth_response(resp).await
    }

    /// `POST /api/send-otp`
    pub async fn send_otp(&self, email: &str) -> Result<AuthResponse> {
        self.post("/api/send-otp", &json!({ "email": email })).await
    }

    /// `POST /api/verify-otp`
    pub async fn verify_otp(&self, email: &str, otp: &str) -> Result<AuthResponse> {
        self.post("/api/verify-otp", &json!({ "email": email, "otp": otp }))
            .await
    }

    /// `POST /api/login`; on success the session cookie lands in the jar.
    pub async fn login(&self, user: &UserRecord) -> Result<AuthResponse> {
        self.post("/api/login", &json!({ "user": user })).await
    }

    /// `GET /api/session`; `None` when not logged in.
    pub async fn session(&self) -> Result<Option<SessionInfo>> {
        let resp = self.client.get(self.url("/api/session")?).send().await?;

        if resp.status() == StatusCode::UNAUTHORIZED {
            return Ok(None);
        }
        let resp = check_status(resp).await?;
        Ok(Some(resp.json().await?))
    }

    /// Session token currently held in the cookie jar
    pub fn session_token(&self) -> Option<String> {
        let header = self.cookies.cookies(&self.base_url)?;
        let cookies = header.to_str().ok()?;

        cookies.split(';').find_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            (name == SESSION_COOKIE_NAME).then(|| value.to_string())
        })
    }
}

async fn check_status(resp: Response) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    if status == StatusCode::BAD_REQUEST {
        let message = serde_json::from_str::<AuthResponse>(&body)
            .ok()
            .and_then(|r| r.error)
            .unwrap_or(body);
        return Err(ClientError::Rejected(message));
    }

    Err(ClientError::Api {
        status: status.as_u16(),
        message: body,
    })
}

async fn read_auth_response(resp: Response) -> Result<AuthResponse> {
    let resp = check_status(resp).await?;
    Ok(resp.json().await?)
}

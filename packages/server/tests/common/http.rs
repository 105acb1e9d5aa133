//! In-process HTTP client for the router.
//!
//! Requests go through `tower::ServiceExt::oneshot`, so no socket is bound and
//! rate limiting is disabled (there is no peer address to key on).

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::Value;
use server_core::kernel::TestDependencies;
use server_core::server::{build_app, HttpOptions};
use tower::ServiceExt;

pub struct TestResponse {
    pub status: StatusCode,
    pub set_cookie: Vec<String>,
    pub body: Value,
}

pub struct TestApp {
    pub deps: TestDependencies,
    router: Router,
}

impl TestApp {
    pub fn new(deps: TestDependencies) -> Self {
        let router = build_app(deps.server_deps(), HttpOptions::default())
            .expect("Failed to build router");
        Self { deps, router }
    }

    pub async fn post_json(&self, path: &str, body: Value) -> TestResponse {
        let request = Request::post(path)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    pub async fn post_raw(&self, path: &str, body: &str) -> TestResponse {
        let request = Request::post(path)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    pub async fn get(&self, path: &str, cookie: Option<&str>) -> TestResponse {
        let mut request = Request::get(path);
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }
        self.send(request.body(Body::empty()).unwrap()).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();

        let status = response.status();
        let set_cookie = response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok().map(String::from))
            .collect();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        TestResponse {
            status,
            set_cookie,
            body,
        }
    }

    /// Code from the most recent email to the recipient
    pub fn last_code_for(&self, email: &str) -> Option<String> {
        let sent = self.deps.mailer.last_to(email)?;
        sent.subject.split(" - ").next().map(String::from)
    }
}

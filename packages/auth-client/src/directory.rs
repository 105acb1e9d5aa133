//! Lookup-or-create of users in the hosted relational store.
//!
//! The backend-as-a-service exposes tables over a PostgREST-style interface:
//! `GET /rest/v1/users?email=eq.<email>` and `POST /rest/v1/users`, both
//! authorized with the anon key.

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::error::{ClientError, Result};
use crate::types::{NewUser, UserRecord};

#[async_trait]
pub trait IdentityDirectory: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>>;

    async fn create(&self, user: &NewUser) -> Result<UserRecord>;
}

pub struct RestDirectory {
    client: Client,
    base_url: String,
    anon_key: String,
}

impl RestDirectory {
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
        }
    }

    /// Reads `BAAS_URL` and `BAAS_ANON_KEY`
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var("BAAS_URL")
            .map_err(|_| ClientError::Config("BAAS_URL must be set".to_string()))?;
        let anon_key = std::env::var("BAAS_ANON_KEY")
            .map_err(|_| ClientError::Config("BAAS_ANON_KEY must be set".to_string()))?;
        Ok(Self::new(base_url, anon_key))
    }

    fn users_url(&self) -> String {
        format!("{}/rest/v1/users", self.base_url)
    }

    async fn rows(resp: reqwest::Response) -> Result<Vec<UserRecord>> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::Api {
                status: status.as_u16(),
                message: body,
            });
        }
        Ok(resp.json().await?)
    }
}

#[async_trait]
impl IdentityDirectory for RestDirectory {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>> {
        let resp = self
            .client
            .get(self.users_url())
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .query(&[
                ("select", "*".to_string()),
                ("email", format!("eq.{}", email)),
                ("limit", "1".to_string()),
            ])
            .send()
            .await?;

        let user = Self::rows(resp).await?.into_iter().next();
        debug!(found = user.is_some(), "User lookup by email");
        Ok(user)
    }

    async fn create(&self, user: &NewUser) -> Result<UserRecord> {
        let resp = self
            .client
            .post(self.users_url())
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .header("Prefer", "return=representation")
            .json(&[user])
            .send()
            .await?;

        Self::rows(resp)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ClientError::Api {
                status: 201,
                message: "Insert returned no rows".to_string(),
            })
    }
}

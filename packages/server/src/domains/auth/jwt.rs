use anyhow::Result;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

use crate::domains::auth::SessionIdentity;

/// JWT Claims - data stored in the token
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,   // Subject (user id)
    pub id: String,    // User id
    pub email: String, // User email
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub exp: i64,    // Expiration timestamp
    pub iat: i64,    // Issued at timestamp
    pub iss: String, // Issuer
    pub jti: String, // JWT ID (unique token identifier)
}

impl Claims {
    pub fn identity(&self) -> SessionIdentity {
        SessionIdentity {
            id: self.id.clone(),
            email: self.email.clone(),
            username: self.username.clone(),
        }
    }
}

/// JWT Service - creates and verifies session tokens
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    token_ttl: Duration,
}

impl JwtService {
    /// Create new JWT service with secret, issuer and token lifetime
    pub fn new(secret: &str, issuer: String, token_ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            issuer,
            token_ttl,
        }
    }

    /// Create a new JWT token for a user
    pub fn create_token(&self, identity: &SessionIdentity) -> Result<String> {
        let now = chrono::Utc::now();
        let exp = now + chrono::Duration::seconds(self.token_ttl.as_secs() as i64);

        let claims = Claims {
            sub: identity.id.clone(),
            id: identity.id.clone(),
            email: identity.email.clone(),
            username: identity.username.clone(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: self.issuer.clone(),
            jti: Uuid::new_v4().to_string(), // Unique token ID
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(Into::into)
    }

    /// Verify and decode a JWT token
    ///
    /// Returns claims if token is valid and not expired
    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.issuer]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(Into::into)
    }
}

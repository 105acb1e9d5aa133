//! Auth domain data types
//!
//! Simple, serializable types returned by auth actions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Result of sending an OTP
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtpSent {
    pub email: String,
    pub expires_at: DateTime<Utc>,
}

/// Result of verifying an OTP
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtpVerified {
    pub email: String,
}

/// Identity embedded in a session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionIdentity {
    pub id: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

//! Auth domain - handles login via email OTP
//!
//! Flow:
//!   send-otp → code reserved in the OTP store + emailed
//!   verify-otp → code compared against the pending record
//!   login → signed session token returned as the `access_token` cookie
//!
//! Responsibilities:
//! - OTP generation, delivery and verification
//! - Session/JWT token management
//! - Email hashing for privacy in logs

pub mod actions;
pub mod errors;
pub mod jwt;
pub mod models;
pub mod template;
pub mod types;

pub use actions::{issue_session, send_otp, verify_otp};
pub use errors::AuthError;
pub use jwt::{Claims, JwtService};
pub use models::{hash_email, normalize_email, OtpPolicy};
pub use template::{OtpEmailTemplate, TemplateError};
pub use types::{OtpSent, OtpVerified, SessionIdentity};

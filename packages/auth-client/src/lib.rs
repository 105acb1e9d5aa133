//! Client side of the email OTP login.
//!
//! Wraps the three auth endpoints (`send-otp`, `verify-otp`, `login`) plus the
//! session check, and drives the two-phase login form: request a code, then
//! submit it, look up or create the user in the hosted users table and open a
//! session.
//!
//! # Example
//!
//! ```rust,ignore
//! use auth_client::{AuthApi, LoginFlow, LoginForm, RestDirectory};
//!
//! let api = AuthApi::new("http://localhost:8080")?;
//! let mut flow = LoginFlow::new(api, RestDirectory::from_env()?);
//!
//! flow.request_code(LoginForm {
//!     username: "ana".into(),
//!     full_name: "Ana Lima".into(),
//!     phone: "5551234567".into(),
//!     email: "ana@example.com".into(),
//! })
//! .await?;
//!
//! let user = flow.submit_code("123456").await?;
//! println!("Logged in as {}", user.user.email);
//! ```

pub mod api;
pub mod directory;
pub mod error;
pub mod flow;
pub mod types;
pub mod validation;

pub use api::AuthApi;
pub use directory::{IdentityDirectory, RestDirectory};
pub use error::{ClientError, FlowError, Result};
pub use flow::{AuthenticatedUser, FlowState, LoginFlow, LoginForm};
pub use types::{AuthResponse, NewUser, SessionInfo, SessionUser, UserRecord};
pub use validation::{is_complete_otp, is_valid_email, sanitize_otp_input, sanitize_phone_input};

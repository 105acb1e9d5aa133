//! Two-phase login form.
//!
//! ```text
//! Unverified --request_code--> CodePending --submit_code--> Authenticated
//!                                   |  ^
//!                     expired code  |  | wrong code
//!                                   v  |
//!                              Unverified / CodePending
//! ```
//!
//! Each step is one `async fn`; dropping its future abandons the round trip
//! without touching the state.

use tracing::{info, warn};

use crate::api::AuthApi;
use crate::directory::IdentityDirectory;
use crate::error::FlowError;
use crate::types::{AuthResponse, NewUser, UserRecord};
use crate::validation::{is_complete_otp, is_valid_email};

const EXPIRED_REASON: &str = "not_found_or_expired";

/// Fields of the first form step
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub username: String,
    pub full_name: String,
    pub phone: String,
    pub email: String,
}

impl LoginForm {
    fn validate(&self) -> Result<(), FlowError> {
        for (name, value) in [
            ("Username", &self.username),
            ("Full name", &self.full_name),
            ("Phone", &self.phone),
            ("Email", &self.email),
        ] {
            if value.trim().is_empty() {
                return Err(FlowError::MissingField(name));
            }
        }
        if !is_valid_email(self.email.trim()) {
            return Err(FlowError::InvalidEmail);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user: UserRecord,
    /// Session token from the `access_token` cookie
    pub token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowState {
    Unverified,
    CodePending { email: String },
    Authenticated(AuthenticatedUser),
}

pub struct LoginFlow<D> {
    api: AuthApi,
    directory: D,
    state: FlowState,
    form: LoginForm,
}

impl<D: IdentityDirectory> LoginFlow<D> {
    pub fn new(api: AuthApi, directory: D) -> Self {
        Self {
            api,
            directory,
            state: FlowState::Unverified,
            form: LoginForm::default(),
        }
    }

    pub fn state(&self) -> &FlowState {
        &self.state
    }

    pub fn api(&self) -> &AuthApi {
        &self.api
    }

    /// The logged-in user, handed over to the caller
    pub fn into_authenticated(self) -> Option<AuthenticatedUser> {
        match self.state {
            FlowState::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    /// Validate the form and ask the server to email a code.
    pub async fn request_code(&mut self, form: LoginForm) -> Result<(), FlowError> {
        form.validate()?;
        let email = form.email.trim().to_lowercase();

        let response = self.api.send_otp(&email).await?;
        if !response.success {
            return Err(rejected(response, "Failed to send OTP"));
        }

        info!("OTP requested");
        self.form = form;
        self.state = FlowState::CodePending { email };
        Ok(())
    }

    /// Verify the code, find or create the user and open a session.
    pub async fn submit_code(&mut self, otp: &str) -> Result<&AuthenticatedUser, FlowError> {
        let FlowState::CodePending { email } = &self.state else {
            return Err(FlowError::NoPendingCode);
        };
        let email = email.clone();
        if !is_complete_otp(otp) {
            return Err(FlowError::InvalidCode);
        }

        let response = self.api.verify_otp(&email, otp).await?;
        if !response.success {
            if response.reason.as_deref() == Some(EXPIRED_REASON) {
                warn!("OTP expired, back to email step");
                self.state = FlowState::Unverified;
            }
            return Err(rejected(response, "Invalid OTP"));
        }

        let user = match self.directory.find_by_email(&email).await? {
            Some(user) => user,
            None => {
                info!("Creating user on first login");
                self.directory
                    .create(&NewUser {
                        email: email.clone(),
                        phone: self.form.phone.trim().to_string(),
                        username: self.form.username.trim().to_string(),
                        full_name: self.form.full_name.trim().to_string(),
                    })
                    .await?
            }
        };

        let response = self.api.login(&user).await?;
        if !response.success {
            return Err(FlowError::SessionNotSet);
        }

        info!(user_id = %user.id, "Logged in");
        let token = self.api.session_token();
        self.state = FlowState::Authenticated(AuthenticatedUser { user, token });
        match &self.state {
            FlowState::Authenticated(user) => Ok(user),
            _ => Err(FlowError::SessionNotSet),
        }
    }
}

fn rejected(response: AuthResponse, fallback: &str) -> FlowError {
    FlowError::Rejected {
        message: response.display_message(fallback),
        reason: response.reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> LoginForm {
        LoginForm {
            username: "ana".to_string(),
            full_name: "Ana Lima".to_string(),
            phone: "5551234567".to_string(),
            email: "ana@example.com".to_string(),
        }
    }

    #[test]
    fn test_form_requires_every_field() {
        assert!(form().validate().is_ok());

        let missing_phone = LoginForm {
            phone: " ".to_string(),
            ..form()
        };
        assert!(matches!(
            missing_phone.validate(),
            Err(FlowError::MissingField("Phone"))
        ));
    }

    #[test]
    fn test_form_rejects_bad_email() {
        let bad = LoginForm {
            email: "ana@example".to_string(),
            ..form()
        };
        assert!(matches!(bad.validate(), Err(FlowError::InvalidEmail)));
    }

    #[test]
    fn test_rejected_prefers_server_message() {
        let err = rejected(
            AuthResponse {
                success: false,
                message: Some("Invalid OTP. Please try again.".to_string()),
                reason: Some("mismatch".to_string()),
                error: None,
            },
            "Invalid OTP",
        );
        assert_eq!(err.to_string(), "Invalid OTP. Please try again.");

        let err = rejected(AuthResponse::default(), "Failed to send OTP");
        assert_eq!(err.to_string(), "Failed to send OTP");
    }
}

// SMTP notification transport used for one-time passcode emails.

pub mod models;

use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};
use thiserror::Error;
use tracing::{debug, error};

pub use crate::models::OutgoingEmail;

#[derive(Debug, Error)]
pub enum MailerError {
    #[error("invalid email address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("failed to build email: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}

#[derive(Debug, Clone)]
pub struct MailerOptions {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    /// Display name used in the From header
    pub from_name: String,
    /// Upgrade the connection with STARTTLS. Disable only for local relays.
    pub starttls: bool,
}

#[derive(Clone)]
pub struct MailerService {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl MailerService {
    pub fn new(options: MailerOptions) -> Result<Self, MailerError> {
        let credentials = Credentials::new(options.username.clone(), options.password.clone());

        let builder = if options.starttls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&options.host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&options.host)
        };

        let transport = builder
            .port(options.port)
            .credentials(credentials)
            .build();

        let from = Mailbox::new(Some(options.from_name), options.username.parse()?);

        Ok(Self { transport, from })
    }

    pub fn from_mailbox(&self) -> &Mailbox {
        &self.from
    }

    pub async fn send(&self, email: OutgoingEmail) -> Result<(), MailerError> {
        let message = email.into_message(self.from.clone())?;

        match self.transport.send(message).await {
            Ok(response) => {
                debug!(code = %response.code(), "SMTP relay accepted message");
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "SMTP relay rejected message");
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> MailerOptions {
        MailerOptions {
            host: "localhost".to_string(),
            port: 2525,
            username: "noreply@example.com".to_string(),
            password: "secret".to_string(),
            from_name: "Chatdesk".to_string(),
            starttls: false,
        }
    }

    #[tokio::test]
    async fn test_sender_mailbox_uses_display_name() {
        let service = MailerService::new(options()).unwrap();
        let from = service.from_mailbox();

        assert_eq!(from.name.as_deref(), Some("Chatdesk"));
        assert_eq!(from.email.to_string(), "noreply@example.com");
    }

    #[tokio::test]
    async fn test_rejects_invalid_sender() {
        let mut options = options();
        options.username = "nope".to_string();

        assert!(matches!(
            MailerService::new(options),
            Err(MailerError::Address(_))
        ));
    }
}

use lettre::message::{header::ContentType, Mailbox};
use lettre::Message;

use crate::MailerError;

/// A rendered HTML email ready to hand to the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
}

impl OutgoingEmail {
    pub fn new(to: impl Into<String>, subject: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            html: html.into(),
        }
    }

    /// Build the lettre message with the given sender mailbox.
    pub fn into_message(self, from: Mailbox) -> Result<Message, MailerError> {
        let to: Mailbox = self.to.parse()?;

        Message::builder()
            .from(from)
            .to(to)
            .subject(self.subject)
            .header(ContentType::TEXT_HTML)
            .body(self.html)
            .map_err(Into::into)
    }
}

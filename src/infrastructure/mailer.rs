use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

use crate::config::EmailSettings;
use crate::domain::errors::NotifyError;
use crate::domain::ports::Mailer;

/// Plain-text mail over an authenticated STARTTLS relay.
pub struct SmtpMailer {
    transport: SmtpTransport,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(settings: &EmailSettings) -> Result<Self, NotifyError> {
        let from = Mailbox::new(
            Some(settings.from_name.clone()),
            settings
                .from_email
                .parse()
                .map_err(|e| NotifyError::Address(format!("{}: {e}", settings.from_email)))?,
        );
        let transport = SmtpTransport::starttls_relay(&settings.smtp_host)
            .map_err(|e| NotifyError::Transport(e.to_string()))?
            .port(settings.smtp_port)
            .credentials(Credentials::new(
                settings.smtp_user.clone(),
                settings.smtp_password.clone(),
            ))
            .build();
        Ok(Self { transport, from })
    }
}

impl Mailer for SmtpMailer {
    fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), NotifyError> {
        let to: Mailbox = to
            .parse()
            .map_err(|e| NotifyError::Address(format!("{to}: {e}")))?;
        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| NotifyError::Message(e.to_string()))?;

        self.transport
            .send(&message)
            .map_err(|e| NotifyError::Transport(e.to_string()))?;
        Ok(())
    }
}

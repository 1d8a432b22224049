//! Mailer trait and SMTP implementation.

use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use super::{Email, EmailBody, MailError};
use crate::config::SmtpTestConfig;

/// Outcome of a successful submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendReport {
    /// Message-ID the submission carried.
    pub message_id: String,
    /// Raw relay response (code plus text), when the transport exposes one.
    pub response: Option<String>,
}

/// Narrow transport contract: verify reachability, submit one message.
///
/// Implement this trait to provide alternative backends or deterministic
/// test stubs.
#[async_trait]
pub trait Mailer: Send + Sync + 'static {
    /// Open a handshake to the relay to confirm reachability and auth.
    async fn verify(&self) -> Result<(), MailError>;

    /// Submit one message.
    async fn send(&self, email: &Email) -> Result<SendReport, MailError>;
}

/// SMTP-based mailer using lettre.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    host: String,
}

impl SmtpMailer {
    /// Create a mailer from explicit configuration.
    ///
    /// `secure` selects implicit TLS (`relay`); otherwise STARTTLS is
    /// attempted per port convention (`starttls_relay`). Timeouts are left
    /// at the transport library's defaults.
    pub fn from_config(config: &SmtpTestConfig) -> Result<Self, MailError> {
        let builder = if config.secure {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
                .map_err(|e| MailError::Smtp(e.to_string()))?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
                .map_err(|e| MailError::Smtp(e.to_string()))?
        };

        let transport = builder
            .port(config.port)
            .credentials(Credentials::new(config.user.clone(), config.pass.clone()))
            .build();

        Ok(Self {
            transport,
            host: config.host.clone(),
        })
    }

    /// Build a lettre Message from our Email type, returning the
    /// Message-ID it was given.
    fn build_message(&self, email: &Email) -> Result<(Message, String), MailError> {
        let from: Mailbox = email
            .from
            .parse()
            .map_err(|_| MailError::InvalidAddress(email.from.clone()))?;
        let to: Mailbox = email
            .to
            .parse()
            .map_err(|_| MailError::InvalidAddress(email.to.clone()))?;

        let message_id = self.generate_message_id();

        let builder = Message::builder()
            .from(from)
            .to(to)
            .subject(email.subject.clone())
            .message_id(Some(message_id.clone()));

        let message = match &email.body {
            EmailBody::Text(text) => builder.body(text.clone()),
            EmailBody::Html(html) => builder.singlepart(SinglePart::html(html.clone())),
            EmailBody::Multipart { text, html } => {
                builder.multipart(MultiPart::alternative_plain_html(text.clone(), html.clone()))
            }
        }
        .map_err(|e| MailError::Build(e.to_string()))?;

        Ok((message, message_id))
    }

    fn generate_message_id(&self) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_nanos())
            .unwrap_or_default();

        format!("<{}.{}@{}>", std::process::id(), nanos, self.host)
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn verify(&self) -> Result<(), MailError> {
        match self.transport.test_connection().await {
            Ok(true) => Ok(()),
            Ok(false) => Err(MailError::Smtp(
                "relay closed the connection during the handshake check".into(),
            )),
            Err(e) => Err(MailError::Smtp(e.to_string())),
        }
    }

    async fn send(&self, email: &Email) -> Result<SendReport, MailError> {
        let (message, message_id) = self.build_message(email)?;

        let response = self
            .transport
            .send(message)
            .await
            .map_err(|e| MailError::Smtp(e.to_string()))?;

        let raw = format!(
            "{} {}",
            response.code(),
            response.message().collect::<Vec<_>>().join(" ")
        );

        Ok(SendReport {
            message_id,
            response: Some(raw),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mailer() -> SmtpMailer {
        let config = SmtpTestConfig {
            host: "smtp.example.com".into(),
            port: 587,
            secure: false,
            user: "user".into(),
            pass: "pass".into(),
            from: "sender@example.com".into(),
            to: "recipient@example.com".into(),
        };
        SmtpMailer::from_config(&config).unwrap()
    }

    #[test]
    fn build_message_sets_message_id_and_parts() {
        let email = Email {
            from: "sender@example.com".into(),
            to: "recipient@example.com".into(),
            subject: "Hello".into(),
            body: EmailBody::Multipart {
                text: "Plain".into(),
                html: "<p>Rich</p>".into(),
            },
        };

        let (message, message_id) = mailer().build_message(&email).unwrap();
        let formatted = String::from_utf8(message.formatted()).unwrap();

        assert!(message_id.ends_with("@smtp.example.com>"));
        assert!(formatted.contains(&message_id));
        assert!(formatted.contains("Subject: Hello"));
        assert!(formatted.contains("Plain"));
        assert!(formatted.contains("<p>Rich</p>"));
    }

    #[test]
    fn build_message_rejects_invalid_address() {
        let email = Email {
            from: "not an address".into(),
            to: "recipient@example.com".into(),
            subject: "Hello".into(),
            body: EmailBody::Text("Body".into()),
        };

        let err = mailer().build_message(&email).unwrap_err();
        assert!(matches!(err, MailError::InvalidAddress(addr) if addr == "not an address"));
    }
}

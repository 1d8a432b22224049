//! Single-shot test run: verify the relay, then send one fixed message.

use thiserror::Error;

use crate::config::SmtpTestConfig;
use crate::mail::{Email, EmailBody, Mailer, SendReport};

const TEST_SUBJECT: &str = "SMTP Configuration Test - AWS SES";

const TEST_TEXT: &str =
    "This is a test email sent via SMTP using the configuration from your environment.";

/// Which phase of the test run failed.
#[derive(Debug, Error)]
pub enum TestError {
    #[error("failed to verify SMTP connection: {0}")]
    Verify(String),

    #[error("failed to send test email: {0}")]
    Send(String),
}

impl TestError {
    /// Static remediation text for the failed phase.
    pub fn hint(&self) -> &'static str {
        match self {
            TestError::Verify(_) => {
                "Common causes:\n\
                 - Incorrect SMTP host / port / secure settings.\n\
                 - Wrong SMTP username or password.\n\
                 - SES credentials created in a different region than the configured relay.\n\
                 - Network/firewall blocking outbound traffic on the SMTP port."
            }
            TestError::Send(_) => {
                "Common causes:\n\
                 - Sender email is not verified in SES.\n\
                 - Recipient email is not verified while SES is still in sandbox mode.\n\
                 - SES sending is not yet approved for production.\n\
                 - SES sending limits or bounces / complaints issues."
            }
        }
    }
}

/// The fixed-content test message for a given configuration.
///
/// Static subject and plain-text body; the HTML part interpolates the
/// non-secret connection settings so the received email doubles as a
/// record of what was tested.
pub fn test_message(config: &SmtpTestConfig) -> Email {
    let html = format!(
        "<h2>✅ SMTP Test Successful!</h2>\n\
         <p>This email was sent using your SMTP configuration:</p>\n\
         <ul>\n\
         <li><strong>Server:</strong> {host}:{port}</li>\n\
         <li><strong>Secure (TLS):</strong> {secure}</li>\n\
         <li><strong>From:</strong> {from}</li>\n\
         <li><strong>To:</strong> {to}</li>\n\
         </ul>\n\
         <p>If you received this email, your SMTP credentials are working correctly.</p>\n\
         <hr>\n\
         <p><small>Sent by smtp-probe</small></p>",
        host = config.host,
        port = config.port,
        secure = config.secure,
        from = config.from,
        to = config.to,
    );

    Email {
        from: config.from.clone(),
        to: config.to.clone(),
        subject: TEST_SUBJECT.into(),
        body: EmailBody::Multipart {
            text: TEST_TEXT.into(),
            html,
        },
    }
}

/// Verify the relay, then submit one test message. No retries.
///
/// Send is never attempted when verification fails.
pub async fn run_test<M: Mailer>(
    config: &SmtpTestConfig,
    mailer: &M,
) -> Result<SendReport, TestError> {
    log::info!("🔍 Verifying SMTP connection...");
    mailer
        .verify()
        .await
        .map_err(|e| TestError::Verify(e.to_string()))?;
    log::info!("✅ SMTP connection verified successfully!");

    log::info!("✉️  Sending test email...");
    let report = mailer
        .send(&test_message(config))
        .await
        .map_err(|e| TestError::Send(e.to_string()))?;
    log::info!("✅ Email sent successfully!");

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SmtpTestConfig {
        SmtpTestConfig {
            host: "email-smtp.us-east-1.amazonaws.com".into(),
            port: 587,
            secure: false,
            user: "user".into(),
            pass: "pass".into(),
            from: "noreply@example.com".into(),
            to: "ops@example.com".into(),
        }
    }

    #[test]
    fn test_message_interpolates_settings() {
        let email = test_message(&config());

        assert_eq!(email.from, "noreply@example.com");
        assert_eq!(email.to, "ops@example.com");
        assert_eq!(email.subject, TEST_SUBJECT);

        let EmailBody::Multipart { text, html } = email.body else {
            panic!("expected multipart body");
        };
        assert_eq!(text, TEST_TEXT);
        assert!(html.contains("email-smtp.us-east-1.amazonaws.com:587"));
        assert!(html.contains("<strong>Secure (TLS):</strong> false"));
        assert!(html.contains("noreply@example.com"));
        assert!(html.contains("ops@example.com"));
    }

    #[test]
    fn test_message_never_embeds_credentials() {
        let email = test_message(&config());

        let EmailBody::Multipart { text, html } = email.body else {
            panic!("expected multipart body");
        };
        assert!(!text.contains("pass"));
        assert!(!html.contains("pass"));
    }
}

//! Environment-based configuration with aggregate validation.

use std::fmt;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{}", missing_message(.0))]
    Missing(Vec<&'static str>),

    #[error("SMTP_PORT must be a positive number between 1 and 65535. Received: {0}")]
    InvalidPort(String),
}

fn missing_message(vars: &[&'static str]) -> String {
    format!(
        "Missing required environment variables: {}.\n\
         Create a .env file in the project root with values like:\n  \
         SMTP_HOST=email-smtp.us-east-1.amazonaws.com\n  \
         SMTP_PORT=587\n  \
         SMTP_SECURE=false\n  \
         SMTP_USER=<SMTP username from SES>\n  \
         SMTP_PASS=<SMTP password from SES>\n  \
         EMAIL_FROM=noreply@example.com\n  \
         TEST_RECIPIENT=your-test-email@example.com",
        vars.join(", ")
    )
}

/// Normalized relay settings for a single test run.
///
/// Immutable after construction. The password is a secret: the `Debug`
/// impl redacts it and it must never reach any log line.
#[derive(Clone, PartialEq, Eq)]
pub struct SmtpTestConfig {
    /// Relay hostname.
    pub host: String,
    /// Relay port.
    pub port: u16,
    /// Implicit TLS when true, otherwise STARTTLS per port convention.
    pub secure: bool,
    /// Relay auth username.
    pub user: String,
    /// Relay auth password (secret).
    pub pass: String,
    /// Sender address.
    pub from: String,
    /// Recipient address.
    pub to: String,
}

impl fmt::Debug for SmtpTestConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpTestConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("secure", &self.secure)
            .field("user", &self.user)
            .field("pass", &"<redacted>")
            .field("from", &self.from)
            .field("to", &self.to)
            .finish()
    }
}

impl SmtpTestConfig {
    /// Load configuration from the process environment.
    ///
    /// Honors a `.env` file in the working directory. Reads `SMTP_HOST`,
    /// `SMTP_PORT`, `SMTP_SECURE` (optional), `SMTP_USER`, `SMTP_PASS`,
    /// `EMAIL_FROM`, `TEST_RECIPIENT`.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Self::load(|key| std::env::var(key).ok())
    }

    /// Load configuration from an injected key-value lookup.
    ///
    /// Every missing or empty required variable is collected into a single
    /// [`ConfigError::Missing`] so the operator can fix all problems in one
    /// pass. `SMTP_SECURE` is optional and true only when its value equals
    /// "true" case-insensitively; any other value (including "1" and "yes")
    /// means false. That strictness is deliberate.
    pub fn load<E>(env: E) -> Result<Self, ConfigError>
    where
        E: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| env(key).filter(|value| !value.is_empty());

        let mut missing = Vec::new();
        let mut require = |key: &'static str| {
            let value = get(key);
            if value.is_none() {
                missing.push(key);
            }
            value
        };

        let host = require("SMTP_HOST");
        let raw_port = require("SMTP_PORT");
        let user = require("SMTP_USER");
        let pass = require("SMTP_PASS");
        let from = require("EMAIL_FROM");
        let to = require("TEST_RECIPIENT");

        let (host, raw_port, user, pass, from, to) = match (host, raw_port, user, pass, from, to)
        {
            (Some(host), Some(raw_port), Some(user), Some(pass), Some(from), Some(to)) => {
                (host, raw_port, user, pass, from, to)
            }
            _ => return Err(ConfigError::Missing(missing)),
        };

        let port = raw_port
            .parse::<u16>()
            .ok()
            .filter(|port| *port > 0)
            .ok_or(ConfigError::InvalidPort(raw_port))?;

        let secure = env("SMTP_SECURE")
            .map(|value| value.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        Ok(Self {
            host,
            port,
            secure,
            user,
            pass,
            from,
            to,
        })
    }
}

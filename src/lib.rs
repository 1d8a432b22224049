//! Diagnose outbound SMTP configuration before wiring mail into an app.
//!
//! `smtp-probe` loads relay settings from the environment, verifies the
//! connection to the relay (AWS SES in the typical setup), and sends one
//! fixed-content test email. The binary maps the outcome to an exit code;
//! the library pieces stay usable and testable on their own:
//!
//! ```ignore
//! let config = SmtpTestConfig::from_env()?;
//! let mailer = SmtpMailer::from_config(&config)?;
//! let report = run_test(&config, &mailer).await?;
//! println!("sent {}", report.message_id);
//! ```

pub mod config;
pub mod mail;
pub mod runner;

pub use config::{ConfigError, SmtpTestConfig};
pub use mail::{Mailer, SendReport, SmtpMailer};
pub use runner::{run_test, TestError};

//! SMTP transport behind a narrow verify/send contract.
//!
//! This module is a thin abstraction over [lettre](https://lettre.rs): the
//! [`Mailer`] trait exposes exactly the two operations the test runner
//! needs, so tests can substitute deterministic stubs instead of touching
//! the network.

mod mailer;
mod message;

pub use mailer::{Mailer, SendReport, SmtpMailer};
pub use message::{Email, EmailBody};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("invalid email address: {0}")]
    InvalidAddress(String),

    #[error("failed to build message: {0}")]
    Build(String),

    #[error("SMTP error: {0}")]
    Smtp(String),
}

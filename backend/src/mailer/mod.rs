//! Email transport abstraction.
//!
//! One [`Mailer`] trait, three implementations selected at startup by
//! `MAIL_PROVIDER`:
//!
//! - [`SendGridMailer`] - SendGrid HTTP API (default)
//! - [`SmtpMailer`] - plain SMTP relay
//! - [`NoopMailer`] - logs and succeeds; dry runs and tests
//!
//! The core never knows which provider it talks to; it hands over an
//! [`EmailMessage`] and gets success or a [`MailError`] back. Retry and
//! backoff are deliberately absent.

mod noop;
mod sendgrid;
mod smtp;

use std::sync::Arc;

use async_trait::async_trait;
pub use noop::NoopMailer;
pub use sendgrid::SendGridMailer;
pub use smtp::SmtpMailer;

use crate::config::{AppConfig, MailProvider};
use crate::error::{ConfigError, ConfigResult, MailResult};
use crate::models::EmailMessage;

/// One-shot email delivery.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver one message, blocking the caller until the provider
    /// accepts or rejects it.
    async fn send(&self, message: &EmailMessage) -> MailResult<()>;
}

impl std::fmt::Debug for dyn Mailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Mailer")
    }
}

/// Build the transport selected by the configuration.
///
/// The config is already validated at this point, so missing credentials
/// surface as [`ConfigError`] rather than a later send failure.
pub fn from_config(config: &AppConfig) -> ConfigResult<Arc<dyn Mailer>> {
    match config.provider {
        MailProvider::SendGrid => {
            let api_key = config
                .sendgrid_api_key
                .clone()
                .ok_or_else(|| ConfigError::MissingVar("SENDGRID_API_KEY".into()))?;
            Ok(Arc::new(SendGridMailer::new(
                api_key,
                config.from_email.clone(),
            )))
        }
        MailProvider::Smtp => {
            let host = config
                .smtp_host
                .clone()
                .ok_or_else(|| ConfigError::MissingVar("SMTP_HOST".into()))?;
            Ok(Arc::new(SmtpMailer::new(
                &host,
                config.smtp_port,
                config.from_email.clone(),
            )))
        }
        MailProvider::Noop => Ok(Arc::new(NoopMailer)),
    }
}

//! Process-wide configuration, built from the environment at startup.
//!
//! Everything the components need (transport credentials, data file
//! locations, provider selection) lives in one explicitly constructed
//! [`AppConfig`] that is validated before any command runs. Nothing reads
//! the environment after startup.
//!
//! ## Variables
//!
//! | Variable           | Required                 | Default                  |
//! |--------------------|--------------------------|--------------------------|
//! | `MAIL_PROVIDER`    | no                       | `sendgrid`               |
//! | `FROM_EMAIL`       | sendgrid / smtp          | -                        |
//! | `SENDGRID_API_KEY` | sendgrid                 | -                        |
//! | `SMTP_HOST`        | smtp                     | -                        |
//! | `SMTP_PORT`        | no                       | `25`                     |
//! | `DATA_DIR`         | no                       | `./data`                 |
//! | `VENDOR_FILE`      | no                       | `vendor_master.csv`      |
//! | `INVOICE_FILE`     | no                       | `invoice_validated.csv`  |

use std::env;
use std::path::PathBuf;

use crate::error::{ConfigError, ConfigResult};

// =============================================================================
// Mail Provider Selection
// =============================================================================

/// Which transport implementation to construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailProvider {
    /// SendGrid HTTP API.
    SendGrid,
    /// Plain SMTP relay.
    Smtp,
    /// Log-only transport, sends nothing.
    Noop,
}

impl MailProvider {
    /// Parse a provider name (case-insensitive).
    pub fn from_name(name: &str) -> ConfigResult<Self> {
        match name.trim().to_lowercase().as_str() {
            "sendgrid" => Ok(Self::SendGrid),
            "smtp" => Ok(Self::Smtp),
            "noop" => Ok(Self::Noop),
            other => Err(ConfigError::UnknownProvider(other.to_string())),
        }
    }
}

// =============================================================================
// Application Configuration
// =============================================================================

/// Validated process configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Selected mail transport.
    pub provider: MailProvider,

    /// Sender address for all outgoing mail.
    pub from_email: String,

    /// SendGrid API key (required when `provider == SendGrid`).
    pub sendgrid_api_key: Option<String>,

    /// SMTP relay host (required when `provider == Smtp`).
    pub smtp_host: Option<String>,

    /// SMTP relay port.
    pub smtp_port: u16,

    /// Base directory holding the vendor and invoice tables.
    pub data_dir: PathBuf,

    /// Vendor table file name, relative to `data_dir`.
    pub vendor_file: String,

    /// Invoice table file name, relative to `data_dir`.
    pub invoice_file: String,
}

impl AppConfig {
    /// Build and validate the configuration from the environment.
    ///
    /// Call once at startup, after `dotenvy::dotenv()`. A missing
    /// credential for the selected provider is a fatal fault here, not a
    /// per-send fault later.
    pub fn from_env() -> ConfigResult<Self> {
        let provider = match env::var("MAIL_PROVIDER") {
            Ok(name) => MailProvider::from_name(&name)?,
            Err(_) => MailProvider::SendGrid,
        };

        let smtp_port = match env::var("SMTP_PORT") {
            Ok(raw) => raw.parse::<u16>().map_err(|e| ConfigError::InvalidVar {
                name: "SMTP_PORT".into(),
                message: e.to_string(),
            })?,
            Err(_) => 25,
        };

        let config = Self {
            provider,
            from_email: env::var("FROM_EMAIL").unwrap_or_default(),
            sendgrid_api_key: env::var("SENDGRID_API_KEY").ok(),
            smtp_host: env::var("SMTP_HOST").ok(),
            smtp_port,
            data_dir: env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./data")),
            vendor_file: env::var("VENDOR_FILE")
                .unwrap_or_else(|_| "vendor_master.csv".to_string()),
            invoice_file: env::var("INVOICE_FILE")
                .unwrap_or_else(|_| "invoice_validated.csv".to_string()),
        };

        config.validate()?;
        Ok(config)
    }

    /// Check that the selected provider has everything it needs.
    pub fn validate(&self) -> ConfigResult<()> {
        match self.provider {
            MailProvider::SendGrid => {
                if self
                    .sendgrid_api_key
                    .as_deref()
                    .unwrap_or("")
                    .trim()
                    .is_empty()
                {
                    return Err(ConfigError::MissingVar("SENDGRID_API_KEY".into()));
                }
                self.require_from_email()
            }
            MailProvider::Smtp => {
                if self.smtp_host.as_deref().unwrap_or("").trim().is_empty() {
                    return Err(ConfigError::MissingVar("SMTP_HOST".into()));
                }
                self.require_from_email()
            }
            // The noop transport sends nothing, so no credentials needed.
            MailProvider::Noop => Ok(()),
        }
    }

    fn require_from_email(&self) -> ConfigResult<()> {
        if self.from_email.trim().is_empty() {
            return Err(ConfigError::MissingVar("FROM_EMAIL".into()));
        }
        Ok(())
    }
}

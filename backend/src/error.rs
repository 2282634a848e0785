//! Error types for the invoice verification mailer.
//!
//! This module defines a hierarchy of error types:
//!
//! - [`ConfigError`] - startup configuration faults (fatal)
//! - [`SourceError`] - data source read/decode/parse faults
//! - [`MailError`] - email transport faults
//! - [`InvoiceError`] - per-invoice processing faults
//! - [`BatchError`] - whole-batch faults
//! - [`ServerError`] - HTTP surface faults
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use thiserror::Error;

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors while building [`crate::config::AppConfig`] at process start.
///
/// These are fatal: the process refuses to serve requests without a
/// validated configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is not set.
    #[error("Missing environment variable: {0}")]
    MissingVar(String),

    /// A variable is set but its value is unusable.
    #[error("Invalid value for {name}: {message}")]
    InvalidVar { name: String, message: String },

    /// MAIL_PROVIDER names a provider this build does not know.
    #[error("Unknown mail provider: {0} (expected sendgrid, smtp or noop)")]
    UnknownProvider(String),
}

// =============================================================================
// Data Source Errors
// =============================================================================

/// Errors while reading the vendor/invoice tables.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Failed to read a file.
    #[error("Failed to read {file}: {source}")]
    Io {
        file: String,
        #[source]
        source: std::io::Error,
    },

    /// Table has no header row.
    #[error("No headers found in {0}")]
    NoHeaders(String),

    /// Table file is empty.
    #[error("Table file is empty: {0}")]
    EmptyFile(String),
}

// =============================================================================
// Mail Transport Errors
// =============================================================================

/// Errors from the email transport.
#[derive(Debug, Error)]
pub enum MailError {
    /// Could not assemble the outgoing message (bad address, etc.).
    #[error("Failed to build message: {0}")]
    BuildFailed(String),

    /// Request to the provider failed before a response was received.
    #[error("Send failed: {0}")]
    SendFailed(String),

    /// Provider answered with a non-success status.
    #[error("Provider rejected message (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },
}

// =============================================================================
// Per-Invoice Errors
// =============================================================================

/// Faults scoped to a single invoice.
///
/// These are caught inside the batch loop and recorded in that invoice's
/// result entry; they never abort the rest of the batch.
#[derive(Debug, Error)]
pub enum InvoiceError {
    /// No vendor row matches the invoice's vendor identifier.
    #[error("No vendor found for Vendor_ID '{0}'")]
    VendorNotFound(String),

    /// A field the decision engine needs is absent from the record.
    #[error("Missing field: {0}")]
    MissingField(String),

    /// The transport reported a delivery failure for this invoice.
    #[error("Mail error: {0}")]
    Mail(#[from] MailError),
}

// =============================================================================
// Batch Errors (top-level)
// =============================================================================

/// Faults that abort a whole batch run.
///
/// Anything that happens before the per-invoice loop starts, currently
/// only a failed data source read.
#[derive(Debug, Error)]
pub enum BatchError {
    /// The data source snapshot could not be produced.
    #[error("Data source error: {0}")]
    Source(#[from] SourceError),
}

// =============================================================================
// Server Errors
// =============================================================================

/// HTTP server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Batch run aborted.
    #[error("Batch error: {0}")]
    Batch(#[from] BatchError),

    /// Test send failed.
    #[error("Mail error: {0}")]
    Mail(#[from] MailError),

    /// Invalid request.
    #[error("Invalid request: {0}")]
    BadRequest(String),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for data source operations.
pub type SourceResult<T> = Result<T, SourceError>;

/// Result type for mail transport operations.
pub type MailResult<T> = Result<T, MailError>;

/// Result type for batch operations.
pub type BatchResult<T> = Result<T, BatchError>;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        // SourceError -> BatchError
        let source_err = SourceError::EmptyFile("invoices.csv".into());
        let batch_err: BatchError = source_err.into();
        assert!(batch_err.to_string().contains("invoices.csv"));

        // MailError -> InvoiceError
        let mail_err = MailError::SendFailed("connection refused".into());
        let invoice_err: InvoiceError = mail_err.into();
        assert!(invoice_err.to_string().contains("connection refused"));
    }

    #[test]
    fn test_rejected_error_format() {
        let err = MailError::Rejected {
            status: 401,
            message: "bad api key".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("401"));
        assert!(msg.contains("bad api key"));
    }

    #[test]
    fn test_vendor_not_found_names_the_id() {
        let err = InvoiceError::VendorNotFound("V42".into());
        assert!(err.to_string().contains("V42"));
    }
}

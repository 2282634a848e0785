//! # Invomail - invoice verification result mailer
//!
//! Invomail reads vendor and invoice tables from CSV exports, decides an
//! email subject/body and recipient routing from each invoice's pass/fail
//! verification status, and dispatches one email per invoice through a
//! configurable transactional-email transport.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  CSV Tables │────▶│   Source    │────▶│  Processor  │────▶│   Mailer    │
//! │ (vendors +  │     │ (auto-enc)  │     │ (join +     │     │ (sendgrid / │
//! │  invoices)  │     │             │     │  decide)    │     │  smtp/noop) │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use invomail::{process_invoices, CsvDataSource, NoopMailer};
//!
//! #[tokio::main]
//! async fn main() {
//!     let source = CsvDataSource::new("./data", "vendor_master.csv", "invoice_validated.csv");
//!     let report = process_invoices(&source, &NoopMailer).await.unwrap();
//!     println!("Sent {} of {}", report.succeeded, report.total_processed);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`config`] - Startup configuration from the environment
//! - [`models`] - Domain models (Vendor, Invoice, BatchReport)
//! - [`source`] - Vendor/invoice table loading
//! - [`engine`] - Content and recipient decisions
//! - [`mailer`] - Email transport implementations
//! - [`processor`] - Batch loop and result aggregation
//! - [`api`] - HTTP API server

// Core modules
pub mod config;
pub mod error;
pub mod models;

// Data source
pub mod source;

// Decision engine
pub mod engine;

// Email transport
pub mod mailer;

// Batch processing
pub mod processor;

// HTTP API
pub mod api;

// =============================================================================
// Re-exports - Errors
// =============================================================================

pub use error::{BatchError, ConfigError, InvoiceError, MailError, ServerError, SourceError};

// =============================================================================
// Re-exports - Configuration
// =============================================================================

pub use config::{AppConfig, MailProvider};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{
    BatchReport, EmailMessage, Invoice, InvoiceOutcome, Row, Vendor, VerificationStatus,
};

// =============================================================================
// Re-exports - Source
// =============================================================================

pub use source::{CsvDataSource, DataSource, Snapshot};

// =============================================================================
// Re-exports - Engine
// =============================================================================

pub use engine::{build_email_content, decide_recipients};

// =============================================================================
// Re-exports - Mailer
// =============================================================================

pub use mailer::{Mailer, NoopMailer, SendGridMailer, SmtpMailer};

// =============================================================================
// Re-exports - Processor
// =============================================================================

pub use processor::{process_invoices, send_test_email};

// =============================================================================
// Re-exports - API
// =============================================================================

pub use api::types::{error_response, ProcessResponse, TestEmailRequest, TestEmailResponse};

// Server
pub mod server {
    pub use crate::api::server::{app, start_server, AppState};
}

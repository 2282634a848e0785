//! REST API request/response types.
//!
//! Wire field names are snake_case and mirror what integrators already
//! consume from the upstream system (`invoice_no`, `email_sent_to`,
//! `total_processed`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::models::{BatchReport, InvoiceOutcome};

/// Response for `POST /process-invoices`.
///
/// Returned with HTTP 200 even when individual invoices failed; callers
/// distinguish per-invoice failure via each entry's `success` flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessResponse {
    pub message: String,
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub results: Vec<InvoiceOutcome>,
    pub total_processed: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl From<BatchReport> for ProcessResponse {
    fn from(report: BatchReport) -> Self {
        Self {
            message: "Invoices processed and emails sent".to_string(),
            run_id: report.run_id,
            started_at: report.started_at,
            results: report.results,
            total_processed: report.total_processed,
            succeeded: report.succeeded,
            failed: report.failed,
        }
    }
}

/// Request body for `POST /test-email`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestEmailRequest {
    /// Single recipient of the test message.
    pub to: String,
}

/// Response for `POST /test-email`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestEmailResponse {
    pub message: String,
    pub to: String,
}

/// Create an error response body.
pub fn error_response(error: &str) -> Value {
    json!({
        "status": "error",
        "error": error,
    })
}

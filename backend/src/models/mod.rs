//! Domain models for the invoice verification mailer.
//!
//! This module contains the core data structures used throughout the
//! pipeline:
//!
//! - [`Vendor`] - reference data for recipient routing
//! - [`Invoice`] - one verified invoice row
//! - [`VerificationStatus`] - pass/fail outcome attached upstream
//! - [`EmailMessage`] - one outgoing email (transient)
//! - [`InvoiceOutcome`] - per-invoice processing result
//! - [`BatchReport`] - aggregate result of one batch run

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::InvoiceError;

/// One table row: column name to raw cell value.
pub type Row = HashMap<String, String>;

/// Column names as they appear in the source tables.
pub mod columns {
    pub const INVOICE_NO: &str = "Invoice_No";
    pub const VENDOR_ID: &str = "Vendor_ID";
    pub const STATUS: &str = "Status";
    pub const INVOICE_AMOUNT: &str = "Invoice_Amount";
    pub const BANK_NAME: &str = "Bank_Name";
    pub const INVOICE_DATE: &str = "Invoice_Date";
    pub const REASON_FOR_FAILURE: &str = "Reason_For_Failure";
    pub const MISMATCH_SUMMARY: &str = "Mismatch_Summary";

    pub const VENDOR_EMAIL: &str = "Vendor_Email";
    pub const VENDOR_MANAGER_EMAIL: &str = "Vendor_Manager_Email";
    pub const TREASURY_EMAIL: &str = "Treasury_Email";
}

// =============================================================================
// Verification Status
// =============================================================================

/// Verification outcome attached to each invoice by an upstream process.
///
/// The status is effectively binary: anything that is not `PASS`
/// (case-insensitive) routes to the failure branch, matching the upstream
/// producer's behavior for unknown values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VerificationStatus {
    Pass,
    Fail,
}

impl VerificationStatus {
    /// Interpret a raw status cell.
    pub fn from_raw(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("pass") {
            Self::Pass
        } else {
            Self::Fail
        }
    }

    pub fn is_pass(self) -> bool {
        self == Self::Pass
    }
}

// =============================================================================
// Vendor
// =============================================================================

/// Vendor reference data, read wholesale once per batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vendor {
    pub vendor_id: String,
    pub vendor_email: String,
    pub vendor_manager_email: String,
    pub treasury_email: String,
}

impl Vendor {
    /// Extract a vendor from a raw table row.
    ///
    /// All four columns are required; a blank cell counts as missing.
    pub fn from_row(row: &Row) -> Result<Self, InvoiceError> {
        Ok(Self {
            vendor_id: required(row, columns::VENDOR_ID)?,
            vendor_email: required(row, columns::VENDOR_EMAIL)?,
            vendor_manager_email: required(row, columns::VENDOR_MANAGER_EMAIL)?,
            treasury_email: required(row, columns::TREASURY_EMAIL)?,
        })
    }
}

// =============================================================================
// Invoice
// =============================================================================

/// One verified invoice row.
///
/// Only the identifier, vendor key and status are required up front; the
/// remaining fields are needed by one content branch or the other and are
/// checked when that branch renders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    pub invoice_no: String,
    pub vendor_id: String,
    /// Status cell exactly as it appeared in the table.
    pub status_raw: String,
    pub status: VerificationStatus,
    pub invoice_amount: Option<String>,
    pub bank_name: Option<String>,
    pub invoice_date: Option<String>,
    pub reason_for_failure: Option<String>,
    pub mismatch_summary: Option<String>,
}

impl Invoice {
    /// Extract an invoice from a raw table row.
    pub fn from_row(row: &Row) -> Result<Self, InvoiceError> {
        let status_raw = required(row, columns::STATUS)?;

        Ok(Self {
            invoice_no: required(row, columns::INVOICE_NO)?,
            vendor_id: required(row, columns::VENDOR_ID)?,
            status: VerificationStatus::from_raw(&status_raw),
            status_raw,
            invoice_amount: optional(row, columns::INVOICE_AMOUNT),
            bank_name: optional(row, columns::BANK_NAME),
            invoice_date: optional(row, columns::INVOICE_DATE),
            reason_for_failure: optional(row, columns::REASON_FOR_FAILURE),
            mismatch_summary: optional(row, columns::MISMATCH_SUMMARY),
        })
    }
}

/// Read a required cell, treating blank as missing.
fn required(row: &Row, column: &str) -> Result<String, InvoiceError> {
    match row.get(column) {
        Some(value) if !value.trim().is_empty() => Ok(value.clone()),
        _ => Err(InvoiceError::MissingField(column.to_string())),
    }
}

/// Read an optional cell, treating blank as absent.
fn optional(row: &Row, column: &str) -> Option<String> {
    row.get(column)
        .filter(|value| !value.trim().is_empty())
        .cloned()
}

// =============================================================================
// Email Message
// =============================================================================

/// One outgoing email, constructed per invoice and handed straight to the
/// transport. Never retained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailMessage {
    pub subject: String,
    pub body: String,
    /// Primary recipients.
    pub to: Vec<String>,
    /// Carbon-copy recipients.
    pub cc: Vec<String>,
}

// =============================================================================
// Processing Results
// =============================================================================

/// Result of processing one invoice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceOutcome {
    pub invoice_no: String,
    /// Status cell as read from the table (e.g. "PASS").
    pub status: String,
    /// Primary recipients the email was addressed to.
    pub email_sent_to: Vec<String>,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Aggregate result of one batch run.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    /// Per-invoice outcomes in original table order.
    pub results: Vec<InvoiceOutcome>,
    pub total_processed: usize,
    pub succeeded: usize,
    pub failed: usize,
}

//! Batch processor: join invoices to vendors, decide, dispatch, tally.
//!
//! One call to [`process_invoices`] is one batch run: a fresh snapshot of
//! both tables, a sequential pass over every invoice row, one email per
//! row, and an ordered report of what happened. Faults inside the loop
//! stay inside the loop; only a failed snapshot read aborts the run.

use chrono::Utc;
use uuid::Uuid;

use crate::engine::{build_email_content, decide_recipients};
use crate::error::{BatchResult, InvoiceError, MailResult};
use crate::mailer::Mailer;
use crate::models::{columns, BatchReport, EmailMessage, Invoice, InvoiceOutcome, Row, Vendor};
use crate::source::DataSource;

/// Run one full batch: read both tables and email every invoice's result.
///
/// Per-invoice isolation: lookup, field and transport faults are recorded
/// in that invoice's outcome and processing continues. Emails already
/// transmitted are never rolled back. The report preserves the original
/// invoice order and satisfies `total_processed = succeeded + failed`.
pub async fn process_invoices(
    source: &dyn DataSource,
    mailer: &dyn Mailer,
) -> BatchResult<BatchReport> {
    let started_at = Utc::now();
    let snapshot = source.fetch()?;

    println!(
        "🚀 Batch run: {} invoices, {} vendors",
        snapshot.invoices.len(),
        snapshot.vendors.len()
    );

    let mut results = Vec::with_capacity(snapshot.invoices.len());
    let mut succeeded = 0;
    let mut failed = 0;

    for row in &snapshot.invoices {
        let outcome = process_one(row, &snapshot.vendors, mailer).await;
        if outcome.success {
            succeeded += 1;
        } else {
            failed += 1;
            eprintln!(
                "   ❌ {}: {}",
                outcome.invoice_no,
                outcome.error.as_deref().unwrap_or("unknown error")
            );
        }
        results.push(outcome);
    }

    println!("   ✓ Done: {} sent, {} failed", succeeded, failed);

    Ok(BatchReport {
        run_id: Uuid::new_v4().to_string(),
        started_at,
        total_processed: results.len(),
        succeeded,
        failed,
        results,
    })
}

/// Process a single invoice row, capturing any fault as a failed outcome.
async fn process_one(row: &Row, vendors: &[Row], mailer: &dyn Mailer) -> InvoiceOutcome {
    // Identification fields for the result entry, best effort: the row
    // may be too broken to extract a typed invoice at all.
    let invoice_no = row.get(columns::INVOICE_NO).cloned().unwrap_or_default();
    let status = row.get(columns::STATUS).cloned().unwrap_or_default();

    match send_for_row(row, vendors, mailer).await {
        Ok(sent_to) => InvoiceOutcome {
            invoice_no,
            status,
            email_sent_to: sent_to,
            success: true,
            error: None,
        },
        Err(e) => InvoiceOutcome {
            invoice_no,
            status,
            email_sent_to: Vec::new(),
            success: false,
            error: Some(e.to_string()),
        },
    }
}

/// Lookup, render, route and send for one row. Returns the primary
/// recipients the email was addressed to.
async fn send_for_row(
    row: &Row,
    vendors: &[Row],
    mailer: &dyn Mailer,
) -> Result<Vec<String>, InvoiceError> {
    let invoice = Invoice::from_row(row)?;

    // First vendor row with a matching identifier wins.
    let vendor_row = vendors
        .iter()
        .find(|v| v.get(columns::VENDOR_ID).map(String::as_str) == Some(invoice.vendor_id.as_str()))
        .ok_or_else(|| InvoiceError::VendorNotFound(invoice.vendor_id.clone()))?;
    let vendor = Vendor::from_row(vendor_row)?;

    let (subject, body) = build_email_content(&invoice)?;
    let (to, cc) = decide_recipients(&invoice, &vendor);

    let message = EmailMessage {
        subject,
        body,
        to: to.clone(),
        cc,
    };
    mailer.send(&message).await?;

    Ok(to)
}

/// Send a fixed test message to a single recipient, no carbon copies.
pub async fn send_test_email(mailer: &dyn Mailer, to: &str) -> MailResult<()> {
    let message = EmailMessage {
        subject: "Invoice Verification Mailer – Test Email".to_string(),
        body: format!(
            "This is a test email from the invoice verification mailer.\n\n\
             Sent at: {}\n",
            Utc::now().to_rfc3339()
        ),
        to: vec![to.to_string()],
        cc: Vec::new(),
    };
    mailer.send(&message).await
}

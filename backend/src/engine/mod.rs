//! Decision engine: email content and recipient routing.
//!
//! Two pure functions decide everything about an outgoing email:
//!
//! - [`build_email_content`] renders subject and body from the invoice
//! - [`decide_recipients`] routes TO/CC from the invoice status and the
//!   matched vendor
//!
//! Neither touches any state; calling them twice with the same input
//! yields the same output.

use crate::error::InvoiceError;
use crate::models::{columns, Invoice, Vendor};

/// Render the email subject and body for one invoice.
///
/// Pass invoices address the vendor and report amount, bank and date.
/// Everything else addresses treasury and reports the failure reason and
/// mismatch summary. Field values pass through verbatim; no formatting or
/// rounding is applied.
pub fn build_email_content(invoice: &Invoice) -> Result<(String, String), InvoiceError> {
    if invoice.status.is_pass() {
        let amount = branch_field(&invoice.invoice_amount, columns::INVOICE_AMOUNT)?;
        let bank = branch_field(&invoice.bank_name, columns::BANK_NAME)?;
        let date = branch_field(&invoice.invoice_date, columns::INVOICE_DATE)?;

        let subject = format!("Invoice Verification SUCCESS – {}", invoice.invoice_no);
        let body = format!(
            "Dear Vendor,\n\n\
             Your invoice {} has been successfully verified.\n\n\
             Amount: ₹{}\n\
             Bank: {}\n\
             Date: {}\n\n\
             Regards,\n\
             Automated Verification System\n",
            invoice.invoice_no, amount, bank, date
        );
        Ok((subject, body))
    } else {
        let reason = branch_field(&invoice.reason_for_failure, columns::REASON_FOR_FAILURE)?;
        let mismatch = branch_field(&invoice.mismatch_summary, columns::MISMATCH_SUMMARY)?;

        let subject = format!("Invoice Verification FAILED – {}", invoice.invoice_no);
        let body = format!(
            "Dear Treasury,\n\n\
             Invoice {} has FAILED verification.\n\n\
             Reason:\n{}\n\n\
             Mismatch Summary:\n{}\n\n\
             Regards,\n\
             Automated Verification System\n",
            invoice.invoice_no, reason, mismatch
        );
        Ok((subject, body))
    }
}

/// Decide TO and CC recipient lists from status and vendor routing data.
///
/// Pass: the vendor is the addressee, manager and treasury are copied.
/// Fail: treasury is the addressee, manager and vendor are copied.
/// Always exactly one TO and two CC entries.
pub fn decide_recipients(invoice: &Invoice, vendor: &Vendor) -> (Vec<String>, Vec<String>) {
    if invoice.status.is_pass() {
        (
            vec![vendor.vendor_email.clone()],
            vec![
                vendor.vendor_manager_email.clone(),
                vendor.treasury_email.clone(),
            ],
        )
    } else {
        (
            vec![vendor.treasury_email.clone()],
            vec![
                vendor.vendor_manager_email.clone(),
                vendor.vendor_email.clone(),
            ],
        )
    }
}

fn branch_field<'a>(value: &'a Option<String>, column: &str) -> Result<&'a str, InvoiceError> {
    value
        .as_deref()
        .ok_or_else(|| InvoiceError::MissingField(column.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::VerificationStatus;

    fn pass_invoice() -> Invoice {
        Invoice {
            invoice_no: "INV-001".into(),
            vendor_id: "V1".into(),
            status_raw: "PASS".into(),
            status: VerificationStatus::Pass,
            invoice_amount: Some("1000".into()),
            bank_name: Some("ABC Bank".into()),
            invoice_date: Some("2024-01-01".into()),
            reason_for_failure: None,
            mismatch_summary: None,
        }
    }

    fn fail_invoice() -> Invoice {
        Invoice {
            invoice_no: "INV-002".into(),
            vendor_id: "V1".into(),
            status_raw: "FAIL".into(),
            status: VerificationStatus::Fail,
            invoice_amount: None,
            bank_name: None,
            invoice_date: None,
            reason_for_failure: Some("amount mismatch".into()),
            mismatch_summary: Some("expected 500 got 600".into()),
        }
    }

    fn vendor() -> Vendor {
        Vendor {
            vendor_id: "V1".into(),
            vendor_email: "v@x.com".into(),
            vendor_manager_email: "m@x.com".into(),
            treasury_email: "t@x.com".into(),
        }
    }

    #[test]
    fn test_pass_subject_and_body() {
        let (subject, body) = build_email_content(&pass_invoice()).unwrap();

        assert_eq!(subject, "Invoice Verification SUCCESS – INV-001");
        assert!(body.starts_with("Dear Vendor,"));
        assert!(body.contains("successfully verified"));
        assert!(body.contains("₹1000"));
        assert!(body.contains("ABC Bank"));
        assert!(body.contains("2024-01-01"));
    }

    #[test]
    fn test_fail_subject_and_body() {
        let (subject, body) = build_email_content(&fail_invoice()).unwrap();

        assert_eq!(subject, "Invoice Verification FAILED – INV-002");
        assert!(body.starts_with("Dear Treasury,"));
        assert!(body.contains("FAILED verification"));
        assert!(body.contains("amount mismatch"));
        assert!(body.contains("expected 500 got 600"));
    }

    #[test]
    fn test_pass_missing_amount_is_field_fault() {
        let mut invoice = pass_invoice();
        invoice.invoice_amount = None;
        let err = build_email_content(&invoice).unwrap_err();
        assert!(err.to_string().contains("Invoice_Amount"));
    }

    #[test]
    fn test_fail_missing_reason_is_field_fault() {
        let mut invoice = fail_invoice();
        invoice.reason_for_failure = None;
        let err = build_email_content(&invoice).unwrap_err();
        assert!(err.to_string().contains("Reason_For_Failure"));
    }

    #[test]
    fn test_pass_recipients() {
        let (to, cc) = decide_recipients(&pass_invoice(), &vendor());
        assert_eq!(to, vec!["v@x.com"]);
        assert_eq!(cc, vec!["m@x.com", "t@x.com"]);
    }

    #[test]
    fn test_fail_recipients() {
        let (to, cc) = decide_recipients(&fail_invoice(), &vendor());
        assert_eq!(to, vec!["t@x.com"]);
        assert_eq!(cc, vec!["m@x.com", "v@x.com"]);
    }

    #[test]
    fn test_unknown_status_routes_to_fail_branch() {
        let mut invoice = fail_invoice();
        invoice.status_raw = "PENDING".into();
        invoice.status = VerificationStatus::from_raw("PENDING");

        let (subject, _) = build_email_content(&invoice).unwrap();
        assert!(subject.contains("FAILED"));

        let (to, _) = decide_recipients(&invoice, &vendor());
        assert_eq!(to, vec!["t@x.com"]);
    }

    #[test]
    fn test_engine_is_idempotent() {
        let invoice = pass_invoice();
        let v = vendor();

        assert_eq!(
            build_email_content(&invoice).unwrap(),
            build_email_content(&invoice).unwrap()
        );
        assert_eq!(
            decide_recipients(&invoice, &v),
            decide_recipients(&invoice, &v)
        );
    }
}

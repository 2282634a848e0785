//! SendGrid transport: `POST /v3/mail/send` with an API key.

use async_trait::async_trait;
use serde_json::{json, Value};

use super::Mailer;
use crate::error::{MailError, MailResult};
use crate::models::EmailMessage;

const SENDGRID_URL: &str = "https://api.sendgrid.com/v3/mail/send";

/// Sends plain-text mail through the SendGrid v3 API.
pub struct SendGridMailer {
    api_key: String,
    from_email: String,
    client: reqwest::Client,
}

impl SendGridMailer {
    pub fn new(api_key: String, from_email: String) -> Self {
        Self {
            api_key,
            from_email,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Mailer for SendGridMailer {
    async fn send(&self, message: &EmailMessage) -> MailResult<()> {
        let payload = build_payload(&self.from_email, message);

        let response = self
            .client
            .post(SENDGRID_URL)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| MailError::SendFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MailError::Rejected {
                status: status.as_u16(),
                message: body,
            });
        }

        println!("   📧 Email sent → {}", message.subject);
        Ok(())
    }
}

/// Assemble the SendGrid request body.
///
/// SendGrid rejects an empty `cc` array, so the key is omitted when there
/// are no carbon-copy recipients.
fn build_payload(from_email: &str, message: &EmailMessage) -> Value {
    let to: Vec<Value> = message.to.iter().map(|addr| json!({ "email": addr })).collect();

    let mut personalization = json!({ "to": to });
    if !message.cc.is_empty() {
        let cc: Vec<Value> = message.cc.iter().map(|addr| json!({ "email": addr })).collect();
        personalization["cc"] = Value::Array(cc);
    }

    json!({
        "personalizations": [personalization],
        "from": { "email": from_email },
        "subject": message.subject,
        "content": [{ "type": "text/plain", "value": message.body }]
    })
}

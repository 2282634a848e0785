//! SMTP transport via lettre's async transport.

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox, Message},
    AsyncSmtpTransport, AsyncTransport, Tokio1Executor,
};

use super::Mailer;
use crate::error::{MailError, MailResult};
use crate::models::EmailMessage;

/// Sends plain-text mail through an SMTP relay.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from_email: String,
}

impl SmtpMailer {
    /// Connect without TLS; intended for internal relays and local
    /// capture servers like Mailpit.
    pub fn new(host: &str, port: u16, from_email: String) -> Self {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host)
            .port(port)
            .build();

        Self {
            transport,
            from_email,
        }
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, message: &EmailMessage) -> MailResult<()> {
        let mut builder = Message::builder()
            .from(parse_mailbox(&self.from_email)?)
            .subject(&message.subject)
            .header(ContentType::TEXT_PLAIN);

        for addr in &message.to {
            builder = builder.to(parse_mailbox(addr)?);
        }
        for addr in &message.cc {
            builder = builder.cc(parse_mailbox(addr)?);
        }

        let email = builder
            .body(message.body.clone())
            .map_err(|e| MailError::BuildFailed(e.to_string()))?;

        self.transport
            .send(email)
            .await
            .map_err(|e| MailError::SendFailed(e.to_string()))?;

        println!("   📧 Email sent → {}", message.subject);
        Ok(())
    }
}

fn parse_mailbox(addr: &str) -> MailResult<Mailbox> {
    addr.parse()
        .map_err(|e| MailError::BuildFailed(format!("invalid address '{}': {}", addr, e)))
}

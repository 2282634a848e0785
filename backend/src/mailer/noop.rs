//! No-op transport: logs the message and reports success.

use async_trait::async_trait;

use super::Mailer;
use crate::error::MailResult;
use crate::models::EmailMessage;

/// Accepts every message without sending anything. Used for dry runs and
/// as the default transport in tests.
pub struct NoopMailer;

#[async_trait]
impl Mailer for NoopMailer {
    async fn send(&self, message: &EmailMessage) -> MailResult<()> {
        println!(
            "   📭 [noop] would send \"{}\" to {} (cc {})",
            message.subject,
            message.to.join(", "),
            message.cc.join(", ")
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_noop_always_succeeds() {
        let message = EmailMessage {
            subject: "s".into(),
            body: "b".into(),
            to: vec!["v@x.com".into()],
            cc: vec![],
        };
        assert!(NoopMailer.send(&message).await.is_ok());
    }
}

// src/services/mailer.rs

//! Digest delivery over authenticated SMTP.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials as SmtpCredentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::error::Result;
use crate::models::{Credentials, MailConfig};

/// Delivers a rendered digest to its recipient.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn deliver(&self, subject: &str, html: String) -> Result<()>;
}

/// SMTP submission with STARTTLS.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: Mailbox,
    recipient: Mailbox,
}

impl SmtpMailer {
    /// Build the transport. No connection is opened until the first delivery.
    pub fn new(config: &MailConfig, credentials: &Credentials) -> Result<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(SmtpCredentials::new(
                credentials.sender.email.to_string(),
                credentials.password.clone(),
            ))
            .build();

        Ok(Self {
            transport,
            sender: credentials.sender.clone(),
            recipient: credentials.recipient.clone(),
        })
    }
}

#[async_trait]
impl Notifier for SmtpMailer {
    async fn deliver(&self, subject: &str, html: String) -> Result<()> {
        let message = build_message(&self.sender, &self.recipient, subject, html)?;
        let response = self.transport.send(message).await?;
        log::info!(
            "Digest delivered to {} ({})",
            self.recipient.email,
            response.code()
        );
        Ok(())
    }
}

/// Assemble an HTML mail.
pub fn build_message(
    sender: &Mailbox,
    recipient: &Mailbox,
    subject: &str,
    html: String,
) -> Result<Message> {
    let message = Message::builder()
        .from(sender.clone())
        .to(recipient.clone())
        .subject(subject)
        .header(ContentType::TEXT_HTML)
        .body(html)?;
    Ok(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_message_headers() {
        let sender: Mailbox = "watcher@example.com".parse().unwrap();
        let recipient: Mailbox = "me@example.com".parse().unwrap();

        let message = build_message(
            &sender,
            &recipient,
            "New cat alert!",
            "<h1>New Cats</h1>".to_string(),
        )
        .unwrap();

        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("From: watcher@example.com"));
        assert!(raw.contains("To: me@example.com"));
        assert!(raw.contains("Subject: New cat alert!"));
        assert!(raw.contains("Content-Type: text/html; charset=utf-8"));
        assert!(raw.contains("<h1>New Cats</h1>"));
    }
}

//! Digest delivery over SMTP.
//!
//! One message per digest, sent from the user's address to itself over an
//! implicit-TLS session. Nothing is retried.

use std::time::Duration;

use lettre::message::{Mailbox, header::ContentType};
use lettre::transport::smtp::authentication::Credentials as SmtpCredentials;
use lettre::{Message, SmtpTransport, Transport};

use crate::error::{AppError, Result};
use crate::models::{Credentials, MailConfig};

/// Anything that can deliver the list of updated URLs to the user.
pub trait Notifier {
    fn send_digest(&self, credentials: &Credentials, urls: &[String]) -> Result<()>;
}

/// Plain-text digest body: one URL per line.
pub fn compose_digest(urls: &[String]) -> String {
    let mut body = String::new();
    for url in urls {
        body.push_str(url);
        body.push('\n');
    }
    body
}

/// Notifier sending through an SMTP relay.
pub struct SmtpNotifier {
    config: MailConfig,
}

impl SmtpNotifier {
    pub fn new(config: MailConfig) -> Self {
        Self { config }
    }

    fn subject(&self, count: usize) -> String {
        format!("{}: {} new update(s)", self.config.subject, count)
    }

    /// Build the digest message addressed from and to the user.
    pub fn build_message(&self, credentials: &Credentials, urls: &[String]) -> Result<Message> {
        let mailbox = credentials
            .email
            .parse::<Mailbox>()
            .map_err(|e| AppError::AuthFailed(format!("invalid address: {e}")))?;

        Message::builder()
            .from(mailbox.clone())
            .to(mailbox)
            .subject(self.subject(urls.len()))
            .header(ContentType::TEXT_PLAIN)
            .body(compose_digest(urls))
            .map_err(|e| AppError::AuthFailed(format!("message rejected: {e}")))
    }

    fn transport(&self, credentials: &Credentials) -> Result<SmtpTransport> {
        let transport = SmtpTransport::relay(&self.config.relay_host)
            .map_err(|e| AppError::TransportFailed(e.to_string()))?
            .port(self.config.relay_port)
            .credentials(SmtpCredentials::new(
                credentials.email.clone(),
                credentials.password.clone(),
            ))
            .timeout(Some(Duration::from_secs(self.config.timeout_secs)))
            .build();
        Ok(transport)
    }
}

impl Notifier for SmtpNotifier {
    fn send_digest(&self, credentials: &Credentials, urls: &[String]) -> Result<()> {
        if credentials.email.trim().is_empty() || credentials.password.is_empty() {
            return Err(AppError::MissingCredentials);
        }
        if urls.is_empty() {
            log::debug!("Nothing to send");
            return Ok(());
        }

        let message = self.build_message(credentials, urls)?;
        let transport = self.transport(credentials)?;

        log::info!(
            "Sending digest of {} URL(s) via {}:{}",
            urls.len(),
            self.config.relay_host,
            self.config.relay_port
        );
        transport.send(&message).map_err(classify_smtp_error)?;
        log::info!("Digest sent to {}", credentials.email);
        Ok(())
    }
}

/// A server reply with an error code means the login or message was
/// refused; anything else never got a reply.
fn classify_smtp_error(e: lettre::transport::smtp::Error) -> AppError {
    if e.is_permanent() || e.is_transient() {
        AppError::AuthFailed(e.to_string())
    } else {
        AppError::TransportFailed(e.to_string())
    }
}

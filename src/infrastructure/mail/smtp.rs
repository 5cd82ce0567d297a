use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use crate::{entities::contact::Contact, repositories::notifier::ContactNotifier, settings::AppConfig};

/// Sends contact notifications to the site owner's inbox over SMTP (STARTTLS).
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl SmtpNotifier {
    pub fn new(config: &AppConfig, host: &str) -> anyhow::Result<Self> {
        let fallback = config.smtp_username.as_deref();

        let from = config
            .mail_from
            .as_deref()
            .or(fallback)
            .context("MAIL_FROM or SMTP_USERNAME must be set to send mail")?
            .parse::<Mailbox>()
            .context("invalid sender address")?;
        let to = config
            .mail_to
            .as_deref()
            .or(fallback)
            .context("MAIL_TO or SMTP_USERNAME must be set to send mail")?
            .parse::<Mailbox>()
            .context("invalid recipient address")?;

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
            .with_context(|| format!("invalid SMTP relay {host}"))?
            .port(config.smtp_port);

        if let (Some(user), Some(pass)) = (&config.smtp_username, &config.smtp_password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        Ok(SmtpNotifier { transport: builder.build(), from, to })
    }
}

#[async_trait]
impl ContactNotifier for SmtpNotifier {
    async fn notify(&self, contact: &Contact) -> anyhow::Result<()> {
        let email = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(contact_subject(contact))
            .header(ContentType::TEXT_HTML)
            .body(contact_html(contact))?;

        self.transport.send(email).await?;
        tracing::info!(contact_id = %contact.id, "Contact email sent");
        Ok(())
    }
}

/// Used when no SMTP relay is configured.
pub struct LogNotifier;

#[async_trait]
impl ContactNotifier for LogNotifier {
    async fn notify(&self, contact: &Contact) -> anyhow::Result<()> {
        tracing::info!(
            contact_id = %contact.id,
            subject = %contact.subject,
            "SMTP not configured, contact notification skipped"
        );
        Ok(())
    }
}

/// SMTP when `smtp_host` is set and usable, otherwise a notifier that only logs.
pub fn notifier_from_config(config: &AppConfig) -> Arc<dyn ContactNotifier> {
    let Some(host) = config.smtp_host.as_deref().filter(|h| !h.trim().is_empty()) else {
        return Arc::new(LogNotifier);
    };

    match SmtpNotifier::new(config, host) {
        Ok(notifier) => Arc::new(notifier),
        Err(e) => {
            tracing::error!("Contact notifications disabled: {:#}", e);
            Arc::new(LogNotifier)
        }
    }
}

pub fn contact_subject(contact: &Contact) -> String {
    format!("Portfolio Contact: {}", contact.subject)
}

/// Submitter text is HTML-escaped; message line breaks become `<br>`.
pub fn contact_html(contact: &Contact) -> String {
    let name = ammonia::clean_text(&contact.name);
    let email = ammonia::clean_text(&contact.email);
    let subject = ammonia::clean_text(&contact.subject);
    let message = contact
        .message
        .lines()
        .map(ammonia::clean_text)
        .collect::<Vec<_>>()
        .join("<br>");

    format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <h2 style="color: #333; border-bottom: 2px solid #007bff; padding-bottom: 10px;">New Contact Form Submission</h2>
  <div style="background-color: #f8f9fa; padding: 20px; border-radius: 8px; margin: 20px 0;">
    <h3 style="color: #495057; margin-top: 0;">Contact Details</h3>
    <p><strong>Name:</strong> {name}</p>
    <p><strong>Email:</strong> {email}</p>
    <p><strong>Subject:</strong> {subject}</p>
  </div>
  <div style="background-color: #ffffff; padding: 20px; border: 1px solid #dee2e6; border-radius: 8px;">
    <h3 style="color: #495057; margin-top: 0;">Message</h3>
    <p style="line-height: 1.6; color: #6c757d;">{message}</p>
  </div>
  <div style="margin-top: 20px; padding: 15px; background-color: #e9ecef; border-radius: 8px;">
    <p style="margin: 0; color: #6c757d; font-size: 14px;">This message was sent from your portfolio contact form.</p>
  </div>
</div>"#
    )
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;
    use crate::entities::contact::ContactInsert;

    fn contact(message: &str) -> Contact {
        ContactInsert {
            name: "<b>Mallory</b>".into(),
            email: "mallory@example.com".into(),
            subject: "Quote request".into(),
            message: message.into(),
        }
        .into_contact(Uuid::new_v4(), Utc::now())
    }

    #[test]
    fn subject_is_prefixed() {
        assert_eq!(contact_subject(&contact("hello world")), "Portfolio Contact: Quote request");
    }

    #[test]
    fn body_escapes_submitter_text() {
        let html = contact_html(&contact("line one\n<script>alert(1)</script>"));
        assert!(!html.contains("<b>Mallory</b>"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("line one<br>"));
    }

    #[test]
    fn missing_host_falls_back_to_logging() {
        let mut config = AppConfig::for_testing();
        config.smtp_host = Some("   ".into());
        // Only checks that construction never panics without a relay.
        let _ = notifier_from_config(&config);
    }

    #[test]
    fn smtp_requires_an_address() {
        let mut config = AppConfig::for_testing();
        config.smtp_host = Some("smtp.example.com".into());
        assert!(SmtpNotifier::new(&config, "smtp.example.com").is_err());
    }
}

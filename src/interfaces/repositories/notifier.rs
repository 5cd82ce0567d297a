use async_trait::async_trait;

use crate::entities::contact::Contact;

/// Outbound notification sent when a visitor submits the contact form.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContactNotifier: Send + Sync {
    async fn notify(&self, contact: &Contact) -> anyhow::Result<()>;
}

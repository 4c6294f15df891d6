//! Trait for email delivery integration

use async_trait::async_trait;

/// Trait for email delivery integration
#[async_trait]
pub trait MailServiceTrait: Send + Sync {
    /// Send one message to `recipients`
    ///
    /// Returns the number of recipients the transport accepted; `Ok(0)` means
    /// nothing was delivered.
    async fn send(&self, subject: &str, body: &str, recipients: &[String]) -> Result<usize, String>;
}

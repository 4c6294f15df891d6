//! Development transport that writes messages to the log

use async_trait::async_trait;

use cr_core::services::MailServiceTrait;

/// Logs every message instead of sending it
///
/// Verification codes appear in the log, so this transport must not be
/// selected outside development.
#[derive(Debug, Clone, Default)]
pub struct ConsoleMailService;

impl ConsoleMailService {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl MailServiceTrait for ConsoleMailService {
    async fn send(&self, subject: &str, body: &str, recipients: &[String]) -> Result<usize, String> {
        let recipients: Vec<&str> = recipients
            .iter()
            .map(|r| r.trim())
            .filter(|r| !r.is_empty())
            .collect();

        tracing::info!(
            transport = "console",
            subject = %subject,
            recipients = ?recipients,
            body = %body,
            "Outgoing email"
        );
        Ok(recipients.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_console_counts_non_blank_recipients() {
        let service = ConsoleMailService::new();
        let accepted = service
            .send(
                "Subject",
                "Body",
                &["a@email.ntou.edu.tw".to_string(), "  ".to_string()],
            )
            .await
            .unwrap();
        assert_eq!(accepted, 1);
    }
}

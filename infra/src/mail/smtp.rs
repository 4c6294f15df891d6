//! SMTP delivery through lettre's async transport

use async_trait::async_trait;
use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use cr_core::services::MailServiceTrait;
use cr_shared::config::MailConfig;
use cr_shared::utils::masking::mask_identity;

use crate::InfrastructureError;

/// Mail service sending plain-text messages over SMTP
///
/// A single recipient goes in `To`. Several recipients are sent as `Bcc`
/// with the sender address in `To`, so staff never see each other's address.
pub struct SmtpMailService {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailService {
    /// Build the transport from configuration
    ///
    /// With an empty username the relay is used without TLS or
    /// authentication, which suits a local catcher such as MailHog.
    pub fn new(config: &MailConfig) -> Result<Self, InfrastructureError> {
        let from: Mailbox = config
            .from_header()
            .parse()
            .map_err(|e| InfrastructureError::Config(format!("Invalid from address: {}", e)))?;

        let transport = if config.smtp_username.is_empty() {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.smtp_host)
                .port(config.smtp_port)
                .build()
        } else {
            let credentials =
                Credentials::new(config.smtp_username.clone(), config.smtp_password.clone());
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
                .map_err(|e| InfrastructureError::Mail(format!("Failed to create SMTP relay: {}", e)))?
                .port(config.smtp_port)
                .credentials(credentials)
                .build()
        };

        tracing::info!(
            host = %config.smtp_host,
            port = config.smtp_port,
            "SMTP mail service configured"
        );
        Ok(Self { transport, from })
    }

    fn build_message(
        &self,
        subject: &str,
        body: &str,
        recipients: &[Mailbox],
    ) -> Result<Message, String> {
        let mut builder = Message::builder().from(self.from.clone()).subject(subject);

        builder = match recipients {
            [single] => builder.to(single.clone()),
            many => {
                let mut builder = builder.to(self.from.clone());
                for recipient in many {
                    builder = builder.bcc(recipient.clone());
                }
                builder
            }
        };

        builder
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| format!("Failed to build email: {}", e))
    }
}

/// Parse recipient addresses, dropping the ones that are not valid mailboxes
pub(crate) fn parse_recipients(recipients: &[String]) -> Vec<Mailbox> {
    recipients
        .iter()
        .filter_map(|address| match address.trim().parse::<Mailbox>() {
            Ok(mailbox) => Some(mailbox),
            Err(e) => {
                tracing::warn!(
                    recipient = %mask_identity(address),
                    error = %e,
                    "Skipping invalid recipient address"
                );
                None
            }
        })
        .collect()
}

#[async_trait]
impl MailServiceTrait for SmtpMailService {
    async fn send(&self, subject: &str, body: &str, recipients: &[String]) -> Result<usize, String> {
        let mailboxes = parse_recipients(recipients);
        if mailboxes.is_empty() {
            return Ok(0);
        }

        let message = self.build_message(subject, body, &mailboxes)?;
        self.transport
            .send(message)
            .await
            .map_err(|e| format!("Failed to send email: {}", e))?;

        tracing::debug!(subject = %subject, recipients = mailboxes.len(), "Email sent");
        Ok(mailboxes.len())
    }
}

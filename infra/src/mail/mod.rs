//! Outgoing mail transports
//!
//! - `smtp` - lettre SMTP transport for staging and production
//! - `console` - logs messages, for local development

pub mod console;
pub mod smtp;

use std::sync::Arc;

use cr_core::services::MailServiceTrait;
use cr_shared::config::MailConfig;

pub use console::ConsoleMailService;
pub use smtp::SmtpMailService;

use crate::InfrastructureError;

/// Create the mail service selected by `config.provider`
///
/// # Arguments
/// * `config` - Mail configuration; `provider` is `smtp` or `console`
pub fn create_mail_service(config: &MailConfig) -> Result<Arc<dyn MailServiceTrait>, InfrastructureError> {
    match config.provider.to_lowercase().as_str() {
        "smtp" => Ok(Arc::new(SmtpMailService::new(config)?)),
        "console" => {
            tracing::warn!("Console mail transport selected; messages are only logged");
            Ok(Arc::new(ConsoleMailService::new()))
        }
        other => Err(InfrastructureError::Config(format!(
            "Unknown mail provider: {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_console_service() {
        assert!(create_mail_service(&MailConfig::default()).is_ok());
    }

    #[test]
    fn test_create_smtp_service() {
        let config = MailConfig {
            provider: "SMTP".to_string(),
            ..Default::default()
        };
        assert!(create_mail_service(&config).is_ok());
    }

    #[test]
    fn test_unknown_provider_is_rejected() {
        let config = MailConfig {
            provider: "carrier-pigeon".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            create_mail_service(&config),
            Err(InfrastructureError::Config(_))
        ));
    }
}

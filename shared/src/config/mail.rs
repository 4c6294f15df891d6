//! Outgoing mail configuration

use serde::{Deserialize, Serialize};

/// SMTP delivery configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MailConfig {
    /// Delivery provider ("smtp" or "console")
    pub provider: String,

    /// SMTP relay host
    pub smtp_host: String,

    /// SMTP port
    pub smtp_port: u16,

    /// SMTP username; empty disables authentication and TLS
    #[serde(default)]
    pub smtp_username: String,

    /// SMTP password
    #[serde(default)]
    pub smtp_password: String,

    /// Sender address; also used as the visible recipient of staff broadcasts
    pub from_email: String,

    /// Sender display name
    pub from_name: String,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            provider: String::from("console"),
            smtp_host: String::from("localhost"),
            smtp_port: 1025,
            smtp_username: String::new(),
            smtp_password: String::new(),
            from_email: String::from("noreply@email.ntou.edu.tw"),
            from_name: String::from("Classroom Reservation"),
        }
    }
}

impl MailConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            provider: std::env::var("MAIL_PROVIDER").unwrap_or(defaults.provider),
            smtp_host: std::env::var("SMTP_HOST").unwrap_or(defaults.smtp_host),
            smtp_port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.smtp_port),
            smtp_username: std::env::var("SMTP_USERNAME").unwrap_or_default(),
            smtp_password: std::env::var("SMTP_PASSWORD").unwrap_or_default(),
            from_email: std::env::var("MAIL_FROM_EMAIL").unwrap_or(defaults.from_email),
            from_name: std::env::var("MAIL_FROM_NAME").unwrap_or(defaults.from_name),
        }
    }

    /// Formatted `From` header value
    pub fn from_header(&self) -> String {
        format!("{} <{}>", self.from_name, self.from_email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_header() {
        let config = MailConfig::default();
        assert_eq!(
            config.from_header(),
            "Classroom Reservation <noreply@email.ntou.edu.tw>"
        );
    }
}

//! Recording mail service for tests and local development

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use super::traits::MailServiceTrait;

static CODE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{6})\b").expect("code pattern is valid"));

/// A message captured by [`MockMailService`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMail {
    pub subject: String,
    pub body: String,
    pub recipients: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Behaviour {
    Deliver,
    DeliverNone,
    Fail,
}

/// Mail service that records every message instead of sending it
#[derive(Clone)]
pub struct MockMailService {
    sent: Arc<Mutex<Vec<SentMail>>>,
    behaviour: Behaviour,
}

impl MockMailService {
    /// Accepts every message
    pub fn new() -> Self {
        Self::with_behaviour(Behaviour::Deliver)
    }

    /// Returns a transport error for every message
    pub fn failing() -> Self {
        Self::with_behaviour(Behaviour::Fail)
    }

    /// Reports zero delivered recipients for every message
    pub fn delivering_none() -> Self {
        Self::with_behaviour(Behaviour::DeliverNone)
    }

    fn with_behaviour(behaviour: Behaviour) -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            behaviour,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<SentMail>> {
        self.sent.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Every recorded message, oldest first
    pub fn sent(&self) -> Vec<SentMail> {
        self.lock().clone()
    }

    /// Messages addressed to `recipient`
    pub fn messages_to(&self, recipient: &str) -> Vec<SentMail> {
        self.lock()
            .iter()
            .filter(|m| m.recipients.iter().any(|r| r == recipient))
            .cloned()
            .collect()
    }

    /// The six digit code in the latest message sent to `recipient`
    pub fn last_code_for(&self, recipient: &str) -> Option<String> {
        self.messages_to(recipient)
            .last()
            .and_then(|m| CODE_PATTERN.captures(&m.body))
            .map(|c| c[1].to_string())
    }

    /// Wait until at least `count` messages were recorded, or give up after ~1s
    pub async fn wait_for_messages(&self, count: usize) -> Vec<SentMail> {
        for _ in 0..100 {
            let sent = self.sent();
            if sent.len() >= count {
                return sent;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        self.sent()
    }
}

impl Default for MockMailService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MailServiceTrait for MockMailService {
    async fn send(&self, subject: &str, body: &str, recipients: &[String]) -> Result<usize, String> {
        match self.behaviour {
            Behaviour::Fail => Err("Mail service error".to_string()),
            Behaviour::DeliverNone => Ok(0),
            Behaviour::Deliver => {
                self.lock().push(SentMail {
                    subject: subject.to_string(),
                    body: body.to_string(),
                    recipients: recipients.to_vec(),
                });
                Ok(recipients.len())
            }
        }
    }
}

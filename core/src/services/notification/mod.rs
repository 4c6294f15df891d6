//! Outgoing email: the delivery trait, best-effort reservation notices and a
//! recording mock.

mod mock;
mod notifier;
mod traits;

pub use mock::{MockMailService, SentMail};
pub use notifier::{is_deliverable_address, Notifier};
pub use traits::MailServiceTrait;

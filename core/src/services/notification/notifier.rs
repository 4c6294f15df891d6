//! Best-effort reservation notifications.
//!
//! Messages are dispatched on a detached task after the primary write has
//! committed. Failures are logged and never reach the caller.

use std::sync::Arc;

use crate::domain::entities::reservation::Reservation;

use super::traits::MailServiceTrait;

/// Composes and dispatches reservation notices
pub struct Notifier<M: MailServiceTrait + ?Sized> {
    mail: Arc<M>,
}

impl<M: MailServiceTrait + ?Sized> Clone for Notifier<M> {
    fn clone(&self) -> Self {
        Self {
            mail: self.mail.clone(),
        }
    }
}

impl<M: MailServiceTrait + ?Sized + 'static> Notifier<M> {
    pub fn new(mail: Arc<M>) -> Self {
        Self { mail }
    }

    /// Alert every staff member about a new pending reservation, in one message
    pub fn reservation_created(&self, reservation: &Reservation, staff_identities: Vec<String>) {
        let recipients: Vec<String> = staff_identities
            .into_iter()
            .filter(|s| is_deliverable_address(s))
            .collect();
        let (subject, body) = compose_created(reservation);
        self.dispatch("reservation_created", subject, body, recipients);
    }

    /// Tell the owner about a staff decision
    pub fn status_changed(&self, reservation: &Reservation) {
        let (subject, body) = compose_status_changed(reservation);
        self.dispatch(
            "reservation_reviewed",
            subject,
            body,
            vec![reservation.requester_identity.clone()],
        );
    }

    /// Confirm a cancellation to the owner
    pub fn reservation_cancelled(&self, reservation: &Reservation) {
        let (subject, body) = compose_cancelled(reservation);
        self.dispatch(
            "reservation_cancelled",
            subject,
            body,
            vec![reservation.requester_identity.clone()],
        );
    }

    fn dispatch(&self, kind: &'static str, subject: String, body: String, recipients: Vec<String>) {
        if recipients.is_empty() {
            tracing::debug!(notification = kind, "No recipients, notification skipped");
            return;
        }

        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                tracing::warn!(notification = kind, "No async runtime, notification dropped");
                return;
            }
        };

        let mail = self.mail.clone();
        handle.spawn(async move {
            match mail.send(&subject, &body, &recipients).await {
                Ok(0) => tracing::warn!(
                    notification = kind,
                    recipients = recipients.len(),
                    "Notification accepted by no recipient"
                ),
                Ok(delivered) => tracing::info!(
                    notification = kind,
                    delivered = delivered,
                    "Notification sent"
                ),
                Err(error) => tracing::error!(
                    notification = kind,
                    error = %error,
                    "Notification delivery failed"
                ),
            }
        });
    }
}

/// Minimal shape check for a mail recipient
pub fn is_deliverable_address(address: &str) -> bool {
    match address.trim().split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.starts_with('.'),
        None => false,
    }
}

fn compose_created(r: &Reservation) -> (String, String) {
    let subject = format!("[Classroom] New reservation request: {} {} {}", r.room_code, r.date, r.time_slot);
    let body = format!(
        "A new reservation is waiting for review.\n\nRoom: {}\nDate: {}\nTime slot: {}\nRequester: {}\nReason: {}\n",
        r.room_code, r.date, r.time_slot, r.requester_identity, r.reason
    );
    (subject, body)
}

fn compose_status_changed(r: &Reservation) -> (String, String) {
    let subject = format!("[Classroom] Reservation {}: {} {} {}", r.status, r.room_code, r.date, r.time_slot);
    let body = format!(
        "Your reservation has been {}.\n\nRoom: {}\nDate: {}\nTime slot: {}\n",
        r.status, r.room_code, r.date, r.time_slot
    );
    (subject, body)
}

fn compose_cancelled(r: &Reservation) -> (String, String) {
    let subject = format!("[Classroom] Reservation cancelled: {} {} {}", r.room_code, r.date, r.time_slot);
    let body = format!(
        "Your reservation has been cancelled.\n\nRoom: {}\nDate: {}\nTime slot: {}\n",
        r.room_code, r.date, r.time_slot
    );
    (subject, body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::reservation::ReservationStatus;
    use crate::services::notification::MockMailService;
    use chrono::{NaiveDate, Utc};
    use uuid::Uuid;

    fn reservation() -> Reservation {
        Reservation::new_pending(
            Uuid::new_v4(),
            "INS201".into(),
            Uuid::new_v4(),
            "owner@email.ntou.edu.tw".into(),
            NaiveDate::from_ymd_opt(2025, 11, 30).unwrap(),
            "10-12".into(),
            "Club meeting".into(),
            Utc::now(),
        )
    }

    #[test]
    fn test_deliverable_address() {
        assert!(is_deliverable_address("staff@email.ntou.edu.tw"));
        assert!(!is_deliverable_address("admin"));
        assert!(!is_deliverable_address("@x.org"));
        assert!(!is_deliverable_address("a@localhost"));
    }

    #[tokio::test]
    async fn test_created_notice_goes_to_staff_in_one_message() {
        let mail = Arc::new(MockMailService::new());
        let notifier = Notifier::new(mail.clone());

        notifier.reservation_created(
            &reservation(),
            vec!["s1@email.ntou.edu.tw".into(), "admin".into(), "s2@ntou.edu.tw".into()],
        );

        let sent = mail.wait_for_messages(1).await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].recipients.len(), 2);
        assert!(sent[0].body.contains("INS201"));
    }

    #[tokio::test]
    async fn test_delivery_failure_is_swallowed() {
        let mail = Arc::new(MockMailService::failing());
        let notifier = Notifier::new(mail.clone());
        let mut r = reservation();
        r.status = ReservationStatus::Approved;

        notifier.status_changed(&r);
        tokio::task::yield_now().await;
        assert!(mail.sent().is_empty());
    }
}

//! Unit tests for verification service

use chrono::{Duration, Utc};
use std::sync::Arc;

use crate::domain::entities::verification::{VerificationPurpose, VerificationRecord};
use crate::errors::{DomainError, VerificationError};
use crate::services::clock::{Clock, ManualClock};
use crate::services::notification::MockMailService;
use crate::services::verification::{
    MockVerificationStore, VerificationConfig, VerificationService, VerificationStore,
};

const IDENTITY: &str = "student01@email.ntou.edu.tw";

struct Harness {
    service: VerificationService<MockMailService, MockVerificationStore>,
    mail: Arc<MockMailService>,
    store: Arc<MockVerificationStore>,
    clock: Arc<ManualClock>,
}

fn harness_with(mail: MockMailService, config: VerificationConfig) -> Harness {
    let mail = Arc::new(mail);
    let store = Arc::new(MockVerificationStore::new());
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let service = VerificationService::new(mail.clone(), store.clone(), clock.clone(), config);
    Harness {
        service,
        mail,
        store,
        clock,
    }
}

fn harness() -> Harness {
    harness_with(MockMailService::new(), VerificationConfig::default())
}

fn verification_err(result: Result<(), DomainError>) -> VerificationError {
    match result {
        Err(DomainError::Verification(e)) => e,
        other => panic!("Expected verification error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_request_code_stores_hashed_record() {
    let h = harness();

    let issued = h
        .service
        .request_code(IDENTITY, VerificationPurpose::Register)
        .await
        .unwrap();
    assert_eq!(issued.identity, IDENTITY);
    assert_eq!(issued.expires_at, h.clock.now() + Duration::seconds(300));

    let code = h.mail.last_code_for(IDENTITY).expect("code was mailed");
    let key = h.service.cache_key(IDENTITY, VerificationPurpose::Register);
    assert_eq!(key, "email_verification:register:student01@email.ntou.edu.tw");

    let record = h.store.get(&key).await.unwrap().unwrap();
    assert_eq!(record.attempts, 0);
    assert_ne!(record.code_hash, code);
    assert!(record.matches(&code));
    assert_eq!(h.store.ttl_of(&key).await, Some(Duration::seconds(300)));
}

#[tokio::test]
async fn test_request_code_normalizes_identity() {
    let h = harness();
    h.service
        .request_code("Student01@EMAIL.ntou.edu.tw", VerificationPurpose::Register)
        .await
        .unwrap();

    assert!(h.mail.last_code_for(IDENTITY).is_some());
    let key = h.service.cache_key(IDENTITY, VerificationPurpose::Register);
    assert!(h.store.get(&key).await.unwrap().is_some());
}

#[tokio::test]
async fn test_request_code_invalid_format_stores_nothing() {
    let h = harness();
    let result = h
        .service
        .request_code("someone@gmail.com", VerificationPurpose::Register)
        .await;

    assert!(matches!(
        result,
        Err(DomainError::Verification(VerificationError::InvalidFormat { .. }))
    ));
    assert_eq!(h.store.len().await, 0);
    assert!(h.mail.sent().is_empty());
}

#[tokio::test]
async fn test_request_code_throttled_while_outstanding() {
    let h = harness();
    h.service
        .request_code(IDENTITY, VerificationPurpose::Register)
        .await
        .unwrap();

    h.clock.advance(Duration::seconds(60));
    let second = h
        .service
        .request_code(IDENTITY, VerificationPurpose::Register)
        .await;
    match second {
        Err(DomainError::Verification(VerificationError::AlreadyIssued { retry_after_seconds })) => {
            assert_eq!(retry_after_seconds, 240);
        }
        other => panic!("Expected AlreadyIssued, got {:?}", other),
    }
    assert_eq!(h.mail.sent().len(), 1);
}

#[tokio::test]
async fn test_purposes_do_not_collide() {
    let h = harness();
    h.service
        .request_code(IDENTITY, VerificationPurpose::Register)
        .await
        .unwrap();
    h.service
        .request_code(IDENTITY, VerificationPurpose::ChangePassword)
        .await
        .unwrap();
    assert_eq!(h.store.len().await, 2);
}

#[tokio::test]
async fn test_request_code_after_expiry_replaces_record() {
    let h = harness();
    h.service
        .request_code(IDENTITY, VerificationPurpose::Register)
        .await
        .unwrap();
    let first_code = h.mail.last_code_for(IDENTITY).unwrap();

    h.clock.advance(Duration::seconds(301));
    h.service
        .request_code(IDENTITY, VerificationPurpose::Register)
        .await
        .unwrap();
    let second_code = h.mail.last_code_for(IDENTITY).unwrap();

    let key = h.service.cache_key(IDENTITY, VerificationPurpose::Register);
    let record = h.store.get(&key).await.unwrap().unwrap();
    assert!(record.matches(&second_code));
    if first_code != second_code {
        assert!(!record.matches(&first_code));
    }
}

#[tokio::test]
async fn test_delivery_failure_stores_nothing() {
    let h = harness_with(MockMailService::failing(), VerificationConfig::default());
    let result = h
        .service
        .request_code(IDENTITY, VerificationPurpose::Register)
        .await;
    assert!(matches!(
        result,
        Err(DomainError::Verification(VerificationError::DeliveryFailed))
    ));
    assert_eq!(h.store.len().await, 0);
}

#[tokio::test]
async fn test_zero_recipients_is_delivery_failure() {
    let h = harness_with(MockMailService::delivering_none(), VerificationConfig::default());
    let result = h
        .service
        .request_code(IDENTITY, VerificationPurpose::ChangePassword)
        .await;
    assert!(matches!(
        result,
        Err(DomainError::Verification(VerificationError::DeliveryFailed))
    ));
    assert_eq!(h.store.len().await, 0);
}

#[tokio::test]
async fn test_verify_correct_code_succeeds_once() {
    let h = harness();
    h.service
        .request_code(IDENTITY, VerificationPurpose::Register)
        .await
        .unwrap();
    let code = h.mail.last_code_for(IDENTITY).unwrap();

    h.service
        .verify_code(IDENTITY, VerificationPurpose::Register, &code)
        .await
        .unwrap();

    let again = h
        .service
        .verify_code(IDENTITY, VerificationPurpose::Register, &code)
        .await;
    assert_eq!(verification_err(again), VerificationError::NotRequested);
}

#[tokio::test]
async fn test_verify_without_request() {
    let h = harness();
    let result = h
        .service
        .verify_code(IDENTITY, VerificationPurpose::Register, "123456")
        .await;
    assert_eq!(verification_err(result), VerificationError::NotRequested);
}

#[tokio::test]
async fn test_verify_wrong_purpose_is_not_requested() {
    let h = harness();
    h.service
        .request_code(IDENTITY, VerificationPurpose::Register)
        .await
        .unwrap();
    let code = h.mail.last_code_for(IDENTITY).unwrap();

    let result = h
        .service
        .verify_code(IDENTITY, VerificationPurpose::ChangePassword, &code)
        .await;
    assert_eq!(verification_err(result), VerificationError::NotRequested);
}

#[tokio::test]
async fn test_mismatch_counts_attempts_and_keeps_remaining_ttl() {
    let h = harness();
    h.service
        .request_code(IDENTITY, VerificationPurpose::Register)
        .await
        .unwrap();
    let code = h.mail.last_code_for(IDENTITY).unwrap();
    let wrong = if code == "999999" { "100000" } else { "999999" };
    let key = h.service.cache_key(IDENTITY, VerificationPurpose::Register);

    h.clock.advance(Duration::seconds(100));
    let result = h
        .service
        .verify_code(IDENTITY, VerificationPurpose::Register, wrong)
        .await;
    assert_eq!(
        verification_err(result),
        VerificationError::Mismatch { remaining_attempts: 2 }
    );

    let record = h.store.get(&key).await.unwrap().unwrap();
    assert_eq!(record.attempts, 1);
    assert_eq!(h.store.ttl_of(&key).await, Some(Duration::seconds(200)));

    // Correct code still works after a miss
    h.service
        .verify_code(IDENTITY, VerificationPurpose::Register, &code)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_attempts_exhausted_deletes_record() {
    let h = harness();
    h.service
        .request_code(IDENTITY, VerificationPurpose::Register)
        .await
        .unwrap();
    let code = h.mail.last_code_for(IDENTITY).unwrap();
    let wrong = if code == "999999" { "100000" } else { "999999" };

    for expected_remaining in [2, 1] {
        let result = h
            .service
            .verify_code(IDENTITY, VerificationPurpose::Register, wrong)
            .await;
        assert_eq!(
            verification_err(result),
            VerificationError::Mismatch {
                remaining_attempts: expected_remaining
            }
        );
    }

    let third = h
        .service
        .verify_code(IDENTITY, VerificationPurpose::Register, wrong)
        .await;
    assert_eq!(verification_err(third), VerificationError::AttemptsExceeded);
    assert_eq!(h.store.len().await, 0);

    let late = h
        .service
        .verify_code(IDENTITY, VerificationPurpose::Register, &code)
        .await;
    assert_eq!(verification_err(late), VerificationError::NotRequested);
}

#[tokio::test]
async fn test_expired_code_fails_and_is_deleted() {
    let h = harness();
    h.service
        .request_code(IDENTITY, VerificationPurpose::Register)
        .await
        .unwrap();
    let code = h.mail.last_code_for(IDENTITY).unwrap();

    h.clock.advance(Duration::seconds(301));
    let result = h
        .service
        .verify_code(IDENTITY, VerificationPurpose::Register, &code)
        .await;
    assert_eq!(verification_err(result), VerificationError::Expired);
    assert_eq!(h.store.len().await, 0);
}

#[tokio::test]
async fn test_short_ttl_and_single_attempt_config() {
    let config = VerificationConfig {
        ttl_seconds: 10,
        max_attempts: 1,
        ..Default::default()
    };
    let h = harness_with(MockMailService::new(), config);
    h.service
        .request_code(IDENTITY, VerificationPurpose::ChangePassword)
        .await
        .unwrap();
    let code = h.mail.last_code_for(IDENTITY).unwrap();
    let wrong = if code == "999999" { "100000" } else { "999999" };

    let result = h
        .service
        .verify_code(IDENTITY, VerificationPurpose::ChangePassword, wrong)
        .await;
    assert_eq!(verification_err(result), VerificationError::AttemptsExceeded);
}

#[tokio::test]
async fn test_concurrent_verifications_consume_once() {
    let h = harness();
    h.service
        .request_code(IDENTITY, VerificationPurpose::Register)
        .await
        .unwrap();
    let code = h.mail.last_code_for(IDENTITY).unwrap();

    let service = Arc::new(h.service);
    let mut handles = Vec::new();
    for _ in 0..8 {
        let service = service.clone();
        let code = code.clone();
        handles.push(tokio::spawn(async move {
            service
                .verify_code(IDENTITY, VerificationPurpose::Register, &code)
                .await
                .is_ok()
        }));
    }

    let mut successes = 0;
    for handle in handles {
        if handle.await.unwrap() {
            successes += 1;
        }
    }
    assert_eq!(successes, 1);
}

#[tokio::test]
async fn test_stale_compare_is_rejected_by_store() {
    let store = MockVerificationStore::new();
    let now = Utc::now();
    let original = VerificationRecord::issue("123456", now, Duration::seconds(300));
    let key = "email_verification:register:x@email.ntou.edu.tw";
    store
        .insert_if_absent(key, &original, Duration::seconds(300))
        .await
        .unwrap();

    let bumped = original.with_failed_attempt();
    assert!(store
        .compare_and_update(key, &original, &bumped, Duration::seconds(200))
        .await
        .unwrap());
    // A second writer still holding `original` loses
    assert!(!store.compare_and_delete(key, &original).await.unwrap());
    assert!(store.compare_and_delete(key, &bumped).await.unwrap());
}

//! In-memory application used by the HTTP tests

#![allow(dead_code)]

use std::sync::Arc;

use actix_web::{body::MessageBody, dev::ServiceResponse, test, web};
use chrono::{TimeZone, Utc};
use serde_json::Value;

use cr_api::{configure, token_service, AppState, Backends};
use cr_core::domain::{Account, Building, Room};
use cr_core::repositories::{
    MockAccountRepository, MockDenyListRepository, MockReservationRepository, MockRoomCatalog,
};
use cr_core::services::{
    ManualClock, MockMailService, MockSecretHasher, MockVerificationStore, ReservationConfig,
    VerificationConfig,
};
use cr_shared::JwtConfig;

pub const PASSWORD: &str = "Passw0rd1";
pub const STAFF_EMAIL: &str = "staff@email.ntou.edu.tw";
pub const STUDENT_EMAIL: &str = "student01@email.ntou.edu.tw";
pub const ROOM: &str = "INS201";
pub const BOOKING_DATE: &str = "2025-11-30";

pub struct TestContext {
    pub state: web::Data<AppState>,
    pub tokens: web::Data<cr_api::middleware::TokenService>,
    pub mail: Arc<MockMailService>,
    pub staff: Account,
    pub student: Account,
}

impl TestContext {
    pub fn new() -> Self {
        let now = Utc.with_ymd_and_hms(2025, 11, 20, 2, 0, 0).unwrap();
        let hash = format!("mock${}", PASSWORD);

        let staff = Account::new(STAFF_EMAIL.into(), "Staff".into(), hash.clone(), now).as_staff();
        let student = Account::new(STUDENT_EMAIL.into(), "Student".into(), hash, now);

        let mail = Arc::new(MockMailService::new());
        let backends = Backends {
            accounts: Arc::new(MockAccountRepository::with_accounts([staff.clone(), student.clone()])),
            deny_list: Arc::new(MockDenyListRepository::new()),
            rooms: Arc::new(MockRoomCatalog::with_rooms([
                Room::new(ROOM, Building::Ins, "INS 201", 60),
                Room::new("LIB401", Building::Lib, "Library 401", 30).deactivated(),
            ])),
            reservations: Arc::new(MockReservationRepository::new()),
            verification_store: Arc::new(MockVerificationStore::new()),
            mail: mail.clone(),
            hasher: Arc::new(MockSecretHasher),
            clock: Arc::new(ManualClock::new(now)),
        };

        Self {
            state: web::Data::new(AppState::new(
                backends,
                VerificationConfig::default(),
                ReservationConfig::default(),
            )),
            tokens: token_service(&JwtConfig::new("api-test-secret")),
            mail,
            staff,
            student,
        }
    }

    pub fn configure(&self) -> impl FnOnce(&mut web::ServiceConfig) {
        configure(self.state.clone(), self.tokens.clone())
    }

    pub fn bearer(&self, account: &Account) -> (actix_web::http::header::HeaderName, String) {
        let issued = self.tokens.issue(account).unwrap();
        (
            actix_web::http::header::AUTHORIZATION,
            format!("Bearer {}", issued.token),
        )
    }
}

/// Status and JSON body of a response
pub async fn read<B: MessageBody>(resp: ServiceResponse<B>) -> (u16, Value) {
    let status = resp.status().as_u16();
    let body = test::read_body(resp).await;
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

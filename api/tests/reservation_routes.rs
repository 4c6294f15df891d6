mod common;

use actix_web::{test, App};
use serde_json::{json, Value};

use common::{read, TestContext, BOOKING_DATE, ROOM};

fn booking(time_slot: &str) -> Value {
    json!({
        "room_code": ROOM,
        "date": BOOKING_DATE,
        "time_slot": time_slot,
        "reason": "Study group",
    })
}

#[actix_web::test]
async fn test_reservations_require_token() {
    let ctx = TestContext::new();
    let app = test::init_service(App::new().configure(ctx.configure())).await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/api/reservations").to_request()).await;
    let (status, body) = read(resp).await;
    assert_eq!(status, 401);
    assert_eq!(body["error"], "UNAUTHORIZED");

    let req = test::TestRequest::get()
        .uri("/api/reservations")
        .insert_header(("Authorization", "Bearer not-a-jwt"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status().as_u16(), 401);
}

#[actix_web::test]
async fn test_booking_lifecycle() {
    let ctx = TestContext::new();
    let app = test::init_service(App::new().configure(ctx.configure())).await;
    let student = ctx.bearer(&ctx.student);
    let staff = ctx.bearer(&ctx.staff);

    let req = test::TestRequest::post()
        .uri("/api/reservations")
        .insert_header(student.clone())
        .set_json(booking("3-4"))
        .to_request();
    let (status, body) = read(test::call_service(&app, req).await).await;
    assert_eq!(status, 201);
    assert_eq!(body["data"]["status"], "pending");
    let id = body["data"]["id"].as_str().unwrap().to_string();

    // Same slot, different account
    let req = test::TestRequest::post()
        .uri("/api/reservations")
        .insert_header(staff.clone())
        .set_json(booking("3-4"))
        .to_request();
    let (status, body) = read(test::call_service(&app, req).await).await;
    assert_eq!(status, 409);
    assert_eq!(body["error"], "SLOT_CONFLICT");
    assert_eq!(body["details"]["time_slot"], "3-4");

    // Occupancy is public
    let req = test::TestRequest::get()
        .uri(&format!("/api/reservations/occupied?classroom={}", ROOM))
        .to_request();
    let (status, body) = read(test::call_service(&app, req).await).await;
    assert_eq!(status, 200);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["date"], BOOKING_DATE);

    // Only staff review
    let req = test::TestRequest::patch()
        .uri(&format!("/api/reservations/{}/status", id))
        .insert_header(student.clone())
        .set_json(json!({ "status": "approved" }))
        .to_request();
    let (status, body) = read(test::call_service(&app, req).await).await;
    assert_eq!(status, 403);
    assert_eq!(body["error"], "FORBIDDEN");

    let req = test::TestRequest::patch()
        .uri(&format!("/api/reservations/{}/status", id))
        .insert_header(staff.clone())
        .set_json(json!({ "status": "approved" }))
        .to_request();
    let (status, body) = read(test::call_service(&app, req).await).await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["status"], "approved");

    let req = test::TestRequest::patch()
        .uri(&format!("/api/reservations/{}/status", id))
        .insert_header(staff.clone())
        .set_json(json!({ "status": "rejected" }))
        .to_request();
    let (status, body) = read(test::call_service(&app, req).await).await;
    assert_eq!(status, 409);
    assert_eq!(body["error"], "INVALID_TRANSITION");

    // Only the owner cancels
    let req = test::TestRequest::post()
        .uri(&format!("/api/reservations/{}/cancel", id))
        .insert_header(staff.clone())
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status().as_u16(), 403);

    let req = test::TestRequest::post()
        .uri(&format!("/api/reservations/{}/cancel", id))
        .insert_header(student.clone())
        .to_request();
    let (status, body) = read(test::call_service(&app, req).await).await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["status"], "cancelled");

    // The slot is free again
    let req = test::TestRequest::post()
        .uri("/api/reservations")
        .insert_header(staff)
        .set_json(booking("3-4"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status().as_u16(), 201);
}

#[actix_web::test]
async fn test_listing_scopes_to_caller() {
    let ctx = TestContext::new();
    let app = test::init_service(App::new().configure(ctx.configure())).await;
    let student = ctx.bearer(&ctx.student);
    let staff = ctx.bearer(&ctx.staff);

    for (auth, slot) in [(student.clone(), "1-2"), (staff.clone(), "5-6")] {
        let req = test::TestRequest::post()
            .uri("/api/reservations")
            .insert_header(auth)
            .set_json(booking(slot))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status().as_u16(), 201);
    }

    let req = test::TestRequest::get()
        .uri("/api/reservations?view_all=true")
        .insert_header(student.clone())
        .to_request();
    let (_, body) = read(test::call_service(&app, req).await).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let req = test::TestRequest::get()
        .uri("/api/reservations?view_all=true&status=pending")
        .insert_header(staff.clone())
        .to_request();
    let (_, body) = read(test::call_service(&app, req).await).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let req = test::TestRequest::get()
        .uri("/api/reservations?status=archived")
        .insert_header(staff)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status().as_u16(), 400);
}

#[actix_web::test]
async fn test_booking_validation_errors() {
    let ctx = TestContext::new();
    let app = test::init_service(App::new().configure(ctx.configure())).await;
    let student = ctx.bearer(&ctx.student);

    let cases = [
        (json!({ "room_code": ROOM, "date": BOOKING_DATE }), 400, "MISSING_FIELD"),
        (json!({ "room_code": "NOPE1", "date": BOOKING_DATE, "time_slot": "1" }), 404, "ROOM_NOT_FOUND"),
        (json!({ "room_code": "LIB401", "date": BOOKING_DATE, "time_slot": "1" }), 404, "ROOM_NOT_FOUND"),
        (json!({ "room_code": ROOM, "date": "2025-11-01", "time_slot": "1" }), 400, "INVALID_DATE"),
        (json!({ "room_code": ROOM, "date": "30-11-2025", "time_slot": "1" }), 400, "INVALID_DATE"),
    ];

    for (payload, expected_status, expected_code) in cases {
        let req = test::TestRequest::post()
            .uri("/api/reservations")
            .insert_header(student.clone())
            .set_json(payload)
            .to_request();
        let (status, body) = read(test::call_service(&app, req).await).await;
        assert_eq!(status, expected_status, "{}", body);
        assert_eq!(body["error"], expected_code);
    }
}

#[actix_web::test]
async fn test_unknown_reservation_id() {
    let ctx = TestContext::new();
    let app = test::init_service(App::new().configure(ctx.configure())).await;

    let req = test::TestRequest::post()
        .uri("/api/reservations/not-a-uuid/cancel")
        .insert_header(ctx.bearer(&ctx.student))
        .to_request();
    let (status, body) = read(test::call_service(&app, req).await).await;
    assert_eq!(status, 404);
    assert_eq!(body["error"], "RESERVATION_NOT_FOUND");
}

#[actix_web::test]
async fn test_occupied_query_validation() {
    let ctx = TestContext::new();
    let app = test::init_service(App::new().configure(ctx.configure())).await;

    let req = test::TestRequest::get().uri("/api/reservations/occupied").to_request();
    assert_eq!(test::call_service(&app, req).await.status().as_u16(), 400);

    let req = test::TestRequest::get()
        .uri("/api/reservations/occupied?classroom=INS201&date_from=2025/11/30")
        .to_request();
    let (status, body) = read(test::call_service(&app, req).await).await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "INVALID_DATE");

    let req = test::TestRequest::get()
        .uri("/api/reservations/occupied?classroom=INS201&date_from=%2B262142-12-31")
        .to_request();
    let (status, body) = read(test::call_service(&app, req).await).await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "INVALID_DATE");

    let req = test::TestRequest::get()
        .uri("/api/reservations/occupied?classroom=UNKNOWN")
        .to_request();
    let (status, body) = read(test::call_service(&app, req).await).await;
    assert_eq!(status, 200);
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[actix_web::test]
async fn test_room_catalog() {
    let ctx = TestContext::new();
    let app = test::init_service(App::new().configure(ctx.configure())).await;

    let req = test::TestRequest::get().uri("/api/rooms?building=ins").to_request();
    let (status, body) = read(test::call_service(&app, req).await).await;
    assert_eq!(status, 200);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["code"], ROOM);

    let req = test::TestRequest::get().uri("/api/rooms/LIB401").to_request();
    let (status, body) = read(test::call_service(&app, req).await).await;
    assert_eq!(status, 404);
    assert_eq!(body["error"], "ROOM_NOT_FOUND");

    let req = test::TestRequest::get().uri("/api/rooms?building=MARS").to_request();
    assert_eq!(test::call_service(&app, req).await.status().as_u16(), 400);
}

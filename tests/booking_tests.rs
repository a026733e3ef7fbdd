mod common;

use actix_web::{http::StatusCode, test};
use busline::create_app;
use common::{bearer, online_booking, passenger_token, seed_fleet, send, test_state};
use serde_json::json;

#[actix_web::test]
async fn test_book_ticket_context_prices_a_known_pair() {
    let state = test_state().await;
    seed_fleet(&state).await;
    let app = test::init_service(create_app(state.clone())).await;

    let req = test::TestRequest::get()
        .uri("/book-ticket/?route_no=500D&from=Silk%20Board&to=Hebbal")
        .to_request();
    let (status, body) = send(&app, req).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["base_fare"], "30.00");
    assert_eq!(body["fare_per_seat"], "40.00");
    assert_eq!(body["currency"], "INR");

    // Unknown stops leave the fare out instead of failing
    let req = test::TestRequest::get()
        .uri("/book-ticket/?route_no=500D&from=Nowhere&to=Hebbal")
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["fare_per_seat"].is_null());
}

#[actix_web::test]
async fn test_create_order_requires_a_session() {
    let state = test_state().await;
    seed_fleet(&state).await;
    let app = test::init_service(create_app(state.clone())).await;

    let req = test::TestRequest::post()
        .uri("/create-order/")
        .set_json(json!({"route_no": "500D", "from": "Silk Board", "to": "Hebbal"}))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_online_booking_lifecycle() {
    let state = test_state().await;
    let fleet = seed_fleet(&state).await;
    let app = test::init_service(create_app(state.clone())).await;
    let token = passenger_token(&state, "asha").await;

    let req = test::TestRequest::post()
        .uri("/create-order/")
        .insert_header(bearer(&token))
        .set_json(json!({
            "route_no": "500D",
            "from": "silk board",
            "to": "Hebbal",
            "seats": 2,
            "schedule_id": fleet.morning,
        }))
        .to_request();
    let (status, order) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK, "{order}");
    assert_eq!(order["amount"], 8000);
    assert_eq!(order["currency"], "INR");
    let order_id = order["id"].as_str().unwrap().to_string();

    let signature = state
        .payments
        .checkout_signature(&order_id, "pay_001")
        .unwrap();
    let req = test::TestRequest::post()
        .uri("/payment-success/")
        .insert_header(bearer(&token))
        .set_json(json!({
            "razorpay_order_id": order_id,
            "razorpay_payment_id": "pay_001",
            "razorpay_signature": signature,
        }))
        .to_request();
    let (status, paid) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK, "{paid}");
    assert_eq!(paid["message"], "Booking confirmed");
    let booking_id = paid["booking_id"].as_i64().unwrap();
    assert_eq!(
        paid["redirect_url"],
        format!("/booking-confirmation/{booking_id}/")
    );

    // Seats come off the departure once paid
    let schedule = state.db.find_schedule(fleet.morning).await.unwrap().unwrap();
    assert_eq!(schedule.available_seats, 38);

    // Confirming again returns the same booking without selling more seats
    let req = test::TestRequest::post()
        .uri("/payment-success/")
        .insert_header(bearer(&token))
        .set_json(json!({
            "order_id": order_id,
            "payment_id": "pay_001",
            "signature": signature,
        }))
        .to_request();
    let (status, replay) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(replay["booking_id"], booking_id);
    let schedule = state.db.find_schedule(fleet.morning).await.unwrap().unwrap();
    assert_eq!(schedule.available_seats, 38);

    let req = test::TestRequest::get()
        .uri(&format!("/booking-confirmation/{booking_id}/"))
        .insert_header(bearer(&token))
        .to_request();
    let (status, booking) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(booking["source"], "Silk Board");
    assert_eq!(booking["destination"], "Hebbal");
    assert_eq!(booking["seats"], 2);
    assert_eq!(booking["fare"], "80.00");
    assert_eq!(booking["channel"], "online");
    assert_eq!(booking["status"], "issued");
    let payload = booking["qr_payload"].as_str().unwrap();
    assert!(payload.starts_with(&format!("BT1.{booking_id}.")));

    let req = test::TestRequest::get()
        .uri("/my-bookings/")
        .insert_header(bearer(&token))
        .to_request();
    let (_, mine) = send(&app, req).await;
    assert_eq!(mine.as_array().unwrap().len(), 1);

    let req = test::TestRequest::get()
        .uri("/api/recent-bookings/")
        .insert_header(bearer(&token))
        .to_request();
    let (_, recent) = send(&app, req).await;
    assert_eq!(
        recent["recent_bookings"],
        json!([{"route_no": "500D", "from_stop": "Silk Board", "to_stop": "Hebbal"}])
    );
}

#[actix_web::test]
async fn test_forged_payment_signature_is_rejected() {
    let state = test_state().await;
    seed_fleet(&state).await;
    let app = test::init_service(create_app(state.clone())).await;
    let token = passenger_token(&state, "ravi").await;

    let req = test::TestRequest::post()
        .uri("/create-order/")
        .insert_header(bearer(&token))
        .set_json(json!({"route_no": "500D", "from": "Majestic", "to": "Hebbal"}))
        .to_request();
    let (_, order) = send(&app, req).await;
    let order_id = order["id"].as_str().unwrap();

    let req = test::TestRequest::post()
        .uri("/payment-success/")
        .insert_header(bearer(&token))
        .set_json(json!({
            "order_id": order_id,
            "payment_id": "pay_002",
            "signature": "deadbeef",
        }))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Bad Request");

    let req = test::TestRequest::get()
        .uri("/my-bookings/")
        .insert_header(bearer(&token))
        .to_request();
    let (_, mine) = send(&app, req).await;
    assert!(mine.as_array().unwrap().is_empty());
}

#[actix_web::test]
async fn test_orders_belong_to_their_creator() {
    let state = test_state().await;
    seed_fleet(&state).await;
    let app = test::init_service(create_app(state.clone())).await;
    let owner = passenger_token(&state, "meera").await;
    let other = passenger_token(&state, "kiran").await;

    let req = test::TestRequest::post()
        .uri("/create-order/")
        .insert_header(bearer(&owner))
        .set_json(json!({"route_no": "500D", "from": "Majestic", "to": "Hebbal"}))
        .to_request();
    let (_, order) = send(&app, req).await;
    let order_id = order["id"].as_str().unwrap().to_string();
    let signature = state
        .payments
        .checkout_signature(&order_id, "pay_003")
        .unwrap();

    let req = test::TestRequest::post()
        .uri("/payment-success/")
        .insert_header(bearer(&other))
        .set_json(json!({
            "order_id": order_id,
            "payment_id": "pay_003",
            "signature": signature,
        }))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_create_order_validation() {
    let state = test_state().await;
    let fleet = seed_fleet(&state).await;
    let app = test::init_service(create_app(state.clone())).await;
    let token = passenger_token(&state, "devi").await;

    let cases = [
        (
            json!({"route_no": "500D", "from": "Hebbal", "to": "Majestic"}),
            StatusCode::BAD_REQUEST,
        ),
        (
            json!({"route_no": "500D", "from": "Majestic", "to": "Hebbal", "seats": 0}),
            StatusCode::BAD_REQUEST,
        ),
        (
            json!({"route_no": "500D", "from": "Majestic", "to": "Hebbal", "seats": 11}),
            StatusCode::BAD_REQUEST,
        ),
        (
            json!({"route_no": "999Z", "from": "Majestic", "to": "Hebbal"}),
            StatusCode::NOT_FOUND,
        ),
        (
            json!({"route_no": "500D", "from": "Majestic", "to": "Hebbal",
                   "schedule_id": fleet.airport}),
            StatusCode::BAD_REQUEST,
        ),
        (
            json!({"route_no": "500D", "from": "Majestic", "to": "Hebbal",
                   "seats": 3, "schedule_id": fleet.early}),
            StatusCode::CONFLICT,
        ),
    ];

    for (payload, expected) in cases {
        let req = test::TestRequest::post()
            .uri("/create-order/")
            .insert_header(bearer(&token))
            .set_json(&payload)
            .to_request();
        let (status, body) = send(&app, req).await;
        assert_eq!(status, expected, "{payload} -> {body}");
    }
}

#[actix_web::test]
async fn test_confirmation_hidden_from_other_passengers() {
    let state = test_state().await;
    seed_fleet(&state).await;
    let app = test::init_service(create_app(state.clone())).await;
    let owner = passenger_token(&state, "lata").await;
    let other = passenger_token(&state, "arun").await;

    let req = test::TestRequest::post()
        .uri("/create-order/")
        .insert_header(bearer(&owner))
        .set_json(json!({"route_no": "KIAS-9", "from": "Majestic", "to": "Airport"}))
        .to_request();
    let (_, order) = send(&app, req).await;
    let order_id = order["id"].as_str().unwrap().to_string();
    let signature = state
        .payments
        .checkout_signature(&order_id, "pay_004")
        .unwrap();
    let req = test::TestRequest::post()
        .uri("/payment-success/")
        .insert_header(bearer(&owner))
        .set_json(json!({"order_id": order_id, "payment_id": "pay_004", "signature": signature}))
        .to_request();
    let (_, paid) = send(&app, req).await;
    let booking_id = paid["booking_id"].as_i64().unwrap();

    let req = test::TestRequest::get()
        .uri(&format!("/booking-confirmation/{booking_id}/"))
        .insert_header(bearer(&other))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_payment_fails_when_seats_ran_out_after_ordering() {
    let state = test_state().await;
    let fleet = seed_fleet(&state).await;
    let app = test::init_service(create_app(state.clone())).await;
    let first = passenger_token(&state, "kavya").await;
    let second = passenger_token(&state, "manoj").await;

    // Both orders fit the two-seat departure when placed
    let mut orders = Vec::new();
    for token in [&first, &second] {
        let req = test::TestRequest::post()
            .uri("/create-order/")
            .insert_header(bearer(token))
            .set_json(json!({
                "route_no": "500D",
                "from": "Silk Board",
                "to": "Majestic",
                "seats": 2,
                "schedule_id": fleet.early,
            }))
            .to_request();
        let (status, order) = send(&app, req).await;
        assert_eq!(status, StatusCode::OK, "{order}");
        orders.push(order["id"].as_str().unwrap().to_string());
    }

    let mut outcomes = Vec::new();
    for (token, order_id) in [&first, &second].into_iter().zip(&orders) {
        let payment_id = format!("pay_{order_id}");
        let signature = state
            .payments
            .checkout_signature(order_id, &payment_id)
            .unwrap();
        let req = test::TestRequest::post()
            .uri("/payment-success/")
            .insert_header(bearer(token))
            .set_json(json!({
                "order_id": order_id,
                "payment_id": payment_id,
                "signature": signature,
            }))
            .to_request();
        outcomes.push(send(&app, req).await);
    }

    assert_eq!(outcomes[0].0, StatusCode::OK, "{}", outcomes[0].1);
    assert_eq!(outcomes[1].0, StatusCode::CONFLICT, "{}", outcomes[1].1);
    assert_eq!(outcomes[1].1["error"], "Conflict");

    let schedule = state.db.find_schedule(fleet.early).await.unwrap().unwrap();
    assert_eq!(schedule.available_seats, 0);

    let req = test::TestRequest::get()
        .uri("/my-bookings/")
        .insert_header(bearer(&second))
        .to_request();
    let (_, mine) = send(&app, req).await;
    assert_eq!(mine, json!([]));
}

#[actix_web::test]
async fn test_recent_bookings_keeps_the_latest_three() {
    let state = test_state().await;
    seed_fleet(&state).await;
    let app = test::init_service(create_app(state.clone())).await;
    let token = passenger_token(&state, "commuter").await;

    online_booking(&state, &token, "500D", "Silk Board", "Majestic", 1).await;
    online_booking(&state, &token, "500D", "Majestic", "Hebbal", 1).await;
    online_booking(&state, &token, "KIAS-9", "Majestic", "Airport", 1).await;
    online_booking(&state, &token, "500D", "Silk Board", "Hebbal", 1).await;

    let req = test::TestRequest::get()
        .uri("/api/recent-bookings/")
        .insert_header(bearer(&token))
        .to_request();
    let (status, recent) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        recent["recent_bookings"],
        json!([
            {"route_no": "500D", "from_stop": "Silk Board", "to_stop": "Hebbal"},
            {"route_no": "KIAS-9", "from_stop": "Majestic", "to_stop": "Airport"},
            {"route_no": "500D", "from_stop": "Majestic", "to_stop": "Hebbal"},
        ])
    );

    let req = test::TestRequest::get()
        .uri("/my-bookings/")
        .insert_header(bearer(&token))
        .to_request();
    let (_, mine) = send(&app, req).await;
    assert_eq!(mine.as_array().unwrap().len(), 4);
}

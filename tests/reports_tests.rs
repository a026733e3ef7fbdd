mod common;

use actix_web::{http::StatusCode, test};
use busline::create_app;
use common::{admin_token, bearer, online_booking, passenger_token, seed_fleet, send, test_state};
use serde_json::json;

#[actix_web::test]
async fn test_complaint_from_booking() {
    let state = test_state().await;
    seed_fleet(&state).await;
    let app = test::init_service(create_app(state.clone())).await;
    let token = passenger_token(&state, "rekha").await;
    let booking = online_booking(&state, &token, "KIAS-9", "Majestic", "Airport", 1).await;

    let req = test::TestRequest::post()
        .uri("/complaint/report/")
        .insert_header(bearer(&token))
        .set_json(json!({
            "description": "Air conditioning not working",
            "contact_number": "9876543210",
            "address": "12 MG Road",
            "booking_id": booking.id,
            "images": ["uploads/ac-1.jpg", " "],
        }))
        .to_request();
    let (status, complaint) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK, "{complaint}");
    assert_eq!(complaint["passenger_name"], "rekha");
    assert_eq!(complaint["route_no"], "KIAS-9");
    assert_eq!(complaint["status"], "Pending");
    assert_eq!(complaint["images"], json!(["uploads/ac-1.jpg"]));

    let id = complaint["id"].as_i64().unwrap();
    let req = test::TestRequest::get()
        .uri(&format!("/complaint/{id}/"))
        .insert_header(bearer(&token))
        .to_request();
    let (status, fetched) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["description"], "Air conditioning not working");
}

#[actix_web::test]
async fn test_complaint_validation() {
    let state = test_state().await;
    seed_fleet(&state).await;
    let app = test::init_service(create_app(state.clone())).await;
    let token = passenger_token(&state, "hari").await;

    let base = json!({
        "description": "Driver skipped the stop",
        "contact_number": "9876543210",
        "address": "Indiranagar",
    });
    let with = |key: &str, value: serde_json::Value| {
        let mut body = base.clone();
        body[key] = value;
        body
    };

    let cases = [
        (with("images", json!(["a", "b", "c", "d"])), StatusCode::BAD_REQUEST),
        (with("contact_number", json!("12ab")), StatusCode::BAD_REQUEST),
        (with("description", json!("  ")), StatusCode::BAD_REQUEST),
        (with("bus_id", json!("KA00X0000")), StatusCode::NOT_FOUND),
        (with("booking_id", json!(4242)), StatusCode::NOT_FOUND),
        (with("bus_id", json!("KA01F1234")), StatusCode::OK),
    ];
    for (payload, expected) in cases {
        let req = test::TestRequest::post()
            .uri("/complaint/report/")
            .insert_header(bearer(&token))
            .set_json(&payload)
            .to_request();
        let (status, body) = send(&app, req).await;
        assert_eq!(status, expected, "{payload} -> {body}");
    }
}

#[actix_web::test]
async fn test_reports_visible_to_owner_and_admin_only() {
    let state = test_state().await;
    seed_fleet(&state).await;
    let app = test::init_service(create_app(state.clone())).await;
    let owner = passenger_token(&state, "pooja").await;
    let other = passenger_token(&state, "sunil").await;
    let admin = admin_token(&state).await;

    let req = test::TestRequest::post()
        .uri("/lost-and-found/report/")
        .insert_header(bearer(&owner))
        .set_json(json!({
            "description": "Black umbrella",
            "bus_id": "KA01F1234",
            "route_no": "500D",
            "loss_datetime": "2026-10-15T08:30:00",
            "passenger_name": "Pooja",
            "contact_number": "9988776655",
        }))
        .to_request();
    let (status, item) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK, "{item}");
    assert_eq!(item["bus_id"], "KA01F1234");
    assert_eq!(item["status"], "Reported");
    let id = item["id"].as_i64().unwrap();

    let fetch = |token: &str| {
        test::TestRequest::get()
            .uri(&format!("/lost-and-found/{id}/"))
            .insert_header(bearer(token))
            .to_request()
    };
    assert_eq!(send(&app, fetch(&owner)).await.0, StatusCode::OK);
    assert_eq!(send(&app, fetch(&admin)).await.0, StatusCode::OK);
    assert_eq!(send(&app, fetch(&other)).await.0, StatusCode::NOT_FOUND);

    let req = test::TestRequest::get()
        .uri(&format!("/lost-and-found/{id}/"))
        .to_request();
    assert_eq!(send(&app, req).await.0, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_admin_complaint_workflow() {
    let state = test_state().await;
    seed_fleet(&state).await;
    let app = test::init_service(create_app(state.clone())).await;
    let passenger = passenger_token(&state, "zoya").await;
    let admin = admin_token(&state).await;

    for description in ["Overcrowded bus", "Rude behaviour at Majestic"] {
        let req = test::TestRequest::post()
            .uri("/complaint/report/")
            .insert_header(bearer(&passenger))
            .set_json(json!({
                "description": description,
                "contact_number": "9876543210",
                "address": "Jayanagar",
                "route_no": "500D",
            }))
            .to_request();
        assert_eq!(send(&app, req).await.0, StatusCode::OK);
    }

    // Passengers cannot use the admin listing
    let req = test::TestRequest::get()
        .uri("/api/admin/complaints/")
        .insert_header(bearer(&passenger))
        .to_request();
    assert_eq!(send(&app, req).await.0, StatusCode::FORBIDDEN);

    let req = test::TestRequest::get()
        .uri("/api/admin/complaints/?q=majestic")
        .insert_header(bearer(&admin))
        .to_request();
    let (status, page) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 1);
    let id = page["items"][0]["id"].as_i64().unwrap();

    let req = test::TestRequest::put()
        .uri(&format!("/api/admin/complaints/{id}/status/"))
        .insert_header(bearer(&admin))
        .set_json(json!({"status": "In Progress"}))
        .to_request();
    let (status, updated) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK, "{updated}");
    assert_eq!(updated["status"], "In Progress");

    let req = test::TestRequest::get()
        .uri("/api/admin/complaints/?status=in_progress")
        .insert_header(bearer(&admin))
        .to_request();
    let (_, page) = send(&app, req).await;
    assert_eq!(page["total"], 1);
    assert_eq!(page["items"][0]["id"], id);

    let req = test::TestRequest::get()
        .uri("/api/admin/complaints/?status=lost")
        .insert_header(bearer(&admin))
        .to_request();
    assert_eq!(send(&app, req).await.0, StatusCode::BAD_REQUEST);

    let req = test::TestRequest::put()
        .uri("/api/admin/complaints/999/status/")
        .insert_header(bearer(&admin))
        .set_json(json!({"status": "Resolved"}))
        .to_request();
    assert_eq!(send(&app, req).await.0, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_admin_lost_item_workflow() {
    let state = test_state().await;
    seed_fleet(&state).await;
    let app = test::init_service(create_app(state.clone())).await;
    let passenger = passenger_token(&state, "omar").await;
    let admin = admin_token(&state).await;

    let req = test::TestRequest::post()
        .uri("/lost-and-found/report/")
        .insert_header(bearer(&passenger))
        .set_json(json!({
            "description": "Blue backpack",
            "passenger_name": "Omar",
            "contact_number": "9000000001",
        }))
        .to_request();
    let (_, item) = send(&app, req).await;
    let id = item["id"].as_i64().unwrap();

    let req = test::TestRequest::put()
        .uri(&format!("/api/admin/lost-items/{id}/status/"))
        .insert_header(bearer(&admin))
        .set_json(json!({"status": "Found"}))
        .to_request();
    let (status, updated) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK, "{updated}");
    assert_eq!(updated["status"], "Found");

    let req = test::TestRequest::get()
        .uri("/api/admin/lost-items/?status=found")
        .insert_header(bearer(&admin))
        .to_request();
    let (status, page) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 1);
    assert_eq!(page["items"][0]["description"], "Blue backpack");
}

#[actix_web::test]
async fn test_admin_listing_rejects_out_of_range_page() {
    let state = test_state().await;
    let app = test::init_service(create_app(state.clone())).await;
    let admin = admin_token(&state).await;

    for path in ["/api/admin/complaints/", "/api/admin/lost-items/"] {
        let req = test::TestRequest::get()
            .uri(&format!("{path}?page={}", i64::MAX))
            .insert_header(bearer(&admin))
            .to_request();
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{path}: {body}");
        assert_eq!(body["error"], "Bad Request");
    }
}

#[actix_web::test]
async fn test_complaint_search_treats_wildcards_literally() {
    let state = test_state().await;
    let app = test::init_service(create_app(state.clone())).await;
    let passenger = passenger_token(&state, "leela").await;
    let admin = admin_token(&state).await;

    for description in ["Charged 50% extra on the ticket", "Bus 500 was late"] {
        let req = test::TestRequest::post()
            .uri("/complaint/report/")
            .insert_header(bearer(&passenger))
            .set_json(json!({
                "description": description,
                "contact_number": "9876543210",
                "address": "4 Residency Road",
            }))
            .to_request();
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::OK, "{body}");
    }

    let req = test::TestRequest::get()
        .uri("/api/admin/complaints/?q=50%25")
        .insert_header(bearer(&admin))
        .to_request();
    let (status, page) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 1);
    assert_eq!(page["items"][0]["description"], "Charged 50% extra on the ticket");
}

mod common;

use actix_web::{http::StatusCode, test};
use busline::create_app;
use common::{admin_token, bearer, online_booking, passenger_token, seed_fleet, send, test_state};
use serde_json::json;

#[actix_web::test]
async fn test_admin_builds_a_route() {
    let state = test_state().await;
    let app = test::init_service(create_app(state.clone())).await;
    let admin = admin_token(&state).await;

    let post = |uri: &str, body: serde_json::Value| {
        test::TestRequest::post()
            .uri(uri)
            .insert_header(bearer(&admin))
            .set_json(body)
            .to_request()
    };

    let (status, bus) = send(
        &app,
        post(
            "/api/admin/buses/",
            json!({"bus_id": "KA05G7777", "category": "Electric", "capacity": 30}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{bus}");

    let (status, route) = send(
        &app,
        post(
            "/api/admin/routes/",
            json!({"route_no": "V-335E", "source": "Kempegowda", "destination": "ITPL", "distance": 25.0}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(route["fare"], "25.00");

    let mut stop_ids = Vec::new();
    for (name, lat, lng) in [("Kempegowda", 12.977, 77.571), ("ITPL", 12.987, 77.737)] {
        let (status, stop) = send(
            &app,
            post(
                "/api/admin/stops/",
                json!({"name": name, "latitude": lat, "longitude": lng}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{stop}");
        stop_ids.push(stop["id"].as_i64().unwrap());
    }

    let (status, _) = send(
        &app,
        post(
            "/api/admin/routes/V-335E/stops/",
            json!({"bus_stop_id": stop_ids[0], "stop_order": 1, "distance_from_start": 0.0}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Offsets beyond the route length are rejected
    let (status, _) = send(
        &app,
        post(
            "/api/admin/routes/V-335E/stops/",
            json!({"bus_stop_id": stop_ids[1], "stop_order": 2, "distance_from_start": 30.0}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, stops) = send(
        &app,
        post(
            "/api/admin/routes/V-335E/stops/",
            json!({"bus_stop_id": stop_ids[1], "stop_order": 2, "distance_from_start": 25.0}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stops.as_array().unwrap().len(), 2);

    let (status, schedule) = send(
        &app,
        post(
            "/api/admin/schedules/",
            json!({"bus_id": "KA05G7777", "route_no": "V-335E", "departure_time": "18:45"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{schedule}");
    assert_eq!(schedule["available_seats"], 30);
    assert_eq!(schedule["departure_time"], "18:45");

    let (status, _) = send(
        &app,
        post(
            "/api/admin/schedules/",
            json!({"bus_id": "KA05G7777", "route_no": "V-335E", "departure_time": "19:00",
                   "available_seats": 31}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get()
        .uri("/api/available-buses/?from=Kempegowda&to=ITPL")
        .to_request();
    let (_, buses) = send(&app, req).await;
    assert_eq!(buses[0]["time"], "06:45 PM");
    assert_eq!(buses[0]["type"], "Electric");

    let schedule_id = schedule["id"].as_i64().unwrap();
    let req = test::TestRequest::delete()
        .uri(&format!("/api/admin/schedules/{schedule_id}/"))
        .insert_header(bearer(&admin))
        .to_request();
    assert_eq!(send(&app, req).await.0, StatusCode::OK);

    let req = test::TestRequest::delete()
        .uri("/api/admin/routes/V-335E/stops/2/")
        .insert_header(bearer(&admin))
        .to_request();
    assert_eq!(send(&app, req).await.0, StatusCode::OK);

    let req = test::TestRequest::delete()
        .uri("/api/admin/routes/V-335E/stops/2/")
        .insert_header(bearer(&admin))
        .to_request();
    assert_eq!(send(&app, req).await.0, StatusCode::NOT_FOUND);

    let req = test::TestRequest::get()
        .uri("/api/available-buses/?from=Kempegowda")
        .to_request();
    let (_, buses) = send(&app, req).await;
    assert!(buses.as_array().unwrap().is_empty());
}

#[actix_web::test]
async fn test_fleet_validation_and_duplicates() {
    let state = test_state().await;
    seed_fleet(&state).await;
    let app = test::init_service(create_app(state.clone())).await;
    let admin = admin_token(&state).await;

    let cases = [
        (
            "/api/admin/buses/",
            json!({"bus_id": "KA01F1234", "category": "AC", "capacity": 40}),
            StatusCode::CONFLICT,
        ),
        (
            "/api/admin/buses/",
            json!({"bus_id": "KA01F12345678", "category": "AC", "capacity": 40}),
            StatusCode::BAD_REQUEST,
        ),
        (
            "/api/admin/buses/",
            json!({"bus_id": "KA01X0001", "category": "AC", "capacity": 0}),
            StatusCode::BAD_REQUEST,
        ),
        (
            "/api/admin/routes/",
            json!({"route_no": "1A", "source": "A", "destination": "B", "distance": -1.0}),
            StatusCode::BAD_REQUEST,
        ),
        (
            "/api/admin/routes/",
            json!({"route_no": "1B", "source": "A", "destination": "B", "distance": 1e17}),
            StatusCode::BAD_REQUEST,
        ),
        (
            "/api/admin/stops/",
            json!({"name": "Pole", "latitude": 95.0, "longitude": 0.0}),
            StatusCode::BAD_REQUEST,
        ),
        (
            "/api/admin/schedules/",
            json!({"bus_id": "KA01F1234", "route_no": "500D", "departure_time": "25:99"}),
            StatusCode::BAD_REQUEST,
        ),
    ];
    for (uri, payload, expected) in cases {
        let req = test::TestRequest::post()
            .uri(uri)
            .insert_header(bearer(&admin))
            .set_json(&payload)
            .to_request();
        let (status, body) = send(&app, req).await;
        assert_eq!(status, expected, "{uri} {payload} -> {body}");
    }

    let req = test::TestRequest::delete()
        .uri("/api/admin/buses/KA00A0000/")
        .insert_header(bearer(&admin))
        .to_request();
    assert_eq!(send(&app, req).await.0, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_admin_endpoints_require_admin() {
    let state = test_state().await;
    seed_fleet(&state).await;
    let app = test::init_service(create_app(state.clone())).await;
    let passenger = passenger_token(&state, "curious").await;

    for uri in ["/api/admin/buses/", "/api/admin/bookings/", "/api/admin/lost-items/"] {
        let req = test::TestRequest::get()
            .uri(uri)
            .insert_header(bearer(&passenger))
            .to_request();
        assert_eq!(send(&app, req).await.0, StatusCode::FORBIDDEN, "{uri}");

        let req = test::TestRequest::get().uri(uri).to_request();
        assert_eq!(send(&app, req).await.0, StatusCode::UNAUTHORIZED, "{uri}");
    }
}

#[actix_web::test]
async fn test_admin_booking_listing() {
    let state = test_state().await;
    seed_fleet(&state).await;
    let app = test::init_service(create_app(state.clone())).await;
    let passenger = passenger_token(&state, "frequent").await;
    let admin = admin_token(&state).await;

    let first = online_booking(&state, &passenger, "500D", "Silk Board", "Majestic", 1).await;
    let second = online_booking(&state, &passenger, "KIAS-9", "Majestic", "Airport", 2).await;

    let req = test::TestRequest::get()
        .uri("/api/admin/bookings/")
        .insert_header(bearer(&admin))
        .to_request();
    let (status, page) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 2);
    assert_eq!(page["page"], 1);
    assert_eq!(page["items"][0]["id"], second.id);
    assert_eq!(page["items"][1]["id"], first.id);

    // Administrators can open any confirmation
    let req = test::TestRequest::get()
        .uri(&format!("/booking-confirmation/{}/", first.id))
        .insert_header(bearer(&admin))
        .to_request();
    assert_eq!(send(&app, req).await.0, StatusCode::OK);

    let req = test::TestRequest::get()
        .uri("/api/admin/bookings/?page=0")
        .insert_header(bearer(&admin))
        .to_request();
    assert_eq!(send(&app, req).await.0, StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get()
        .uri(&format!("/api/admin/bookings/?page={}", i64::MAX))
        .insert_header(bearer(&admin))
        .to_request();
    assert_eq!(send(&app, req).await.0, StatusCode::BAD_REQUEST);
}

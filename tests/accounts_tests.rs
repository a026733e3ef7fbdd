mod common;

use actix_web::{http::StatusCode, test};
use busline::create_app;
use common::{PASSWORD, bearer, conductor_token, passenger_token, send, test_state};
use serde_json::json;

fn signup_body(username: &str) -> serde_json::Value {
    json!({
        "username": username,
        "password": PASSWORD,
        "full_name": "Asha Rao",
        "age_group": "adult",
        "gender": "female",
        "mobile": "9876543210",
        "email": "asha@example.com",
    })
}

#[actix_web::test]
async fn test_signup_login_profile_logout() {
    let state = test_state().await;
    let app = test::init_service(create_app(state.clone())).await;

    let req = test::TestRequest::post()
        .uri("/signup/")
        .set_json(signup_body("asha"))
        .to_request();
    let (status, session) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK, "{session}");
    assert_eq!(session["role"], "passenger");

    let req = test::TestRequest::post()
        .uri("/login/")
        .set_json(json!({"username": "asha", "password": PASSWORD}))
        .to_request();
    let (status, session) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    let token = session["token"].as_str().unwrap().to_string();

    let req = test::TestRequest::get()
        .uri("/profile/")
        .insert_header(bearer(&token))
        .to_request();
    let (status, profile) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["username"], "asha");
    assert_eq!(profile["age_group"], "adult");
    assert_eq!(profile["mobile"], "9876543210");

    let req = test::TestRequest::post()
        .uri("/logout/")
        .insert_header(bearer(&token))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Logged out");

    let req = test::TestRequest::get()
        .uri("/profile/")
        .insert_header(bearer(&token))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_duplicate_username_conflicts() {
    let state = test_state().await;
    let app = test::init_service(create_app(state.clone())).await;
    passenger_token(&state, "taken").await;

    let req = test::TestRequest::post()
        .uri("/signup/")
        .set_json(signup_body("taken"))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[actix_web::test]
async fn test_signup_validation() {
    let state = test_state().await;
    let app = test::init_service(create_app(state.clone())).await;

    let mut weak = signup_body("weak");
    weak["password"] = json!("12345678901");
    let mut bad_mobile = signup_body("mobile");
    bad_mobile["mobile"] = json!("12345");
    let mut bad_email = signup_body("email");
    bad_email["email"] = json!("not-an-email");

    for payload in [weak, bad_mobile, bad_email] {
        let req = test::TestRequest::post()
            .uri("/signup/")
            .set_json(&payload)
            .to_request();
        let (status, _) = send(&app, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{payload}");
    }
}

#[actix_web::test]
async fn test_wrong_password_is_unauthorized() {
    let state = test_state().await;
    let app = test::init_service(create_app(state.clone())).await;
    passenger_token(&state, "careful").await;

    let req = test::TestRequest::post()
        .uri("/login/")
        .set_json(json!({"username": "careful", "password": "wrong-password"}))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid credentials");
}

#[actix_web::test]
async fn test_conductor_accounts() {
    let state = test_state().await;
    let app = test::init_service(create_app(state.clone())).await;

    let req = test::TestRequest::post()
        .uri("/conductor/signup/")
        .set_json(json!({
            "full_name": "Ravi Kumar",
            "email": "ravi@example.com",
            "password": PASSWORD,
            "confirm_password": "something-else",
        }))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (employee_id, token) = conductor_token(&state, "ravi@example.com").await;
    assert!(employee_id.starts_with("EMP"));

    let req = test::TestRequest::get()
        .uri("/profile/")
        .insert_header(bearer(&token))
        .to_request();
    let (status, profile) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["role"], "conductor");
    assert_eq!(profile["employee_id"], employee_id.as_str());

    // Conductors sign in by employee id only
    let req = test::TestRequest::post()
        .uri("/login/")
        .set_json(json!({"username": "ravi@example.com", "password": PASSWORD}))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::post()
        .uri("/conductor/login/")
        .set_json(json!({"employee_id": employee_id, "password": "wrong-password"}))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_garbage_token_is_unauthorized() {
    let state = test_state().await;
    let app = test::init_service(create_app(state.clone())).await;

    let req = test::TestRequest::get()
        .uri("/my-bookings/")
        .insert_header(bearer("not-a-session"))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

//! Shared fixtures: an in-memory service with a small seeded fleet and
//! helpers to obtain session tokens.
#![allow(dead_code)]

use actix_web::{
    body::MessageBody,
    dev::{Service, ServiceResponse},
    http::{StatusCode, header},
    test,
};
use busline::{
    AppConfig, AppState, Database,
    config::AdminConfig,
    ensure_admin,
    models::{
        AgeGroup, BookingView, ConductorLoginRequest, ConductorSignupRequest, CreateOrderRequest,
        Gender, NewBus, NewBusStop, NewRoute, NewRouteStop, PaymentSuccessRequest, SignupRequest,
    },
    services::{accounts, booking},
};
use chrono::{NaiveTime, Utc};
use serde_json::Value;

pub const PASSWORD: &str = "s3cret-pass";
pub const ADMIN_PASSWORD: &str = "admin-pass-123";

/// Ids of the seeded departures
pub struct Fleet {
    /// 500D at 08:00 on KA01F1234 (AC, 40 seats)
    pub morning: i64,
    /// 500D at 07:30 on KA01F5678 (Non-AC, 2 seats)
    pub early: i64,
    /// KIAS-9 at 09:15 on KA01F1234
    pub airport: i64,
}

/// Application state over a fresh in-memory database with default settings
pub async fn test_state() -> AppState {
    test_state_with(AppConfig::default()).await
}

pub async fn test_state_with(config: AppConfig) -> AppState {
    let db = Database::in_memory().await.expect("in-memory database");
    AppState::new(config, db).expect("application state")
}

/// Seeds two routes.
///
/// 500D Silk Board (0 km) -> Majestic (10) -> Mekhri Circle (30) -> Hebbal (40)
/// KIAS-9 Majestic (0 km) -> Airport (35)
pub async fn seed_fleet(state: &AppState) -> Fleet {
    let db = &state.db;
    let big = db
        .create_bus(&NewBus {
            bus_id: "KA01F1234".into(),
            category: "AC".into(),
            capacity: 40,
        })
        .await
        .unwrap();
    let small = db
        .create_bus(&NewBus {
            bus_id: "KA01F5678".into(),
            category: "Non-AC".into(),
            capacity: 2,
        })
        .await
        .unwrap();

    let city = db
        .create_route(&NewRoute {
            route_no: "500D".into(),
            source: "Silk Board".into(),
            destination: "Hebbal".into(),
            distance: 40.0,
        })
        .await
        .unwrap();
    let airport = db
        .create_route(&NewRoute {
            route_no: "KIAS-9".into(),
            source: "Majestic".into(),
            destination: "Airport".into(),
            distance: 35.0,
        })
        .await
        .unwrap();

    let mut stop_ids = Vec::new();
    for (name, lat, lng) in [
        ("Silk Board", 12.917, 77.623),
        ("Majestic", 12.977, 77.571),
        ("Mekhri Circle", 13.014, 77.583),
        ("Hebbal", 13.035, 77.597),
        ("Airport", 13.199, 77.706),
    ] {
        let stop = db
            .create_stop(&NewBusStop {
                name: name.into(),
                latitude: lat,
                longitude: lng,
            })
            .await
            .unwrap();
        stop_ids.push(stop.id);
    }

    let city_stops = [(0, 0.0), (1, 10.0), (2, 30.0), (3, 40.0)];
    for (order, (stop, km)) in city_stops.into_iter().enumerate() {
        db.add_route_stop(
            city.id,
            &NewRouteStop {
                bus_stop_id: stop_ids[stop],
                stop_order: order as i64 + 1,
                distance_from_start: km,
            },
        )
        .await
        .unwrap();
    }
    for (order, (stop, km)) in [(1, 0.0), (4, 35.0)].into_iter().enumerate() {
        db.add_route_stop(
            airport.id,
            &NewRouteStop {
                bus_stop_id: stop_ids[stop],
                stop_order: order as i64 + 1,
                distance_from_start: km,
            },
        )
        .await
        .unwrap();
    }

    let at = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap();
    let morning = db.create_schedule(big.id, city.id, at(8, 0), 40).await.unwrap();
    let early = db.create_schedule(small.id, city.id, at(7, 30), 2).await.unwrap();
    let airport_run = db
        .create_schedule(big.id, airport.id, at(9, 15), 40)
        .await
        .unwrap();

    Fleet {
        morning: morning.id,
        early: early.id,
        airport: airport_run.id,
    }
}

pub fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {token}"))
}

/// Calls the service and decodes the body as JSON (`Null` when it is not)
pub async fn send<S, R, B>(app: &S, req: R) -> (StatusCode, Value)
where
    S: Service<R, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let body = test::read_body(resp).await;
    (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
}

/// Registers a passenger and returns their session token
pub async fn passenger_token(state: &AppState, username: &str) -> String {
    let req = test::TestRequest::default().to_http_request();
    let signup = SignupRequest {
        username: username.to_string(),
        password: PASSWORD.to_string(),
        full_name: "Test Passenger".to_string(),
        age_group: AgeGroup::Adult,
        gender: Gender::PreferNotToSay,
        mobile: "9876543210".to_string(),
        email: None,
    };
    accounts::signup_passenger(&req, state, &signup)
        .await
        .expect("passenger signup")
        .token
}

/// Registers a conductor, logs in by employee id and returns
/// `(employee_id, token)`
pub async fn conductor_token(state: &AppState, email: &str) -> (String, String) {
    let req = test::TestRequest::default().to_http_request();
    let signup = ConductorSignupRequest {
        full_name: "Test Conductor".to_string(),
        email: email.to_string(),
        password: PASSWORD.to_string(),
        confirm_password: PASSWORD.to_string(),
        contact_number: Some("9123456780".to_string()),
        license_number: Some("DL-0420110012345".to_string()),
    };
    let created = accounts::signup_conductor(&req, state, &signup)
        .await
        .expect("conductor signup");

    let login = ConductorLoginRequest {
        employee_id: created.employee_id.clone(),
        password: PASSWORD.to_string(),
    };
    let session = accounts::login_conductor(&req, state, &login)
        .await
        .expect("conductor login");
    (created.employee_id, session.token)
}

/// Bootstraps the administrator and returns its session token
pub async fn admin_token(state: &AppState) -> String {
    let config = AdminConfig {
        username: "admin".into(),
        password: Some(ADMIN_PASSWORD.into()),
    };
    ensure_admin(&state.db, &config).await.expect("admin bootstrap");

    let req = test::TestRequest::default().to_http_request();
    accounts::login(&req, state, "admin", ADMIN_PASSWORD)
        .await
        .expect("admin login")
        .token
}

/// Pays for an online ticket through the offline gateway and returns the
/// booking with its QR payload
pub async fn online_booking(
    state: &AppState,
    token: &str,
    route_no: &str,
    from: &str,
    to: &str,
    seats: i64,
) -> BookingView {
    let principal = state
        .db
        .find_principal(token, Utc::now())
        .await
        .unwrap()
        .expect("live session");
    let req = test::TestRequest::default().to_http_request();

    let order = booking::create_order(
        &req,
        state,
        &principal,
        &CreateOrderRequest {
            route_no: route_no.to_string(),
            from: from.to_string(),
            to: to.to_string(),
            seats: Some(seats),
            schedule_id: None,
        },
    )
    .await
    .expect("order created");

    let payment_id = format!("pay_{}", order.receipt);
    let signature = state
        .payments
        .checkout_signature(&order.id, &payment_id)
        .unwrap();
    let paid = booking::confirm_payment(
        &req,
        state,
        &principal,
        &PaymentSuccessRequest {
            order_id: order.id,
            payment_id,
            signature,
        },
    )
    .await
    .expect("payment confirmed");

    booking::booking_confirmation(state, &principal, paid.booking_id)
        .await
        .expect("booking visible to its owner")
}

//! OpenAPI specification generation and app factory.

use crate::{
    error::AppError,
    handlers::{accounts, booking, conductor, fleet, health, metrics, reports, tracking, version},
    middleware::{MetricsMiddleware, RequestIdMiddleware, SecurityHeaders},
    state::AppState,
};
use actix_web::{App, ResponseError, error::InternalError};
use paperclip::actix::{OpenApiExt, web};
use paperclip::v2::models::{DefaultApiRaw, Info};

/// Creates the shared OpenAPI specification for the API
///
/// Documents the bearer session scheme, the signed ticket payload and the
/// optional device signature for location updates.
pub fn create_openapi_spec() -> DefaultApiRaw {
    DefaultApiRaw {
        info: Info {
            title: "Busline API".into(),
            version: crate::build_info::VERSION.into(),
            description: Some(
                "Bus ticketing and fleet operations: route search, online booking with payment, \
                on-board cash sales, single-use ticket validation, live tracking, complaints and \
                lost-and-found.\n\n\
                ## Sessions\n\
                `POST /login/` (passengers, administrators) and `POST /conductor/login/` \
                (conductors, by employee id) return a token. Send it as \
                `Authorization: Bearer <token>`.\n\
                \n\
                ## Tickets\n\
                Every booking carries a signed QR payload `BT1.<booking_id>.<signature>`. \
                Conductors scan it with `/conductor/verify-ticket/?data=<payload>`; a ticket \
                is accepted once.\n\
                \n\
                ## Money\n\
                Amounts are decimal strings with two places; gateway orders use minor units \
                (paise).\n\
                \n\
                ## Device signatures\n\
                With `HMAC_REQUIRE_SIGNATURE=true`, `/api/update-location/` requires \
                `X-Signature` (hex HMAC-SHA256 of `{timestamp}.{body}` under `HMAC_SECRET`) and \
                `X-Timestamp` (Unix seconds, within `HMAC_TIMESTAMP_TOLERANCE`)."
                    .into(),
            ),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Malformed JSON bodies and query strings answer with the service's error
/// body instead of actix's plain text
fn json_config() -> actix_web::web::JsonConfig {
    actix_web::web::JsonConfig::default().error_handler(|err, _req| {
        let message = err.to_string();
        InternalError::from_response(err, AppError::validation("body", message).error_response())
            .into()
    })
}

fn query_config() -> actix_web::web::QueryConfig {
    actix_web::web::QueryConfig::default().error_handler(|err, _req| {
        let message = err.to_string();
        InternalError::from_response(err, AppError::validation("query", message).error_response())
            .into()
    })
}

/// Builds the application around shared state
///
/// Used by `main` for every worker and by the integration tests. Wires:
/// - security headers, request ids and request metrics
/// - passenger accounts and the booking flow
/// - conductor operations and ticket validation
/// - tracking, reports and fleet administration
/// - health, version, metrics and the OpenAPI document at `/api/spec/v2`
pub fn create_app(
    state: AppState,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let security = state.config.security.clone();
    let app_metrics = state.metrics.clone();

    App::new()
        .wrap(SecurityHeaders::new(security))
        .wrap(RequestIdMiddleware)
        .wrap(MetricsMiddleware)
        .wrap_api_with_spec(create_openapi_spec())
        .app_data(web::Data::new(state))
        .app_data(web::Data::new(app_metrics))
        .app_data(json_config())
        .app_data(query_config())
        // Service endpoints
        .service(web::resource("/api/health").route(web::get().to(health::health)))
        .service(web::resource("/api/version").route(web::get().to(version::version)))
        .service(web::resource("/api/metrics").route(web::get().to(metrics::get_metrics)))
        // Accounts
        .service(web::resource("/signup/").route(web::post().to(accounts::signup)))
        .service(web::resource("/login/").route(web::post().to(accounts::login)))
        .service(web::resource("/logout/").route(web::post().to(accounts::logout)))
        .service(web::resource("/profile/").route(web::get().to(accounts::profile)))
        .service(
            web::resource("/conductor/signup/").route(web::post().to(accounts::conductor_signup)),
        )
        .service(
            web::resource("/conductor/login/").route(web::post().to(accounts::conductor_login)),
        )
        // Public fleet reads
        .service(web::resource("/api/routes/").route(web::get().to(fleet::routes)))
        .service(web::resource("/api/stops/").route(web::get().to(fleet::stops)))
        .service(web::resource("/api/stops/{route_no}/").route(web::get().to(fleet::route_stops)))
        .service(
            web::resource("/api/available-buses/").route(web::get().to(fleet::available_buses)),
        )
        // Booking flow
        .service(web::resource("/book-ticket/").route(web::get().to(booking::book_ticket)))
        .service(web::resource("/create-order/").route(web::post().to(booking::create_order)))
        .service(
            web::resource("/payment-success/").route(web::post().to(booking::payment_success)),
        )
        .service(
            web::resource("/booking-confirmation/{id}/")
                .route(web::get().to(booking::booking_confirmation)),
        )
        .service(web::resource("/my-bookings/").route(web::get().to(booking::my_bookings)))
        .service(
            web::resource("/api/recent-bookings/").route(web::get().to(booking::recent_bookings)),
        )
        // Conductor operations
        .service(
            web::resource("/conductor/verify-ticket/")
                .route(web::get().to(conductor::verify_ticket))
                .route(web::post().to(conductor::verify_ticket)),
        )
        .service(
            web::resource("/conductor/manual-booking/")
                .route(web::post().to(conductor::manual_booking)),
        )
        .service(
            web::resource("/conductor/ticket-success/{id}/")
                .route(web::get().to(conductor::ticket_success)),
        )
        .service(
            web::resource("/conductor/todays-bookings/")
                .route(web::get().to(conductor::todays_bookings)),
        )
        .service(
            web::resource("/conductor/booking-analysis/")
                .route(web::get().to(conductor::booking_analysis)),
        )
        .service(
            web::resource("/conductor/trip/start/").route(web::post().to(conductor::start_trip)),
        )
        .service(web::resource("/conductor/trip/end/").route(web::post().to(conductor::end_trip)))
        .service(
            web::resource("/conductor/daily-report/")
                .route(web::post().to(conductor::daily_report)),
        )
        .service(
            web::resource("/conductor/api/routes/").route(web::get().to(fleet::conductor_routes)),
        )
        .service(
            web::resource("/conductor/api/stops/").route(web::get().to(fleet::conductor_stops)),
        )
        // Tracking
        .service(
            web::resource("/api/update-location/").route(web::post().to(tracking::update_location)),
        )
        .service(
            web::resource("/api/bus_locations/").route(web::get().to(tracking::bus_locations)),
        )
        .service(
            web::resource("/api/bus_locations/{bus_id}/")
                .route(web::get().to(tracking::bus_location)),
        )
        .service(web::resource("/track/{bus_id}/").route(web::get().to(tracking::track_bus)))
        // Reports
        .service(
            web::resource("/complaint/report/").route(web::post().to(reports::report_complaint)),
        )
        .service(
            web::resource("/complaint/{id}/").route(web::get().to(reports::complaint_confirmation)),
        )
        .service(
            web::resource("/lost-and-found/report/")
                .route(web::post().to(reports::report_lost_item)),
        )
        .service(
            web::resource("/lost-and-found/{id}/")
                .route(web::get().to(reports::lost_item_confirmation)),
        )
        // Administration
        .service(
            web::resource("/api/admin/buses/")
                .route(web::get().to(fleet::list_buses))
                .route(web::post().to(fleet::create_bus)),
        )
        .service(
            web::resource("/api/admin/buses/{bus_id}/").route(web::delete().to(fleet::delete_bus)),
        )
        .service(
            web::resource("/api/admin/routes/")
                .route(web::get().to(fleet::list_routes))
                .route(web::post().to(fleet::create_route)),
        )
        .service(
            web::resource("/api/admin/routes/{route_no}/")
                .route(web::delete().to(fleet::delete_route)),
        )
        .service(
            web::resource("/api/admin/routes/{route_no}/stops/")
                .route(web::post().to(fleet::add_route_stop)),
        )
        .service(
            web::resource("/api/admin/routes/{route_no}/stops/{stop_order}/")
                .route(web::delete().to(fleet::remove_route_stop)),
        )
        .service(
            web::resource("/api/admin/stops/")
                .route(web::get().to(fleet::list_bus_stops))
                .route(web::post().to(fleet::create_stop)),
        )
        .service(
            web::resource("/api/admin/schedules/")
                .route(web::get().to(fleet::list_schedules))
                .route(web::post().to(fleet::create_schedule)),
        )
        .service(
            web::resource("/api/admin/schedules/{id}/")
                .route(web::delete().to(fleet::delete_schedule)),
        )
        .service(web::resource("/api/admin/bookings/").route(web::get().to(booking::list_bookings)))
        .service(
            web::resource("/api/admin/complaints/").route(web::get().to(reports::list_complaints)),
        )
        .service(
            web::resource("/api/admin/complaints/{id}/status/")
                .route(web::put().to(reports::update_complaint_status)),
        )
        .service(
            web::resource("/api/admin/lost-items/").route(web::get().to(reports::list_lost_items)),
        )
        .service(
            web::resource("/api/admin/lost-items/{id}/status/")
                .route(web::put().to(reports::update_lost_item_status)),
        )
        .with_json_spec_at("/api/spec/v2")
        .build()
}

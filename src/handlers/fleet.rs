//! Public route lookups, availability search and fleet administration.

use crate::{
    models::{
        AvailabilityQuery, AvailableBus, Bus, BusStop, MessageResponse, NewBus, NewBusStop,
        NewRoute, NewRouteStop, NewSchedule, Role, RouteDistance, RouteStopPath, RouteStopView,
        RouteSummary, RouteView, ScheduleView, StopSummary,
    },
    services::{auth, availability, fleet},
    state::AppState,
};
use actix_web::{Error, HttpRequest, HttpResponse, Result};
use paperclip::actix::{api_v2_operation, web};
use serde_json::json;

/// Buses running between two stops
///
/// Without `to` every departure calling at `from` is listed, running to the
/// route terminus. `after` keeps departures at or after the given time.
#[api_v2_operation(
    summary = "Available Buses",
    description = "Scheduled departures from one stop to another, ordered by departure time",
    tags("Fleet"),
    responses(
        (status = 200, description = "Matching departures"),
        (status = 400, description = "Missing 'from' or invalid 'after'")
    )
)]
pub async fn available_buses(
    state: web::Data<AppState>,
    query: web::Query<AvailabilityQuery>,
) -> Result<HttpResponse, Error> {
    let Some(from) = query.from.as_deref().map(str::trim).filter(|f| !f.is_empty()) else {
        return Ok(HttpResponse::BadRequest().json(json!({"error": "Missing 'from' parameter"})));
    };
    let buses: Vec<AvailableBus> = availability::available_buses(
        &state.db,
        from,
        query.to.as_deref(),
        query.after.as_deref(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(buses))
}

#[api_v2_operation(
    summary = "Routes",
    description = "Every route with its end points",
    tags("Fleet"),
    responses((status = 200, description = "Routes"))
)]
pub async fn routes(state: web::Data<AppState>) -> Result<web::Json<Vec<RouteSummary>>, Error> {
    Ok(web::Json(state.db.route_summaries().await?))
}

#[api_v2_operation(
    summary = "Stops",
    description = "Every bus stop",
    tags("Fleet"),
    responses((status = 200, description = "Stops"))
)]
pub async fn stops(state: web::Data<AppState>) -> Result<web::Json<Vec<StopSummary>>, Error> {
    Ok(web::Json(state.db.list_stops().await?))
}

#[api_v2_operation(
    summary = "Route Stops",
    description = "Stops of one route in travel order",
    tags("Fleet"),
    responses(
        (status = 200, description = "Ordered stops"),
        (status = 404, description = "Unknown route")
    )
)]
pub async fn route_stops(
    state: web::Data<AppState>,
    route_no: web::Path<String>,
) -> Result<web::Json<Vec<RouteStopView>>, Error> {
    Ok(web::Json(fleet::stops_for_route(&state, &route_no).await?))
}

/// Route numbers and lengths for the manual booking form
#[api_v2_operation(
    summary = "Conductor Routes",
    description = "Route numbers with their distance",
    tags("Conductor"),
    responses(
        (status = 200, description = "Routes"),
        (status = 403, description = "Not a conductor")
    )
)]
pub async fn conductor_routes(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<web::Json<Vec<RouteDistance>>, Error> {
    auth::authorize_conductor(&req, &state).await?;
    Ok(web::Json(state.db.route_distances().await?))
}

#[api_v2_operation(
    summary = "Conductor Stops",
    description = "Bus stops for the manual booking form",
    tags("Conductor"),
    responses(
        (status = 200, description = "Stops"),
        (status = 403, description = "Not a conductor")
    )
)]
pub async fn conductor_stops(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<web::Json<Vec<StopSummary>>, Error> {
    auth::authorize_conductor(&req, &state).await?;
    Ok(web::Json(state.db.list_stops().await?))
}

#[api_v2_operation(
    summary = "List Buses",
    tags("Admin"),
    responses((status = 200, description = "Fleet"))
)]
pub async fn list_buses(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<web::Json<Vec<Bus>>, Error> {
    auth::authorize(&req, &state, &[Role::Admin]).await?;
    Ok(web::Json(state.db.list_buses().await?))
}

#[api_v2_operation(
    summary = "Register Bus",
    tags("Admin"),
    responses(
        (status = 200, description = "Bus registered", body = Bus),
        (status = 400, description = "Invalid bus"),
        (status = 409, description = "Bus id already used")
    )
)]
pub async fn create_bus(
    req: HttpRequest,
    state: web::Data<AppState>,
    payload: web::Json<NewBus>,
) -> Result<web::Json<Bus>, Error> {
    auth::authorize(&req, &state, &[Role::Admin]).await?;
    Ok(web::Json(fleet::create_bus(&state, &payload).await?))
}

#[api_v2_operation(
    summary = "Delete Bus",
    tags("Admin"),
    responses(
        (status = 200, description = "Bus removed", body = MessageResponse),
        (status = 404, description = "Unknown bus")
    )
)]
pub async fn delete_bus(
    req: HttpRequest,
    state: web::Data<AppState>,
    bus_id: web::Path<String>,
) -> Result<web::Json<MessageResponse>, Error> {
    auth::authorize(&req, &state, &[Role::Admin]).await?;
    fleet::delete_bus(&state, &bus_id).await?;
    Ok(web::Json(MessageResponse::new("Bus deleted")))
}

#[api_v2_operation(
    summary = "List Routes",
    tags("Admin"),
    responses((status = 200, description = "Routes"))
)]
pub async fn list_routes(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<web::Json<Vec<RouteView>>, Error> {
    auth::authorize(&req, &state, &[Role::Admin]).await?;
    Ok(web::Json(fleet::list_routes(&state).await?))
}

#[api_v2_operation(
    summary = "Create Route",
    tags("Admin"),
    responses(
        (status = 200, description = "Route created", body = RouteView),
        (status = 400, description = "Invalid route"),
        (status = 409, description = "Route number already used")
    )
)]
pub async fn create_route(
    req: HttpRequest,
    state: web::Data<AppState>,
    payload: web::Json<NewRoute>,
) -> Result<web::Json<RouteView>, Error> {
    auth::authorize(&req, &state, &[Role::Admin]).await?;
    Ok(web::Json(fleet::create_route(&state, &payload).await?))
}

#[api_v2_operation(
    summary = "Delete Route",
    tags("Admin"),
    responses(
        (status = 200, description = "Route removed", body = MessageResponse),
        (status = 404, description = "Unknown route")
    )
)]
pub async fn delete_route(
    req: HttpRequest,
    state: web::Data<AppState>,
    route_no: web::Path<String>,
) -> Result<web::Json<MessageResponse>, Error> {
    auth::authorize(&req, &state, &[Role::Admin]).await?;
    fleet::delete_route(&state, &route_no).await?;
    Ok(web::Json(MessageResponse::new("Route deleted")))
}

#[api_v2_operation(
    summary = "Add Route Stop",
    description = "Place a bus stop on a route; returns the route's stops",
    tags("Admin"),
    responses(
        (status = 200, description = "Ordered stops"),
        (status = 400, description = "Invalid order or offset"),
        (status = 409, description = "Stop order already used on this route")
    )
)]
pub async fn add_route_stop(
    req: HttpRequest,
    state: web::Data<AppState>,
    route_no: web::Path<String>,
    payload: web::Json<NewRouteStop>,
) -> Result<web::Json<Vec<RouteStopView>>, Error> {
    auth::authorize(&req, &state, &[Role::Admin]).await?;
    Ok(web::Json(
        fleet::add_route_stop(&state, &route_no, &payload).await?,
    ))
}

#[api_v2_operation(
    summary = "Remove Route Stop",
    tags("Admin"),
    responses(
        (status = 200, description = "Stop removed", body = MessageResponse),
        (status = 404, description = "No stop at this position")
    )
)]
pub async fn remove_route_stop(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<RouteStopPath>,
) -> Result<web::Json<MessageResponse>, Error> {
    auth::authorize(&req, &state, &[Role::Admin]).await?;
    fleet::remove_route_stop(&state, &path.route_no, path.stop_order).await?;
    Ok(web::Json(MessageResponse::new("Stop removed from route")))
}

#[api_v2_operation(
    summary = "List Bus Stops",
    tags("Admin"),
    responses((status = 200, description = "Stops with coordinates"))
)]
pub async fn list_bus_stops(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<web::Json<Vec<BusStop>>, Error> {
    auth::authorize(&req, &state, &[Role::Admin]).await?;
    Ok(web::Json(state.db.list_bus_stops().await?))
}

#[api_v2_operation(
    summary = "Create Bus Stop",
    tags("Admin"),
    responses(
        (status = 200, description = "Stop created", body = BusStop),
        (status = 400, description = "Invalid coordinates")
    )
)]
pub async fn create_stop(
    req: HttpRequest,
    state: web::Data<AppState>,
    payload: web::Json<NewBusStop>,
) -> Result<web::Json<BusStop>, Error> {
    auth::authorize(&req, &state, &[Role::Admin]).await?;
    Ok(web::Json(fleet::create_stop(&state, &payload).await?))
}

#[api_v2_operation(
    summary = "List Schedules",
    tags("Admin"),
    responses((status = 200, description = "Schedules"))
)]
pub async fn list_schedules(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<web::Json<Vec<ScheduleView>>, Error> {
    auth::authorize(&req, &state, &[Role::Admin]).await?;
    Ok(web::Json(fleet::list_schedules(&state).await?))
}

#[api_v2_operation(
    summary = "Create Schedule",
    description = "Schedule a departure; seats default to the bus capacity",
    tags("Admin"),
    responses(
        (status = 200, description = "Schedule created", body = ScheduleView),
        (status = 400, description = "Invalid time or seats"),
        (status = 409, description = "Bus already departs on this route at this time")
    )
)]
pub async fn create_schedule(
    req: HttpRequest,
    state: web::Data<AppState>,
    payload: web::Json<NewSchedule>,
) -> Result<web::Json<ScheduleView>, Error> {
    auth::authorize(&req, &state, &[Role::Admin]).await?;
    Ok(web::Json(fleet::create_schedule(&state, &payload).await?))
}

#[api_v2_operation(
    summary = "Delete Schedule",
    tags("Admin"),
    responses(
        (status = 200, description = "Schedule removed", body = MessageResponse),
        (status = 404, description = "Unknown schedule")
    )
)]
pub async fn delete_schedule(
    req: HttpRequest,
    state: web::Data<AppState>,
    schedule_id: web::Path<i64>,
) -> Result<web::Json<MessageResponse>, Error> {
    auth::authorize(&req, &state, &[Role::Admin]).await?;
    fleet::delete_schedule(&state, schedule_id.into_inner()).await?;
    Ok(web::Json(MessageResponse::new("Schedule deleted")))
}

//! Fleet administration and the public route lookups.

use crate::{
    error::{AppError, Result},
    models::{
        Bus, BusStop, NewBus, NewBusStop, NewRoute, NewRouteStop, NewSchedule, Route,
        RouteStopView, RouteView, ScheduleView, format_paise,
    },
    services::availability::parse_clock_time,
    state::AppState,
    utils::validate::{is_valid_latitude, is_valid_longitude},
};
use tracing::info;

/// Longest fleet code accepted for a bus
pub const MAX_BUS_CODE_LEN: usize = 10;

fn trimmed<'a>(field: &str, value: &'a str) -> Result<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::validation(field, "is required"));
    }
    Ok(value)
}

pub fn validate_bus(bus: &NewBus) -> Result<NewBus> {
    let bus_id = trimmed("bus_id", &bus.bus_id)?;
    if bus_id.chars().count() > MAX_BUS_CODE_LEN {
        return Err(AppError::validation(
            "bus_id",
            format!("must be at most {MAX_BUS_CODE_LEN} characters"),
        ));
    }
    if bus.capacity <= 0 {
        return Err(AppError::validation("capacity", "must be positive"));
    }
    Ok(NewBus {
        bus_id: bus_id.to_string(),
        category: trimmed("category", &bus.category)?.to_string(),
        capacity: bus.capacity,
    })
}

/// Longest route accepted, in km
pub const MAX_ROUTE_KM: f64 = 10_000.0;

pub fn validate_route(route: &NewRoute) -> Result<NewRoute> {
    if !route.distance.is_finite() || route.distance <= 0.0 {
        return Err(AppError::validation("distance", "must be a positive number of km"));
    }
    if route.distance > MAX_ROUTE_KM {
        return Err(AppError::validation(
            "distance",
            format!("must not exceed {MAX_ROUTE_KM} km"),
        ));
    }
    Ok(NewRoute {
        route_no: trimmed("route_no", &route.route_no)?.to_string(),
        source: trimmed("source", &route.source)?.to_string(),
        destination: trimmed("destination", &route.destination)?.to_string(),
        distance: route.distance,
    })
}

pub fn validate_stop(stop: &NewBusStop) -> Result<NewBusStop> {
    if !is_valid_latitude(stop.latitude) {
        return Err(AppError::validation("latitude", "must be within -90..=90"));
    }
    if !is_valid_longitude(stop.longitude) {
        return Err(AppError::validation("longitude", "must be within -180..=180"));
    }
    Ok(NewBusStop {
        name: trimmed("name", &stop.name)?.to_string(),
        latitude: stop.latitude,
        longitude: stop.longitude,
    })
}

pub async fn create_bus(state: &AppState, bus: &NewBus) -> Result<Bus> {
    let bus = state.db.create_bus(&validate_bus(bus)?).await?;
    info!(bus_id = %bus.bus_id, capacity = bus.capacity, "Bus registered");
    Ok(bus)
}

fn route_view(state: &AppState, route: Route) -> RouteView {
    RouteView {
        fare: format_paise(state.fares.route_fare_paise(route.distance)),
        id: route.id,
        route_no: route.route_no,
        source: route.source,
        destination: route.destination,
        distance: route.distance,
    }
}

pub async fn create_route(state: &AppState, route: &NewRoute) -> Result<RouteView> {
    let route = state.db.create_route(&validate_route(route)?).await?;
    info!(route_no = %route.route_no, "Route created");
    Ok(route_view(state, route))
}

pub async fn list_routes(state: &AppState) -> Result<Vec<RouteView>> {
    let routes = state.db.list_routes().await?;
    Ok(routes.into_iter().map(|r| route_view(state, r)).collect())
}

pub async fn create_stop(state: &AppState, stop: &NewBusStop) -> Result<BusStop> {
    state.db.create_stop(&validate_stop(stop)?).await
}

/// Places a stop on a route. Offsets must lie within the route length.
pub async fn add_route_stop(
    state: &AppState,
    route_no: &str,
    stop: &NewRouteStop,
) -> Result<Vec<RouteStopView>> {
    let route = state.db.require_route(route_no.trim()).await?;
    if state.db.find_stop(stop.bus_stop_id).await?.is_none() {
        return Err(AppError::not_found("Bus stop", stop.bus_stop_id));
    }
    if stop.stop_order < 1 {
        return Err(AppError::validation("stop_order", "must be 1 or more"));
    }
    if !stop.distance_from_start.is_finite()
        || stop.distance_from_start < 0.0
        || stop.distance_from_start > route.distance
    {
        return Err(AppError::validation(
            "distance_from_start",
            format!("must be within 0..={} km", route.distance),
        ));
    }

    state.db.add_route_stop(route.id, stop).await?;
    state.db.route_stops(route.id).await
}

pub async fn remove_route_stop(state: &AppState, route_no: &str, stop_order: i64) -> Result<()> {
    let route = state.db.require_route(route_no.trim()).await?;
    if !state.db.remove_route_stop(route.id, stop_order).await? {
        return Err(AppError::not_found(
            "Route stop",
            format!("{}#{stop_order}", route.route_no),
        ));
    }
    Ok(())
}

/// Schedules a departure. Seats default to the bus capacity and may not
/// exceed it.
pub async fn create_schedule(state: &AppState, schedule: &NewSchedule) -> Result<ScheduleView> {
    let bus = state.db.require_bus(schedule.bus_id.trim()).await?;
    let route = state.db.require_route(schedule.route_no.trim()).await?;
    let departure = parse_clock_time(&schedule.departure_time).ok_or_else(|| {
        AppError::validation("departure_time", "expected HH:MM or HH:MM:SS")
    })?;

    let seats = schedule.available_seats.unwrap_or(bus.capacity);
    if seats < 0 || seats > bus.capacity {
        return Err(AppError::validation(
            "available_seats",
            format!("must be within 0..={}", bus.capacity),
        ));
    }

    let detail = state
        .db
        .create_schedule(bus.id, route.id, departure, seats)
        .await?;
    info!(
        schedule_id = detail.id,
        bus_id = %bus.bus_id,
        route_no = %route.route_no,
        "Schedule created"
    );
    Ok(ScheduleView::from(&detail))
}

pub async fn list_schedules(state: &AppState) -> Result<Vec<ScheduleView>> {
    let schedules = state.db.list_schedules().await?;
    Ok(schedules.iter().map(ScheduleView::from).collect())
}

/// Ordered stops of a route, for the booking form
pub async fn stops_for_route(state: &AppState, route_no: &str) -> Result<Vec<RouteStopView>> {
    let route = state.db.require_route(route_no.trim()).await?;
    state.db.route_stops(route.id).await
}

pub async fn delete_bus(state: &AppState, bus_code: &str) -> Result<()> {
    if !state.db.delete_bus(bus_code.trim()).await? {
        return Err(AppError::not_found("Bus", bus_code));
    }
    Ok(())
}

pub async fn delete_route(state: &AppState, route_no: &str) -> Result<()> {
    if !state.db.delete_route(route_no.trim()).await? {
        return Err(AppError::not_found("Route", route_no));
    }
    Ok(())
}

pub async fn delete_schedule(state: &AppState, schedule_id: i64) -> Result<()> {
    if !state.db.delete_schedule(schedule_id).await? {
        return Err(AppError::not_found("Schedule", schedule_id));
    }
    Ok(())
}

//! Buses, routes, stops and schedules.

use chrono::NaiveTime;
use paperclip::actix::Apiv2Schema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, Apiv2Schema)]
pub struct Bus {
    pub id: i64,
    /// Fleet identifier painted on the bus, e.g. "KA01F1234"
    pub bus_id: String,
    /// e.g. AC, Non-AC
    pub category: String,
    pub capacity: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, Apiv2Schema)]
pub struct Route {
    pub id: i64,
    pub route_no: String,
    pub source: String,
    pub destination: String,
    /// Kilometres end to end
    pub distance: f64,
}

/// Route as shown to administrators, with its end-to-end fare
#[derive(Debug, Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct RouteView {
    pub id: i64,
    pub route_no: String,
    pub source: String,
    pub destination: String,
    pub distance: f64,
    /// `distance x rate`, before the per-seat minimum
    pub fare: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, Apiv2Schema)]
pub struct BusStop {
    pub id: i64,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// A stop on a route, joined with the stop name. Always handled in
/// `stop_order`.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, Apiv2Schema)]
pub struct RouteStopView {
    /// Bus stop id
    pub id: i64,
    pub name: String,
    pub stop_order: i64,
    pub distance_from_start: f64,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Schedule {
    pub id: i64,
    pub bus_id: i64,
    pub route_id: i64,
    pub departure_time: NaiveTime,
    pub available_seats: i64,
}

/// Schedule joined with the bus and route it runs
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ScheduleDetail {
    pub id: i64,
    pub route_id: i64,
    pub route_no: String,
    pub destination: String,
    pub bus_code: String,
    pub category: String,
    pub departure_time: NaiveTime,
    pub available_seats: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct ScheduleView {
    pub id: i64,
    pub bus_id: String,
    pub route_no: String,
    /// 24-hour "HH:MM"
    pub departure_time: String,
    pub available_seats: i64,
}

impl From<&ScheduleDetail> for ScheduleView {
    fn from(detail: &ScheduleDetail) -> Self {
        Self {
            id: detail.id,
            bus_id: detail.bus_code.clone(),
            route_no: detail.route_no.clone(),
            departure_time: detail.departure_time.format("%H:%M").to_string(),
            available_seats: detail.available_seats,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, Apiv2Schema)]
pub struct RouteSummary {
    pub route_no: String,
    pub source: String,
    pub destination: String,
}

/// Route number and length, used by the manual booking form
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, Apiv2Schema)]
pub struct RouteDistance {
    pub route_no: String,
    pub distance: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, Apiv2Schema)]
pub struct StopSummary {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct NewBus {
    pub bus_id: String,
    pub category: String,
    pub capacity: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct NewRoute {
    pub route_no: String,
    pub source: String,
    pub destination: String,
    pub distance: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct NewBusStop {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct NewRouteStop {
    pub bus_stop_id: i64,
    pub stop_order: i64,
    pub distance_from_start: f64,
}

/// Path of one stop on a route
#[derive(Debug, Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct RouteStopPath {
    pub route_no: String,
    pub stop_order: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct NewSchedule {
    pub bus_id: String,
    pub route_no: String,
    /// "HH:MM" or "HH:MM:SS"
    pub departure_time: String,
    /// Defaults to the bus capacity
    pub available_seats: Option<i64>,
}

/// Query for buses running between two stops
#[derive(Debug, Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct AvailabilityQuery {
    pub from: Option<String>,
    pub to: Option<String>,
    /// Earliest departure, "HH:MM"
    pub after: Option<String>,
}

/// A scheduled departure serving the requested stop pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Apiv2Schema)]
pub struct AvailableBus {
    pub route_no: String,
    pub from: String,
    pub to: String,
    #[serde(rename = "type")]
    pub bus_type: String,
    /// 12-hour clock, e.g. "07:30 AM"
    pub time: String,
    pub schedule_id: i64,
    pub bus_id: String,
    pub available_seats: i64,
}

//! Buses, routes, stops and schedules.

use crate::{
    error::{AppError, DbContext, Result},
    models::{
        Bus, BusStop, NewBus, NewBusStop, NewRoute, NewRouteStop, Route, RouteDistance,
        RouteStopView, RouteSummary, ScheduleDetail, StopSummary,
    },
};
use chrono::NaiveTime;

const SCHEDULE_DETAIL: &str = "SELECT s.id, s.route_id, r.route_no, r.destination,
        b.bus_id AS bus_code, b.category, s.departure_time, s.available_seats
     FROM schedules s
     JOIN routes r ON r.id = s.route_id
     JOIN buses b ON b.id = s.bus_id";

impl super::Database {
    pub async fn create_bus(&self, bus: &NewBus) -> Result<Bus> {
        let result = sqlx::query("INSERT INTO buses (bus_id, category, capacity) VALUES (?, ?, ?)")
            .bind(&bus.bus_id)
            .bind(&bus.category)
            .bind(bus.capacity)
            .execute(&self.pool)
            .await
            .db_context("Failed to create bus")?;

        Ok(Bus {
            id: result.last_insert_rowid(),
            bus_id: bus.bus_id.clone(),
            category: bus.category.clone(),
            capacity: bus.capacity,
        })
    }

    pub async fn list_buses(&self) -> Result<Vec<Bus>> {
        sqlx::query_as::<_, Bus>("SELECT id, bus_id, category, capacity FROM buses ORDER BY bus_id")
            .fetch_all(&self.pool)
            .await
            .db_context("Failed to list buses")
    }

    pub async fn find_bus(&self, bus_code: &str) -> Result<Option<Bus>> {
        sqlx::query_as::<_, Bus>("SELECT id, bus_id, category, capacity FROM buses WHERE bus_id = ?")
            .bind(bus_code)
            .fetch_optional(&self.pool)
            .await
            .db_context("Failed to look up bus")
    }

    /// Looks up a bus by its fleet code or fails with `NotFound`
    pub async fn require_bus(&self, bus_code: &str) -> Result<Bus> {
        self.find_bus(bus_code)
            .await?
            .ok_or_else(|| AppError::not_found("Bus", bus_code))
    }

    pub async fn delete_bus(&self, bus_code: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM buses WHERE bus_id = ?")
            .bind(bus_code)
            .execute(&self.pool)
            .await
            .db_context("Failed to delete bus")?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn create_route(&self, route: &NewRoute) -> Result<Route> {
        let result = sqlx::query(
            "INSERT INTO routes (route_no, source, destination, distance) VALUES (?, ?, ?, ?)",
        )
        .bind(&route.route_no)
        .bind(&route.source)
        .bind(&route.destination)
        .bind(route.distance)
        .execute(&self.pool)
        .await
        .db_context("Failed to create route")?;

        Ok(Route {
            id: result.last_insert_rowid(),
            route_no: route.route_no.clone(),
            source: route.source.clone(),
            destination: route.destination.clone(),
            distance: route.distance,
        })
    }

    pub async fn list_routes(&self) -> Result<Vec<Route>> {
        sqlx::query_as::<_, Route>(
            "SELECT id, route_no, source, destination, distance FROM routes ORDER BY route_no",
        )
        .fetch_all(&self.pool)
        .await
        .db_context("Failed to list routes")
    }

    pub async fn route_summaries(&self) -> Result<Vec<RouteSummary>> {
        sqlx::query_as::<_, RouteSummary>(
            "SELECT route_no, source, destination FROM routes ORDER BY route_no",
        )
        .fetch_all(&self.pool)
        .await
        .db_context("Failed to list routes")
    }

    pub async fn route_distances(&self) -> Result<Vec<RouteDistance>> {
        sqlx::query_as::<_, RouteDistance>("SELECT route_no, distance FROM routes ORDER BY route_no")
            .fetch_all(&self.pool)
            .await
            .db_context("Failed to list routes")
    }

    pub async fn find_route(&self, route_no: &str) -> Result<Option<Route>> {
        sqlx::query_as::<_, Route>(
            "SELECT id, route_no, source, destination, distance FROM routes WHERE route_no = ?",
        )
        .bind(route_no)
        .fetch_optional(&self.pool)
        .await
        .db_context("Failed to look up route")
    }

    pub async fn require_route(&self, route_no: &str) -> Result<Route> {
        self.find_route(route_no)
            .await?
            .ok_or_else(|| AppError::not_found("Route", route_no))
    }

    pub async fn delete_route(&self, route_no: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM routes WHERE route_no = ?")
            .bind(route_no)
            .execute(&self.pool)
            .await
            .db_context("Failed to delete route")?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn create_stop(&self, stop: &NewBusStop) -> Result<BusStop> {
        let result =
            sqlx::query("INSERT INTO bus_stops (name, latitude, longitude) VALUES (?, ?, ?)")
                .bind(&stop.name)
                .bind(stop.latitude)
                .bind(stop.longitude)
                .execute(&self.pool)
                .await
                .db_context("Failed to create bus stop")?;

        Ok(BusStop {
            id: result.last_insert_rowid(),
            name: stop.name.clone(),
            latitude: stop.latitude,
            longitude: stop.longitude,
        })
    }

    pub async fn list_stops(&self) -> Result<Vec<StopSummary>> {
        sqlx::query_as::<_, StopSummary>("SELECT id, name FROM bus_stops ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .db_context("Failed to list bus stops")
    }

    pub async fn list_bus_stops(&self) -> Result<Vec<BusStop>> {
        sqlx::query_as::<_, BusStop>(
            "SELECT id, name, latitude, longitude FROM bus_stops ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await
        .db_context("Failed to list bus stops")
    }

    pub async fn find_stop(&self, stop_id: i64) -> Result<Option<BusStop>> {
        sqlx::query_as::<_, BusStop>(
            "SELECT id, name, latitude, longitude FROM bus_stops WHERE id = ?",
        )
        .bind(stop_id)
        .fetch_optional(&self.pool)
        .await
        .db_context("Failed to look up bus stop")
    }

    pub async fn add_route_stop(&self, route_id: i64, stop: &NewRouteStop) -> Result<()> {
        sqlx::query(
            "INSERT INTO route_stops (route_id, bus_stop_id, stop_order, distance_from_start)
             VALUES (?, ?, ?, ?)",
        )
        .bind(route_id)
        .bind(stop.bus_stop_id)
        .bind(stop.stop_order)
        .bind(stop.distance_from_start)
        .execute(&self.pool)
        .await
        .db_context("Failed to add stop to route")?;
        Ok(())
    }

    pub async fn remove_route_stop(&self, route_id: i64, stop_order: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM route_stops WHERE route_id = ? AND stop_order = ?")
            .bind(route_id)
            .bind(stop_order)
            .execute(&self.pool)
            .await
            .db_context("Failed to remove stop from route")?;
        Ok(result.rows_affected() > 0)
    }

    /// Stops of one route in travel order
    pub async fn route_stops(&self, route_id: i64) -> Result<Vec<RouteStopView>> {
        sqlx::query_as::<_, RouteStopView>(
            "SELECT bs.id, bs.name, rs.stop_order, rs.distance_from_start
             FROM route_stops rs
             JOIN bus_stops bs ON bs.id = rs.bus_stop_id
             WHERE rs.route_id = ?
             ORDER BY rs.stop_order",
        )
        .bind(route_id)
        .fetch_all(&self.pool)
        .await
        .db_context("Failed to load route stops")
    }

    pub async fn create_schedule(
        &self,
        bus_id: i64,
        route_id: i64,
        departure_time: NaiveTime,
        available_seats: i64,
    ) -> Result<ScheduleDetail> {
        let result = sqlx::query(
            "INSERT INTO schedules (bus_id, route_id, departure_time, available_seats)
             VALUES (?, ?, ?, ?)",
        )
        .bind(bus_id)
        .bind(route_id)
        .bind(departure_time)
        .bind(available_seats)
        .execute(&self.pool)
        .await
        .db_context("Failed to create schedule")?;

        let id = result.last_insert_rowid();
        self.find_schedule(id)
            .await?
            .ok_or_else(|| AppError::not_found("Schedule", id))
    }

    pub async fn find_schedule(&self, schedule_id: i64) -> Result<Option<ScheduleDetail>> {
        sqlx::query_as::<_, ScheduleDetail>(&format!("{SCHEDULE_DETAIL} WHERE s.id = ?"))
            .bind(schedule_id)
            .fetch_optional(&self.pool)
            .await
            .db_context("Failed to look up schedule")
    }

    pub async fn list_schedules(&self) -> Result<Vec<ScheduleDetail>> {
        sqlx::query_as::<_, ScheduleDetail>(&format!(
            "{SCHEDULE_DETAIL} ORDER BY s.departure_time, r.route_no"
        ))
        .fetch_all(&self.pool)
        .await
        .db_context("Failed to list schedules")
    }

    pub async fn delete_schedule(&self, schedule_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM schedules WHERE id = ?")
            .bind(schedule_id)
            .execute(&self.pool)
            .await
            .db_context("Failed to delete schedule")?;
        Ok(result.rows_affected() > 0)
    }

    /// Schedules on every route that calls at a stop with this name
    /// (case-insensitive)
    pub async fn schedules_through_stop(&self, stop_name: &str) -> Result<Vec<ScheduleDetail>> {
        sqlx::query_as::<_, ScheduleDetail>(&format!(
            "{SCHEDULE_DETAIL}
             WHERE s.route_id IN (
                SELECT rs.route_id FROM route_stops rs
                JOIN bus_stops bs ON bs.id = rs.bus_stop_id
                WHERE bs.name = ? COLLATE NOCASE
             )
             ORDER BY s.departure_time, r.route_no"
        ))
        .bind(stop_name)
        .fetch_all(&self.pool)
        .await
        .db_context("Failed to search schedules")
    }
}
